use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::USER_AGENT;

const PLAYVS_ENDPOINT: &str = "https://api.playvs.com/graphql";

/// League id of the eastern PlayVS region.
pub const EASTERN_REGION: &str = "17a567ac-c0cb-401f-85de-619f84bcb75b";
/// Current metaseason id.
pub const META_SEASON: &str = "95c742a7-8f9c-4417-a459-8c5b930d79c5";

// Persisted-query hashes registered with the PlayVS GraphQL gateway.
const TEAMS_QUERY_HASH: &str =
    "fdd6c95ee9f8ea96a45a87ab89f822ebfa41f3eb4348e4e4e595733aa7cbb570";
const ROSTER_QUERY_HASH: &str =
    "3b1fa794463895123f7179a73165c3732fe3a6dc5138b6a7b6276a6f8c0619fa";

#[derive(Debug, Clone)]
pub struct PlayVsTeam {
    pub id: String,
    pub name: String,
    pub state: String,
}

/// PlayVS GraphQL client scoped to one region and metaseason.
pub struct PlayVsClient {
    region: String,
    metaseason: String,
}

impl PlayVsClient {
    pub fn new() -> Self {
        PlayVsClient {
            region: EASTERN_REGION.to_string(),
            metaseason: META_SEASON.to_string(),
        }
    }

    fn perform(
        &self,
        operation: &str,
        variables: serde_json::Value,
        hash: &str,
    ) -> Result<String, AppError> {
        let payload = json!({
            "operationName": operation,
            "variables": variables,
            "extensions": {
                "persistedQuery": {
                    "version": 1,
                    "sha256Hash": hash,
                },
            },
        });

        let response = ureq::post(PLAYVS_ENDPOINT)
            .set("User-Agent", USER_AGENT)
            .send_json(payload)
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        response
            .into_string()
            .map_err(|e| AppError::HttpError(e.to_string()))
    }

    /// League of Legends teams enrolled in this region and metaseason.
    pub fn teams(&self) -> Result<Vec<PlayVsTeam>, AppError> {
        let variables = json!({
            "filters": {
                "metaseasonId": self.metaseason,
                "leagueId": self.region,
                "esportSlugs": ["league-of-legends"],
                "keyword": "",
            },
            // approximately 75 teams total
            "limit": 100,
            "offset": 0,
        });

        let body = self.perform("getAllLeagueTeams", variables, TEAMS_QUERY_HASH)?;

        let result: TeamsResult =
            serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))?;

        let page = result
            .data
            .ok_or_else(|| AppError::ApiError("playvs returned no team data".to_string()))?;

        Ok(page
            .get_teams
            .teams
            .into_iter()
            .map(|t| PlayVsTeam {
                id: t.id,
                name: t.name,
                state: t.state,
            })
            .collect())
    }

    /// Riot display names (Name#TAG) of a team's starting roster.
    pub fn roster_riot_ids(&self, team_id: &str) -> Result<Vec<String>, AppError> {
        let variables = json!({
            "id": team_id,
            "metaseasonId": self.metaseason,
            "includeSlotExclusionsField": false,
            "isPublic": false,
            "isCoach": false,
        });

        let body = self.perform("teamRoster", variables, ROSTER_QUERY_HASH)?;

        let result: RosterResult =
            serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))?;

        let team = result
            .data
            .ok_or_else(|| AppError::TeamNotFound(team_id.to_string()))?
            .team;

        let mut display_names = Vec::new();

        for format in team.roster.formats {
            for starter in format.starters {
                for account in starter.player.user.provider_accounts {
                    if account.provider_name == "Riot" {
                        display_names.push(account.provider_display_name);
                    }
                }
            }
        }

        Ok(display_names)
    }
}

impl Default for PlayVsClient {
    fn default() -> Self {
        Self::new()
    }
}

// Responses are deep GraphQL documents; only the traversed fields are
// declared and serde ignores the rest.

#[derive(Debug, Deserialize)]
struct TeamsResult {
    data: Option<TeamsEnvelope>,
}

#[derive(Debug, Deserialize)]
struct TeamsEnvelope {
    #[serde(rename = "getTeams")]
    get_teams: TeamsPage,
}

#[derive(Debug, Deserialize)]
struct TeamsPage {
    teams: Vec<TeamEntry>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    id: String,
    name: String,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct RosterResult {
    data: Option<RosterEnvelope>,
}

#[derive(Debug, Deserialize)]
struct RosterEnvelope {
    team: RosterTeam,
}

#[derive(Debug, Deserialize)]
struct RosterTeam {
    roster: Roster,
}

#[derive(Debug, Deserialize, Default)]
struct Roster {
    #[serde(default)]
    formats: Vec<RosterFormat>,
}

#[derive(Debug, Deserialize)]
struct RosterFormat {
    #[serde(default)]
    starters: Vec<RosterStarter>,
}

#[derive(Debug, Deserialize)]
struct RosterStarter {
    player: RosterPlayer,
}

#[derive(Debug, Deserialize)]
struct RosterPlayer {
    user: RosterUser,
}

#[derive(Debug, Deserialize)]
struct RosterUser {
    #[serde(rename = "userProviderAccounts", default)]
    provider_accounts: Vec<ProviderAccount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderAccount {
    provider_name: String,
    provider_display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_response_yields_riot_display_names() {
        let body = r#"{
            "data": {
                "team": {
                    "roster": {
                        "formats": [{
                            "starters": [
                                {
                                    "player": {
                                        "user": {
                                            "userProviderAccounts": [
                                                {"providerName": "Riot", "providerDisplayName": "Top#NA1"},
                                                {"providerName": "Epic", "providerDisplayName": "ignored"}
                                            ]
                                        }
                                    }
                                },
                                {
                                    "player": {
                                        "user": {
                                            "userProviderAccounts": [
                                                {"providerName": "Riot", "providerDisplayName": "Mid#NA1"}
                                            ]
                                        }
                                    }
                                }
                            ]
                        }]
                    }
                }
            }
        }"#;

        let result: RosterResult = serde_json::from_str(body).unwrap();
        let team = result.data.unwrap().team;

        let names: Vec<String> = team
            .roster
            .formats
            .into_iter()
            .flat_map(|f| f.starters)
            .flat_map(|s| s.player.user.provider_accounts)
            .filter(|a| a.provider_name == "Riot")
            .map(|a| a.provider_display_name)
            .collect();

        assert_eq!(names, vec!["Top#NA1", "Mid#NA1"]);
    }

    #[test]
    fn teams_response_tolerates_extra_fields() {
        let body = r#"{
            "data": {
                "getTeams": {
                    "teams": [
                        {"id": "t1", "name": "Alpha", "state": "NY", "__typename": "Team"}
                    ],
                    "totalCount": 1
                }
            },
            "extensions": {"traceId": "abc"}
        }"#;

        let result: TeamsResult = serde_json::from_str(body).unwrap();
        let teams = result.data.unwrap().get_teams.teams;

        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].id, "t1");
        assert_eq!(teams[0].state, "NY");
    }
}
