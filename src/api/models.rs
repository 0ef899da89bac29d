use serde::Deserialize;

// Account V1 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

// Summoner V4 response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerDto {
    pub puuid: String,
    #[serde(default)]
    pub name: String,
    pub summoner_level: i64,
    #[serde(default)]
    pub profile_icon_id: i32,
}

// Match V5 response
#[derive(Debug, Deserialize)]
pub struct MatchDto {
    pub metadata: MatchMetadata,
    pub info: MatchInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    pub match_id: String,
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub game_duration: i64,
    #[serde(default)]
    pub game_start_timestamp: i64,
    #[serde(default)]
    pub queue_id: i64,
    pub participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub champion_name: String,
    pub team_id: i32,
    pub win: bool,
    // TOP, JUNGLE, MIDDLE, BOTTOM, UTILITY; empty for some older matches
    #[serde(default)]
    pub team_position: String,
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub champ_level: u32,
    #[serde(default)]
    pub total_minions_killed: u32,
    #[serde(default)]
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub detector_wards_placed: u32,
    #[serde(default)]
    pub wards_killed: u32,
    #[serde(default)]
    pub wards_placed: u32,
    #[serde(default)]
    pub turret_takedowns: u32,
    #[serde(default)]
    pub total_damage_dealt: u32,
}
