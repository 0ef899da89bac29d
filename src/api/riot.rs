use crate::config::Config;
use crate::error::AppError;
use crate::model::join_riot_id;

use super::execute_request;
use super::models::AccountDto;

/// Riot Account-V1 client: resolves a Riot ID to a PUUID. Account lookups
/// are always routed through the americas cluster.
pub struct RiotApiClient {
    api_key: String,
}

impl RiotApiClient {
    pub fn new(config: &Config) -> Self {
        RiotApiClient {
            api_key: config.api_key.clone(),
        }
    }

    pub fn get_account(&self, game_name: &str, tag_line: &str) -> Result<AccountDto, AppError> {
        let url = format!(
            "https://americas.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
            game_name, tag_line
        );

        match execute_request(&url, &self.api_key) {
            Ok(body) => {
                serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
            }
            Err(AppError::NotFound(_)) => {
                Err(AppError::PlayerNotFound(join_riot_id(game_name, tag_line)))
            }
            Err(e) => Err(e),
        }
    }
}
