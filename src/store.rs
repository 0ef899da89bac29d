use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::model::{MatchMetrics, Player, Role, Team};

/// Whole-database document persisted as one JSON file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    last_updated: Option<DateTime<Utc>>,
    teams: Vec<Team>,
    players: Vec<Player>,
}

/// Local JSON store of teams and players with their match metrics.
pub struct Store {
    path: PathBuf,
    document: Document,
}

impl Store {
    /// Opens the store at `path`. A missing file starts an empty store.
    pub fn open(path: &Path) -> Result<Store, AppError> {
        let document = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AppError::StorageError(format!("failed to parse {}: {}", path.display(), e))
            })?,
            Err(_) => Document::default(),
        };

        Ok(Store {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn save(&mut self) -> Result<(), AppError> {
        self.document.last_updated = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::StorageError(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&self.document)
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        fs::write(&self.path, json).map_err(|e| AppError::StorageError(e.to_string()))
    }

    pub fn player_by_puuid(&self, puuid: &str) -> Option<&Player> {
        self.document.players.iter().find(|p| p.puuid == puuid)
    }

    pub fn player_by_riot_id(&self, game_name: &str, tag_line: &str) -> Option<&Player> {
        self.document
            .players
            .iter()
            .find(|p| p.game_name == game_name && p.tag_line == tag_line)
    }

    /// Returns the player for `puuid`, creating an entry if necessary, and
    /// refreshes the display name either way.
    pub fn ensure_player(
        &mut self,
        puuid: &str,
        game_name: &str,
        tag_line: &str,
    ) -> &mut Player {
        let index = match self
            .document
            .players
            .iter()
            .position(|p| p.puuid == puuid)
        {
            Some(index) => index,
            None => {
                self.document
                    .players
                    .push(Player::new(puuid, game_name, tag_line));
                self.document.players.len() - 1
            }
        };

        let player = &mut self.document.players[index];
        player.game_name = game_name.to_string();
        player.tag_line = tag_line.to_string();
        player
    }

    pub fn upsert_team(&mut self, team: Team) {
        match self.document.teams.iter_mut().find(|t| t.id == team.id) {
            Some(existing) => *existing = team,
            None => self.document.teams.push(team),
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.document.teams
    }

    pub fn team_by_id(&self, id: &str) -> Option<&Team> {
        self.document.teams.iter().find(|t| t.id == id)
    }

    pub fn players_on_team(&self, team_id: &str) -> Vec<&Player> {
        self.document
            .players
            .iter()
            .filter(|p| p.team_id.as_deref() == Some(team_id))
            .collect()
    }

    /// Every stored metrics record, across all players. The store-wide
    /// baseline for percentile thresholds.
    pub fn all_metrics(&self) -> Vec<MatchMetrics> {
        self.document
            .players
            .iter()
            .flat_map(|p| p.metrics.iter().cloned())
            .collect()
    }

    pub fn metrics_for_role(&self, role: Role) -> Vec<MatchMetrics> {
        self.document
            .players
            .iter()
            .flat_map(|p| p.metrics.iter())
            .filter(|m| m.role == role)
            .cloned()
            .collect()
    }

    pub fn metrics_for_champion(&self, champion: &str) -> Vec<MatchMetrics> {
        self.document
            .players
            .iter()
            .flat_map(|p| p.metrics.iter())
            .filter(|m| m.champion == champion)
            .cloned()
            .collect()
    }
}
