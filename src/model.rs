use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::AppError;

/// Lane assignment for a match participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Top,
    Jungle,
    Middle,
    Bottom,
    Support,
    Unknown,
}

/// The five known roles, in display order. `Unknown` is deliberately absent.
pub const ROLES: [Role; 5] = [
    Role::Top,
    Role::Jungle,
    Role::Middle,
    Role::Bottom,
    Role::Support,
];

impl Role {
    /// Maps the Match-V5 `teamPosition` field. Riot reports support as
    /// `UTILITY`; anything unrecognized (remakes, old matches) is `Unknown`.
    pub fn from_team_position(position: &str) -> Role {
        match position {
            "TOP" => Role::Top,
            "JUNGLE" => Role::Jungle,
            "MIDDLE" => Role::Middle,
            "BOTTOM" => Role::Bottom,
            "UTILITY" => Role::Support,
            _ => Role::Unknown,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Top => "Top",
            Role::Jungle => "Jungle",
            Role::Middle => "Middle",
            Role::Bottom => "Bottom",
            Role::Support => "Support",
            Role::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Summoner's Rift queue of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Queue {
    Normal,
    Ranked,
    Clash,
    Other,
}

/// Queues included when scanning a player's history.
pub const SCANNED_QUEUES: [Queue; 3] = [Queue::Normal, Queue::Ranked, Queue::Clash];

impl Queue {
    pub fn id(self) -> i64 {
        match self {
            Queue::Normal => 400,
            Queue::Ranked => 420,
            Queue::Clash => 700,
            Queue::Other => 0,
        }
    }

    pub fn from_id(id: i64) -> Queue {
        match id {
            400 => Queue::Normal,
            420 => Queue::Ranked,
            700 => Queue::Clash,
            _ => Queue::Other,
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Queue::Normal => "Normal",
            Queue::Ranked => "Ranked",
            Queue::Clash => "Clash",
            Queue::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// One player's derived performance in one match. Computed once when the
/// match is scanned and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetrics {
    pub match_id: String,
    pub start_time: DateTime<Utc>,
    pub role: Role,
    pub champion: String,
    pub queue: Queue,
    pub duration_minutes: f64,

    pub assists: u32,
    pub cs: u32,
    pub cs_per_minute: f64,
    pub control_wards_placed: u32,
    pub damage_dealt: u32,
    pub damage_dealt_per_minute: f64,
    pub damage_dealt_share: f64,
    pub deaths: u32,
    pub kill_participation: f64,
    pub kills: u32,
    pub level: u32,
    pub turrets_taken: u32,
    pub wards_killed: u32,
    pub wards_placed: u32,
    pub win: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub team_id: Option<String>,
    pub metrics: Vec<MatchMetrics>,
}

impl Player {
    pub fn new(puuid: &str, game_name: &str, tag_line: &str) -> Self {
        Player {
            puuid: puuid.to_string(),
            game_name: game_name.to_string(),
            tag_line: tag_line.to_string(),
            team_id: None,
            metrics: Vec::new(),
        }
    }

    pub fn riot_id(&self) -> String {
        join_riot_id(&self.game_name, &self.tag_line)
    }

    /// Appends metrics whose match id is not already present, keeping one
    /// record per (player, match). Returns how many were actually added.
    pub fn append_metrics(&mut self, metrics: Vec<MatchMetrics>) -> usize {
        let mut seen: HashSet<String> =
            self.metrics.iter().map(|m| m.match_id.clone()).collect();

        let mut added = 0;

        for m in metrics {
            if seen.insert(m.match_id.clone()) {
                self.metrics.push(m);
                added += 1;
            }
        }

        added
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

/// Start of the 2024 competitive season, the default cutoff for "current
/// season" analysis.
pub fn season_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
}

/// Splits `Name#TAG` into game name and tag line.
pub fn split_riot_id(riot_id: &str) -> Result<(String, String), AppError> {
    match riot_id.split_once('#') {
        Some((name, tag)) if !name.is_empty() && !tag.is_empty() && !tag.contains('#') => {
            Ok((name.to_string(), tag.to_string()))
        }
        _ => Err(AppError::InvalidRiotId),
    }
}

pub fn join_riot_id(game_name: &str, tag_line: &str) -> String {
    format!("{}#{}", game_name, tag_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(match_id: &str) -> MatchMetrics {
        MatchMetrics {
            match_id: match_id.to_string(),
            start_time: Utc::now(),
            role: Role::Middle,
            champion: "Ahri".to_string(),
            queue: Queue::Ranked,
            duration_minutes: 30.0,
            assists: 4,
            cs: 210,
            cs_per_minute: 7.0,
            control_wards_placed: 1,
            damage_dealt: 24000,
            damage_dealt_per_minute: 800.0,
            damage_dealt_share: 0.25,
            deaths: 3,
            kill_participation: 0.5,
            kills: 6,
            level: 16,
            turrets_taken: 1,
            wards_killed: 2,
            wards_placed: 9,
            win: true,
        }
    }

    #[test]
    fn append_metrics_skips_duplicates() {
        let mut player = Player::new("puuid", "Name", "TAG");

        let added = player.append_metrics(vec![metrics("NA1_1"), metrics("NA1_2")]);
        assert_eq!(added, 2);

        // A repeated match id, against the store and within one batch.
        let added = player.append_metrics(vec![
            metrics("NA1_2"),
            metrics("NA1_3"),
            metrics("NA1_3"),
        ]);
        assert_eq!(added, 1);
        assert_eq!(player.metrics.len(), 3);
    }

    #[test]
    fn split_riot_id_accepts_name_tag() {
        let (name, tag) = split_riot_id("Faker#KR1").unwrap();
        assert_eq!(name, "Faker");
        assert_eq!(tag, "KR1");
    }

    #[test]
    fn split_riot_id_rejects_malformed_ids() {
        assert!(split_riot_id("Faker").is_err());
        assert!(split_riot_id("#KR1").is_err());
        assert!(split_riot_id("Faker#").is_err());
        assert!(split_riot_id("Faker#KR#1").is_err());
    }

    #[test]
    fn role_maps_team_position() {
        assert_eq!(Role::from_team_position("UTILITY"), Role::Support);
        assert_eq!(Role::from_team_position("TOP"), Role::Top);
        assert_eq!(Role::from_team_position(""), Role::Unknown);
    }

    #[test]
    fn queue_round_trips_known_ids() {
        assert_eq!(Queue::from_id(420), Queue::Ranked);
        assert_eq!(Queue::from_id(Queue::Clash.id()), Queue::Clash);
        assert_eq!(Queue::from_id(830), Queue::Other);
    }
}
