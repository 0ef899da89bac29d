use std::collections::HashMap;

use chrono::DateTime;

use crate::api::models::MatchDto;
use crate::model::{MatchMetrics, Queue, Role};

/// Derives one player's metrics from a full match. Returns `None` when the
/// player did not participate.
pub fn match_metrics(match_data: &MatchDto, puuid: &str) -> Option<MatchMetrics> {
    let mut team_damage: HashMap<i32, u64> = HashMap::new();
    let mut team_kills: HashMap<i32, u32> = HashMap::new();

    for participant in &match_data.info.participants {
        *team_damage.entry(participant.team_id).or_insert(0) +=
            participant.total_damage_dealt as u64;
        *team_kills.entry(participant.team_id).or_insert(0) += participant.kills;
    }

    let duration_minutes = match_data.info.game_duration as f64 / 60.0;

    let participant = match_data
        .info
        .participants
        .iter()
        .find(|p| p.puuid == puuid)?;

    let cs = participant.total_minions_killed + participant.neutral_minions_killed;
    let damage_dealt = participant.total_damage_dealt;

    let team_damage = team_damage
        .get(&participant.team_id)
        .copied()
        .unwrap_or(0);
    let team_kills = team_kills.get(&participant.team_id).copied().unwrap_or(0);

    let damage_dealt_share = if team_damage > 0 {
        damage_dealt as f64 / team_damage as f64
    } else {
        0.0
    };

    let kill_participation = if team_kills > 0 {
        (participant.kills + participant.assists) as f64 / team_kills as f64
    } else {
        0.0
    };

    Some(MatchMetrics {
        match_id: match_data.metadata.match_id.clone(),
        start_time: DateTime::from_timestamp_millis(match_data.info.game_start_timestamp)
            .unwrap_or_default(),
        role: Role::from_team_position(&participant.team_position),
        champion: participant.champion_name.clone(),
        queue: Queue::from_id(match_data.info.queue_id),
        duration_minutes,
        assists: participant.assists,
        cs,
        cs_per_minute: cs as f64 / duration_minutes,
        control_wards_placed: participant.detector_wards_placed,
        damage_dealt,
        damage_dealt_per_minute: damage_dealt as f64 / duration_minutes,
        damage_dealt_share,
        deaths: participant.deaths,
        kill_participation,
        kills: participant.kills,
        level: participant.champ_level,
        turrets_taken: participant.turret_takedowns,
        wards_killed: participant.wards_killed,
        wards_placed: participant.wards_placed,
        win: participant.win,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{MatchInfo, MatchMetadata, ParticipantDto};

    fn participant(puuid: &str, team_id: i32, kills: u32, damage: u32) -> ParticipantDto {
        ParticipantDto {
            puuid: puuid.to_string(),
            champion_name: "Ahri".to_string(),
            team_id,
            win: team_id == 100,
            team_position: "MIDDLE".to_string(),
            kills,
            deaths: 2,
            assists: 4,
            champ_level: 16,
            total_minions_killed: 150,
            neutral_minions_killed: 30,
            detector_wards_placed: 1,
            wards_killed: 2,
            wards_placed: 9,
            turret_takedowns: 1,
            total_damage_dealt: damage,
        }
    }

    fn match_dto() -> MatchDto {
        MatchDto {
            metadata: MatchMetadata {
                match_id: "NA1_42".to_string(),
                participants: vec!["me".to_string(), "ally".to_string(), "enemy".to_string()],
            },
            info: MatchInfo {
                game_duration: 1800,
                game_start_timestamp: 1_709_316_000_000,
                queue_id: 420,
                participants: vec![
                    participant("me", 100, 6, 20_000),
                    participant("ally", 100, 4, 30_000),
                    participant("enemy", 200, 8, 25_000),
                ],
            },
        }
    }

    #[test]
    fn metrics_are_derived_from_the_matching_participant() {
        let metrics = match_metrics(&match_dto(), "me").unwrap();

        assert_eq!(metrics.match_id, "NA1_42");
        assert_eq!(metrics.role, Role::Middle);
        assert_eq!(metrics.queue, Queue::Ranked);
        assert_eq!(metrics.champion, "Ahri");
        assert!(metrics.win);

        // 1800 seconds = 30 minutes; CS = 150 + 30.
        assert_eq!(metrics.duration_minutes, 30.0);
        assert_eq!(metrics.cs, 180);
        assert!((metrics.cs_per_minute - 6.0).abs() < 1e-9);

        // Team 100 dealt 50_000 damage and scored 10 kills.
        assert!((metrics.damage_dealt_share - 0.4).abs() < 1e-9);
        assert!((metrics.kill_participation - 1.0).abs() < 1e-9);
        assert!((metrics.damage_dealt_per_minute - 20_000.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn missing_participant_yields_none() {
        assert!(match_metrics(&match_dto(), "stranger").is_none());
    }

    #[test]
    fn zero_team_kills_does_not_divide_by_zero() {
        let mut dto = match_dto();
        for p in &mut dto.info.participants {
            p.kills = 0;
            p.assists = 0;
        }

        let metrics = match_metrics(&dto, "me").unwrap();
        assert_eq!(metrics.kill_participation, 0.0);
    }
}
