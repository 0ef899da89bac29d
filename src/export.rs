use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::model::MatchMetrics;

/// Renders a metrics collection as CSV. Column names match the scouting
/// spreadsheets this data feeds into.
pub fn metrics_csv(records: &[MatchMetrics]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record([
            "assists",
            "cs",
            "cs/m",
            "champion",
            "controlWards",
            "dmg",
            "dmg/m",
            "dmg%",
            "deaths",
            "durationMinutes",
            "kp",
            "kills",
            "level",
            "matchType",
            "position",
            "turrets",
            "wardsKilled",
            "wardsPlaced",
            "win",
        ])
        .map_err(|e| AppError::CsvError(e.to_string()))?;

    for m in records {
        writer
            .write_record([
                m.assists.to_string(),
                m.cs.to_string(),
                m.cs_per_minute.to_string(),
                m.champion.clone(),
                m.control_wards_placed.to_string(),
                m.damage_dealt.to_string(),
                m.damage_dealt_per_minute.to_string(),
                m.damage_dealt_share.to_string(),
                m.deaths.to_string(),
                m.duration_minutes.to_string(),
                m.kill_participation.to_string(),
                m.kills.to_string(),
                m.level.to_string(),
                m.queue.to_string(),
                m.role.to_string(),
                m.turrets_taken.to_string(),
                m.wards_killed.to_string(),
                m.wards_placed.to_string(),
                m.win.to_string(),
            ])
            .map_err(|e| AppError::CsvError(e.to_string()))?;
    }

    let data = writer
        .into_inner()
        .map_err(|e| AppError::CsvError(e.to_string()))?;

    String::from_utf8(data).map_err(|e| AppError::CsvError(e.to_string()))
}

/// Writes a metrics collection to `path` as CSV.
pub fn write_metrics(path: &Path, records: &[MatchMetrics]) -> Result<(), AppError> {
    let csv = metrics_csv(records)?;
    fs::write(path, csv).map_err(|e| AppError::StorageError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Queue, Role};
    use chrono::{TimeZone, Utc};

    fn record(match_id: &str) -> MatchMetrics {
        MatchMetrics {
            match_id: match_id.to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap(),
            role: Role::Bottom,
            champion: "Jinx".to_string(),
            queue: Queue::Clash,
            duration_minutes: 32.5,
            assists: 5,
            cs: 260,
            cs_per_minute: 8.0,
            control_wards_placed: 2,
            damage_dealt: 31000,
            damage_dealt_per_minute: 953.8,
            damage_dealt_share: 0.31,
            deaths: 4,
            kill_participation: 0.62,
            kills: 9,
            level: 17,
            turrets_taken: 3,
            wards_killed: 1,
            wards_placed: 11,
            win: true,
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_record() {
        let csv = metrics_csv(&[record("1"), record("2")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("assists,cs,cs/m,champion"));
        assert!(lines[1].contains("Jinx"));
        assert!(lines[1].contains("Clash"));
        assert!(lines[1].contains("Bottom"));
        assert!(lines[1].ends_with("true"));
    }

    #[test]
    fn empty_collection_yields_header_only() {
        let csv = metrics_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
