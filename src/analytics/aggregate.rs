use std::collections::HashMap;

use super::normal::Normal;
use crate::error::AppError;
use crate::model::{MatchMetrics, Role};

/// Groups smaller than this carry no usable spread and are dropped from
/// grouped analytics.
pub const MIN_SAMPLES: usize = 2;

/// Normal summaries of every tracked metric over one homogeneous group of
/// matches (one role, or one champion).
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub assists: Normal,
    pub cs_per_minute: Normal,
    pub control_wards_placed: Normal,
    pub damage_dealt_per_minute: Normal,
    pub damage_dealt_share: Normal,
    pub deaths: Normal,
    pub kill_participation: Normal,
    pub kills: Normal,
    pub turrets_taken: Normal,
    pub wards_killed: Normal,
    pub wards_placed: Normal,
    pub size: usize,
    pub win_rate: f64,
}

impl Analytics {
    /// Metric name and summary pairs, in the fixed order used for rendering
    /// and threshold derivation.
    pub fn named_metrics(&self) -> [(&'static str, Normal); 11] {
        [
            ("Assists", self.assists),
            ("CS / Minute", self.cs_per_minute),
            ("Control Wards Placed", self.control_wards_placed),
            ("Damage Dealt / Minute", self.damage_dealt_per_minute),
            ("Damage Dealt Share", self.damage_dealt_share),
            ("Deaths", self.deaths),
            ("Kill Participation", self.kill_participation),
            ("Kills", self.kills),
            ("Turrets Taken", self.turrets_taken),
            ("Wards Killed", self.wards_killed),
            ("Wards Placed", self.wards_placed),
        ]
    }
}

/// Fits a `Normal` to each metric column of `records` and computes the win
/// rate. Fails with `EmptySample` when `records` is empty.
pub fn analyze(records: &[MatchMetrics]) -> Result<Analytics, AppError> {
    let column = |value: fn(&MatchMetrics) -> f64| Normal::from_samples(records.iter().map(value));

    Ok(Analytics {
        assists: column(|m| m.assists as f64)?,
        cs_per_minute: column(|m| m.cs_per_minute)?,
        control_wards_placed: column(|m| m.control_wards_placed as f64)?,
        damage_dealt_per_minute: column(|m| m.damage_dealt_per_minute)?,
        damage_dealt_share: column(|m| m.damage_dealt_share)?,
        deaths: column(|m| m.deaths as f64)?,
        kill_participation: column(|m| m.kill_participation)?,
        kills: column(|m| m.kills as f64)?,
        turrets_taken: column(|m| m.turrets_taken as f64)?,
        wards_killed: column(|m| m.wards_killed as f64)?,
        wards_placed: column(|m| m.wards_placed as f64)?,
        size: records.len(),
        win_rate: percent_true(records.iter().map(|m| m.win)),
    })
}

fn percent_true<I>(values: I) -> f64
where
    I: IntoIterator<Item = bool>,
{
    let mut total = 0usize;
    let mut trues = 0usize;

    for value in values {
        total += 1;
        if value {
            trues += 1;
        }
    }

    trues as f64 / total as f64
}

/// Partitions records by role. Input order is preserved within each group;
/// the map's iteration order is unspecified.
pub fn group_by_role(records: &[MatchMetrics]) -> HashMap<Role, Vec<MatchMetrics>> {
    let mut groups: HashMap<Role, Vec<MatchMetrics>> = HashMap::new();

    for record in records {
        groups.entry(record.role).or_default().push(record.clone());
    }

    groups
}

/// Partitions records by champion. Input order is preserved within each
/// group; the map's iteration order is unspecified.
pub fn group_by_champion(records: &[MatchMetrics]) -> HashMap<String, Vec<MatchMetrics>> {
    let mut groups: HashMap<String, Vec<MatchMetrics>> = HashMap::new();

    for record in records {
        groups
            .entry(record.champion.clone())
            .or_default()
            .push(record.clone());
    }

    groups
}

/// Analytics per role, silently excluding groups below [`MIN_SAMPLES`].
pub fn analyze_by_role(records: &[MatchMetrics]) -> HashMap<Role, Analytics> {
    analyze_by_role_with_min_samples(records, MIN_SAMPLES)
}

pub fn analyze_by_role_with_min_samples(
    records: &[MatchMetrics],
    min_samples: usize,
) -> HashMap<Role, Analytics> {
    let mut result = HashMap::new();

    for (role, group) in group_by_role(records) {
        if group.len() < min_samples {
            continue;
        }

        if let Ok(analytics) = analyze(&group) {
            result.insert(role, analytics);
        }
    }

    result
}

/// Analytics per champion, silently excluding groups below [`MIN_SAMPLES`].
pub fn analyze_by_champion(records: &[MatchMetrics]) -> HashMap<String, Analytics> {
    analyze_by_champion_with_min_samples(records, MIN_SAMPLES)
}

pub fn analyze_by_champion_with_min_samples(
    records: &[MatchMetrics],
    min_samples: usize,
) -> HashMap<String, Analytics> {
    let mut result = HashMap::new();

    for (champion, group) in group_by_champion(records) {
        if group.len() < min_samples {
            continue;
        }

        if let Ok(analytics) = analyze(&group) {
            result.insert(champion, analytics);
        }
    }

    result
}

/// Analytics for one role, or `None` when the role was never played or its
/// group was too small. Absence is an expected outcome, not a failure.
pub fn analyze_for_role(records: &[MatchMetrics], role: Role) -> Option<Analytics> {
    analyze_by_role(records).remove(&role)
}

/// Analytics for one champion, or `None` when the champion was never played
/// or its group was too small.
pub fn analyze_for_champion(records: &[MatchMetrics], champion: &str) -> Option<Analytics> {
    analyze_by_champion(records).remove(champion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::model::Queue;

    fn record(match_id: &str, role: Role, champion: &str, win: bool) -> MatchMetrics {
        MatchMetrics {
            match_id: match_id.to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap(),
            role,
            champion: champion.to_string(),
            queue: Queue::Ranked,
            duration_minutes: 30.0,
            assists: 4,
            cs: 180,
            cs_per_minute: 6.0,
            control_wards_placed: 1,
            damage_dealt: 21000,
            damage_dealt_per_minute: 700.0,
            damage_dealt_share: 0.22,
            deaths: 3,
            kill_participation: 0.5,
            kills: 5,
            level: 15,
            turrets_taken: 1,
            wards_killed: 2,
            wards_placed: 10,
            win,
        }
    }

    #[test]
    fn analyze_rejects_empty_input() {
        assert!(matches!(analyze(&[]), Err(AppError::EmptySample)));
    }

    #[test]
    fn analyze_is_deterministic() {
        let records = vec![
            record("1", Role::Jungle, "LeeSin", true),
            record("2", Role::Jungle, "Vi", false),
            record("3", Role::Middle, "Ahri", true),
        ];

        let first = analyze(&records).unwrap();
        let second = analyze(&records).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn win_rate_is_fraction_of_wins() {
        let records = vec![
            record("1", Role::Top, "Garen", true),
            record("2", Role::Top, "Garen", true),
            record("3", Role::Top, "Garen", false),
            record("4", Role::Top, "Garen", true),
        ];

        let analytics = analyze(&records).unwrap();
        assert_eq!(analytics.win_rate, 0.75);
        assert_eq!(analytics.size, 4);
    }

    #[test]
    fn grouping_preserves_input_order_within_groups() {
        let records = vec![
            record("1", Role::Top, "Garen", true),
            record("2", Role::Jungle, "Vi", false),
            record("3", Role::Top, "Garen", false),
        ];

        let groups = group_by_role(&records);
        let top = &groups[&Role::Top];

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].match_id, "1");
        assert_eq!(top[1].match_id, "3");
    }

    #[test]
    fn small_groups_are_excluded() {
        let records = vec![
            record("1", Role::Middle, "Ahri", true),
            record("2", Role::Middle, "Syndra", true),
            record("3", Role::Middle, "Syndra", false),
            record("4", Role::Middle, "Syndra", true),
        ];

        let by_champion = analyze_by_champion(&records);

        assert!(by_champion.contains_key("Syndra"));
        assert!(!by_champion.contains_key("Ahri"));
        assert_eq!(by_champion["Syndra"].size, 3);
    }

    #[test]
    fn min_samples_is_overridable_but_defaults_to_two() {
        let records = vec![
            record("1", Role::Middle, "Ahri", true),
            record("2", Role::Middle, "Syndra", true),
            record("3", Role::Middle, "Syndra", false),
        ];

        assert_eq!(MIN_SAMPLES, 2);
        assert_eq!(analyze_by_champion(&records).len(), 1);
        assert_eq!(
            analyze_by_champion_with_min_samples(&records, 1).len(),
            2
        );
    }

    #[test]
    fn analyze_by_role_summarizes_each_group() {
        let mut records = vec![
            record("1", Role::Jungle, "LeeSin", true),
            record("2", Role::Jungle, "LeeSin", false),
            record("3", Role::Jungle, "Vi", true),
        ];
        records[0].cs_per_minute = 4.0;
        records[1].cs_per_minute = 5.0;
        records[2].cs_per_minute = 6.0;

        let by_role = analyze_by_role(&records);
        assert_eq!(by_role.len(), 1);

        let jungle = &by_role[&Role::Jungle];
        assert_eq!(jungle.size, 3);
        assert!((jungle.cs_per_minute.mean - 5.0).abs() < 1e-9);
        assert!((jungle.cs_per_minute.std_dev - 1.0).abs() < 1e-9);

        assert!(analyze_for_role(&records, Role::Support).is_none());
        assert!(analyze_for_role(&records, Role::Jungle).is_some());
    }

    #[test]
    fn analyze_for_champion_absent_is_none() {
        let records = vec![
            record("1", Role::Middle, "Ahri", true),
            record("2", Role::Middle, "Ahri", false),
        ];

        assert!(analyze_for_champion(&records, "Zed").is_none());
        let ahri = analyze_for_champion(&records, "Ahri").unwrap();
        assert_eq!(ahri.size, 2);
        assert_eq!(ahri.win_rate, 0.5);
    }
}
