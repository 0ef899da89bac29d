use chrono::{DateTime, Utc};

use crate::model::{MatchMetrics, Role};

/// Records that started strictly after `cutoff`, in their original order.
/// Used to scope analysis to the current competitive season.
pub fn since(records: &[MatchMetrics], cutoff: DateTime<Utc>) -> Vec<MatchMetrics> {
    records
        .iter()
        .filter(|m| m.start_time > cutoff)
        .cloned()
        .collect()
}

/// Records played in `role`, in their original order.
pub fn by_role(records: &[MatchMetrics], role: Role) -> Vec<MatchMetrics> {
    records
        .iter()
        .filter(|m| m.role == role)
        .cloned()
        .collect()
}

/// Records played on `champion`, in their original order.
pub fn by_champion(records: &[MatchMetrics], champion: &str) -> Vec<MatchMetrics> {
    records
        .iter()
        .filter(|m| m.champion == champion)
        .cloned()
        .collect()
}
