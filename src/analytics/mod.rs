pub mod aggregate;
pub mod filter;
pub mod normal;
pub mod thresholds;

pub use aggregate::{
    analyze, analyze_by_champion, analyze_by_role, analyze_for_champion, analyze_for_role,
    group_by_champion, group_by_role, Analytics, MIN_SAMPLES,
};
pub use normal::Normal;
pub use thresholds::{Thresholds, DEFAULT_CONFIDENCE};
