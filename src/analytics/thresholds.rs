use super::aggregate::Analytics;
use super::normal::Normal;

/// Central coverage used for "one standard deviation above typical" cutoffs.
pub const DEFAULT_CONFIDENCE: f64 = 0.6827;

/// One numeric cutoff per metric, used by the presentation layer to flag
/// noteworthy performances.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    pub assists: f64,
    pub cs_per_minute: f64,
    pub control_wards_placed: f64,
    pub damage_dealt_per_minute: f64,
    pub damage_dealt_share: f64,
    pub deaths: f64,
    pub kill_participation: f64,
    pub kills: f64,
    pub turrets_taken: f64,
    pub wards_killed: f64,
    pub wards_placed: f64,
    pub win_rate: f64,
}

impl Thresholds {
    /// Hand-tuned cutoffs used when no empirical baseline exists yet.
    pub fn general() -> Thresholds {
        Thresholds {
            assists: 8.0,
            cs_per_minute: 7.0,
            control_wards_placed: 1.0,
            damage_dealt_per_minute: 4500.0,
            damage_dealt_share: 0.25,
            deaths: 5.0,
            kill_participation: 0.5,
            kills: 5.0,
            turrets_taken: 2.0,
            wards_killed: 2.0,
            wards_placed: 12.0,
            win_rate: 0.5,
        }
    }

    /// Derives cutoffs from observed play.
    ///
    /// `confidence` in (0, 1) is the central coverage of each fitted normal;
    /// the cutoff is the upper edge of that interval, i.e. the
    /// (1 + confidence) / 2 quantile. At the canonical 0.6827 a metric must
    /// sit one standard deviation above its mean to clear the bar.
    ///
    /// Win rate is a Bernoulli outcome, not a normal one, and is carried
    /// over unchanged.
    pub fn from_analytics(analytics: &Analytics, confidence: f64) -> Thresholds {
        let upper = (1.0 + confidence) / 2.0;
        let cutoff = |normal: Normal| normal.percentile(upper);

        Thresholds {
            assists: cutoff(analytics.assists),
            cs_per_minute: cutoff(analytics.cs_per_minute),
            control_wards_placed: cutoff(analytics.control_wards_placed),
            damage_dealt_per_minute: cutoff(analytics.damage_dealt_per_minute),
            damage_dealt_share: cutoff(analytics.damage_dealt_share),
            deaths: cutoff(analytics.deaths),
            kill_participation: cutoff(analytics.kill_participation),
            kills: cutoff(analytics.kills),
            turrets_taken: cutoff(analytics.turrets_taken),
            wards_killed: cutoff(analytics.wards_killed),
            wards_placed: cutoff(analytics.wards_placed),
            win_rate: analytics.win_rate,
        }
    }

    /// Metric name and cutoff pairs, aligned with
    /// [`Analytics::named_metrics`] by index.
    pub fn named_values(&self) -> [(&'static str, f64); 11] {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn analytics_with_kills(mean: f64, std_dev: f64) -> Analytics {
        let flat = Normal {
            mean: 1.0,
            std_dev: 0.5,
        };

        Analytics {
            assists: flat,
            cs_per_minute: flat,
            control_wards_placed: flat,
            damage_dealt_per_minute: flat,
            damage_dealt_share: flat,
            deaths: flat,
            kill_participation: flat,
            kills: Normal { mean, std_dev },
            turrets_taken: flat,
            wards_killed: flat,
            wards_placed: flat,
            size: 10,
            win_rate: 0.6,
        }
    }

    #[test]
    fn general_thresholds_are_the_fixed_defaults() {
        let general = Thresholds::general();

        assert_eq!(general.assists, 8.0);
        assert_eq!(general.cs_per_minute, 7.0);
        assert_eq!(general.control_wards_placed, 1.0);
        assert_eq!(general.damage_dealt_per_minute, 4500.0);
        assert_eq!(general.damage_dealt_share, 0.25);
        assert_eq!(general.deaths, 5.0);
        assert_eq!(general.kill_participation, 0.5);
        assert_eq!(general.kills, 5.0);
        assert_eq!(general.turrets_taken, 2.0);
        assert_eq!(general.wards_killed, 2.0);
        assert_eq!(general.wards_placed, 12.0);
        assert_eq!(general.win_rate, 0.5);
    }

    #[test]
    fn default_confidence_puts_cutoff_one_sigma_above_the_mean() {
        let analytics = analytics_with_kills(5.0, 2.0);
        let thresholds = Thresholds::from_analytics(&analytics, DEFAULT_CONFIDENCE);

        assert!((thresholds.kills - 7.0).abs() < 0.05);
    }

    #[test]
    fn win_rate_is_copied_through_unchanged() {
        let analytics = analytics_with_kills(5.0, 2.0);
        let thresholds = Thresholds::from_analytics(&analytics, DEFAULT_CONFIDENCE);

        assert_eq!(thresholds.win_rate, 0.6);
    }

    #[test]
    fn higher_confidence_raises_cutoffs() {
        let analytics = analytics_with_kills(5.0, 2.0);

        let loose = Thresholds::from_analytics(&analytics, 0.5);
        let tight = Thresholds::from_analytics(&analytics, 0.95);

        assert!(loose.kills < tight.kills);
        assert!(loose.kills > 5.0);
    }

    #[test]
    fn named_values_align_with_named_metrics() {
        let analytics = analytics_with_kills(5.0, 2.0);
        let thresholds = Thresholds::from_analytics(&analytics, DEFAULT_CONFIDENCE);

        for ((metric_name, _), (threshold_name, _)) in analytics
            .named_metrics()
            .iter()
            .zip(thresholds.named_values().iter())
        {
            assert_eq!(metric_name, threshold_name);
        }
    }
}
