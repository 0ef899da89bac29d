use colored::*;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

use crate::analytics::{Analytics, Thresholds};
use crate::model::{MatchMetrics, Role};

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Mean")]
    mean: String,
    #[tabled(rename = "Std Dev")]
    std_dev: String,
    #[tabled(rename = "Threshold")]
    threshold: String,
}

#[derive(Tabled)]
struct MatchRow {
    #[tabled(rename = "Champion")]
    champion: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "K/D/A")]
    kda: String,
    #[tabled(rename = "CS/m")]
    cs_per_minute: String,
    #[tabled(rename = "KP")]
    kill_participation: String,
    #[tabled(rename = "DMG/m")]
    damage_per_minute: String,
    #[tabled(rename = "Queue")]
    queue: String,
    #[tabled(rename = "Length")]
    duration: String,
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Renders one analytics group as a metric-per-row table. Means that clear
/// their threshold are highlighted.
pub fn display_analytics(title: &str, analytics: &Analytics, thresholds: &Thresholds) {
    println!(
        "\n{}",
        format!(
            "📊 {} ({} matches, {:.1}% WR)",
            title,
            analytics.size,
            analytics.win_rate * 100.0
        )
        .bold()
        .cyan()
    );

    let cutoffs = thresholds.named_values();

    let mut rows = Vec::new();
    for (index, (name, normal)) in analytics.named_metrics().into_iter().enumerate() {
        let cutoff = cutoffs[index].1;

        let mean = if normal.mean >= cutoff {
            format!("{:.2}", normal.mean).green().to_string()
        } else {
            format!("{:.2}", normal.mean).red().to_string()
        };

        rows.push(MetricRow {
            metric: name.to_string(),
            mean,
            std_dev: format!("{:.2}", normal.std_dev),
            threshold: format!("{:.2}", cutoff),
        });
    }

    let win_rate = if analytics.win_rate >= thresholds.win_rate {
        format!("{:.2}", analytics.win_rate).green().to_string()
    } else {
        format!("{:.2}", analytics.win_rate).red().to_string()
    };

    rows.push(MetricRow {
        metric: "Win Rate".to_string(),
        mean: win_rate,
        std_dev: "-".to_string(),
        threshold: format!("{:.2}", thresholds.win_rate),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
}

/// Renders per-role thresholds as one table: metric rows, role columns.
pub fn display_role_thresholds(thresholds_by_role: &[(Role, Thresholds)]) {
    if thresholds_by_role.is_empty() {
        return;
    }

    println!("\n{}", "🎯 POSITION THRESHOLDS".bold().cyan());

    let mut builder = Builder::default();

    let mut header = vec!["Metric".to_string()];
    header.extend(thresholds_by_role.iter().map(|(role, _)| role.to_string()));
    builder.push_record(header);

    let metric_count = thresholds_by_role[0].1.named_values().len();

    for index in 0..metric_count {
        let name = thresholds_by_role[0].1.named_values()[index].0;

        let mut row = vec![name.to_string()];
        row.extend(
            thresholds_by_role
                .iter()
                .map(|(_, t)| format!("{:.2}", t.named_values()[index].1)),
        );
        builder.push_record(row);
    }

    let mut win_rate_row = vec!["Win Rate".to_string()];
    win_rate_row.extend(
        thresholds_by_role
            .iter()
            .map(|(_, t)| format!("{:.2}", t.win_rate)),
    );
    builder.push_record(win_rate_row);

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);
}

/// Renders stored match history, most recent first.
pub fn display_matches(riot_id: &str, matches: &[MatchMetrics]) {
    let total = matches.len();
    if total == 0 {
        println!("{}", "No stored matches".yellow());
        return;
    }

    let wins = matches.iter().filter(|m| m.win).count();
    let losses = total - wins;
    let win_rate = (wins as f64 / total as f64) * 100.0;

    println!(
        "\n{}",
        format!("📜 MATCH HISTORY for {} (Last {} Games)", riot_id, total)
            .bold()
            .cyan()
    );
    println!(
        "{} {} W / {} L ({:.1}% WR)\n",
        "📈 Overall:".bold(),
        wins.to_string().green(),
        losses.to_string().red(),
        win_rate
    );

    let rows: Vec<MatchRow> = matches
        .iter()
        .map(|m| {
            let result = if m.win {
                "WIN".green().to_string()
            } else {
                "LOSS".red().to_string()
            };

            MatchRow {
                champion: m.champion.clone(),
                role: m.role.to_string(),
                result,
                kda: format!("{}/{}/{}", m.kills, m.deaths, m.assists),
                cs_per_minute: format!("{:.1}", m.cs_per_minute),
                kill_participation: format!("{:.0}%", m.kill_participation * 100.0),
                damage_per_minute: format!("{:.0}", m.damage_dealt_per_minute),
                queue: m.queue.to_string(),
                duration: format!("{}m", m.duration_minutes as i64),
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}
