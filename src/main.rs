mod adapter;
mod analytics;
mod api;
mod config;
mod display;
mod error;
mod export;
mod model;
mod store;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;

use analytics::{filter, Thresholds};
use api::lol::LolApiClient;
use api::playvs::PlayVsClient;
use api::riot::RiotApiClient;
use config::Config;
use display::output::{
    display_analytics, display_error, display_info, display_matches, display_role_thresholds,
    display_success,
};
use error::AppError;
use model::{Role, Team};
use store::Store;

#[derive(Parser, Debug)]
#[command(name = "lolscout")]
#[command(about = "Scout League of Legends players and PlayVS teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// League of Legends match history
    Lol {
        #[command(subcommand)]
        command: LolCommand,
    },
    /// Store-wide per-role percentile thresholds
    Thresholds {
        /// Central coverage used to derive cutoffs, in (0, 1)
        #[arg(long, default_value_t = analytics::DEFAULT_CONFIDENCE)]
        percentile: f64,
    },
    /// PlayVS teams and rosters
    Playvs {
        #[command(subcommand)]
        command: PlayVsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LolCommand {
    /// Scan recent matches into the local store
    Scan {
        /// Riot ID (Name#TAG)
        riot_id: String,

        /// How far back to scan
        #[arg(long, value_enum, default_value_t = ScanWindow::Month)]
        window: ScanWindow,
    },
    /// Analyze stored matches by role and champion
    Analyze {
        /// Riot ID (Name#TAG)
        riot_id: String,

        /// Central coverage used to derive cutoffs, in (0, 1)
        #[arg(long, default_value_t = analytics::DEFAULT_CONFIDENCE)]
        percentile: f64,

        /// Season cutoff (RFC 3339); only matches after this date count
        #[arg(long)]
        since: Option<DateTime<Utc>>,
    },
    /// Show stored match history
    Matches {
        /// Riot ID (Name#TAG)
        riot_id: String,

        /// Number of matches to show
        #[arg(long, default_value = "20")]
        count: usize,
    },
    /// Export stored matches to CSV
    Export {
        /// Riot ID (Name#TAG)
        riot_id: String,

        /// Output file
        file: PathBuf,

        /// Only export matches after this date (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,
    },
}

#[derive(Subcommand, Debug)]
enum PlayVsCommand {
    /// All PlayVS teams
    Teams {
        #[command(subcommand)]
        command: TeamsCommand,
    },
    /// One PlayVS team
    Team {
        #[command(subcommand)]
        command: TeamCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TeamsCommand {
    /// Initialize teams and players from PlayVS rosters
    Init,
    /// List stored teams
    List,
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    /// Show team information
    Info {
        /// PlayVS team id
        id: String,
    },
    /// Scan recent matches for every player on the team
    Scan {
        /// PlayVS team id
        id: String,

        /// How far back to scan
        #[arg(long, value_enum, default_value_t = ScanWindow::Month)]
        window: ScanWindow,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScanWindow {
    Day,
    Week,
    Month,
    Year,
}

impl ScanWindow {
    fn start_time(self) -> DateTime<Utc> {
        let days = match self {
            ScanWindow::Day => 1,
            ScanWindow::Week => 7,
            ScanWindow::Month => 30,
            ScanWindow::Year => 365,
        };

        Utc::now() - Duration::days(days)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env()?;

    match cli.command {
        Command::Lol { command } => match command {
            LolCommand::Scan { riot_id, window } => {
                scan_player(&config, &riot_id, window.start_time())
            }
            LolCommand::Analyze {
                riot_id,
                percentile,
                since,
            } => analyze_player(
                &config,
                &riot_id,
                percentile,
                since.unwrap_or_else(model::season_start),
            ),
            LolCommand::Matches { riot_id, count } => show_matches(&config, &riot_id, count),
            LolCommand::Export {
                riot_id,
                file,
                since,
            } => export_player(&config, &riot_id, &file, since),
        },
        Command::Thresholds { percentile } => show_role_thresholds(&config, percentile),
        Command::Playvs { command } => match command {
            PlayVsCommand::Teams { command } => match command {
                TeamsCommand::Init => init_playvs_teams(&config),
                TeamsCommand::List => list_playvs_teams(&config),
            },
            PlayVsCommand::Team { command } => match command {
                TeamCommand::Info { id } => playvs_team_info(&config, &id),
                TeamCommand::Scan { id, window } => {
                    scan_playvs_team(&config, &id, window.start_time())
                }
            },
        },
    }
}

fn validate_confidence(confidence: f64) -> Result<(), AppError> {
    if confidence > 0.0 && confidence < 1.0 {
        Ok(())
    } else {
        Err(AppError::ConfigError(format!(
            "percentile must be between 0 and 1, got {}",
            confidence
        )))
    }
}

/// Fetches and stores matches started after `cutoff` for one account.
/// Returns how many new records were stored.
fn scan_account(
    lol: &LolApiClient,
    store: &mut Store,
    puuid: &str,
    game_name: &str,
    tag_line: &str,
    cutoff: DateTime<Utc>,
) -> Result<usize, AppError> {
    let match_ids = lol.get_match_ids_since(puuid, &model::SCANNED_QUEUES, cutoff)?;

    display_info(&format!(
        "Got {} matches for {}",
        match_ids.len(),
        model::join_riot_id(game_name, tag_line)
    ));

    // Skip matches already stored before spending requests on details.
    let known: HashSet<String> = store
        .player_by_puuid(puuid)
        .map(|p| p.metrics.iter().map(|m| m.match_id.clone()).collect())
        .unwrap_or_default();

    let new_ids: Vec<String> = match_ids
        .into_iter()
        .filter(|id| !known.contains(id))
        .collect();

    let mut metrics = Vec::new();

    if !new_ids.is_empty() {
        let pb = ProgressBar::new(new_ids.len() as u64);
        pb.set_message("Fetching match details");

        for match_id in &new_ids {
            let match_data = lol.get_match(match_id)?;
            pb.inc(1);

            if let Some(m) = adapter::match_metrics(&match_data, puuid) {
                metrics.push(m);
            }
        }

        pb.finish_with_message("✓ Match data fetched");
    }

    let scanned = metrics.len();
    let player = store.ensure_player(puuid, game_name, tag_line);
    let added = player.append_metrics(metrics);

    display_success(&format!(
        "Saving {} new matches ({} duplicates)",
        added,
        scanned - added
    ));

    Ok(added)
}

fn scan_player(config: &Config, riot_id: &str, cutoff: DateTime<Utc>) -> Result<(), AppError> {
    let (game_name, tag_line) = model::split_riot_id(riot_id)?;

    let riot = RiotApiClient::new(config);
    let lol = LolApiClient::new(config);

    display_info(&format!("Fetching account for {}", riot_id));
    let account = riot.get_account(&game_name, &tag_line)?;

    let summoner = lol.get_summoner(&account.puuid)?;
    display_info(&format!("Summoner level {}", summoner.summoner_level));

    let mut store = Store::open(&config.db_path)?;

    scan_account(
        &lol,
        &mut store,
        &account.puuid,
        &account.game_name,
        &account.tag_line,
        cutoff,
    )?;

    store.save()
}

fn analyze_player(
    config: &Config,
    riot_id: &str,
    confidence: f64,
    cutoff: DateTime<Utc>,
) -> Result<(), AppError> {
    validate_confidence(confidence)?;

    let (game_name, tag_line) = model::split_riot_id(riot_id)?;

    let store = Store::open(&config.db_path)?;

    let player = store
        .player_by_riot_id(&game_name, &tag_line)
        .ok_or_else(|| AppError::PlayerNotFound(riot_id.to_string()))?;

    let season = filter::since(&player.metrics, cutoff);
    if season.is_empty() {
        return Err(AppError::NoMatches);
    }

    display_info(&format!(
        "Analyzing {} matches since {}",
        season.len(),
        cutoff.format("%Y-%m-%d")
    ));

    // Store-wide baselines supply the cutoffs each group is measured against;
    // groups without a baseline fall back to the general defaults.
    let baseline = store.all_metrics();
    let general = Thresholds::general();

    let role_thresholds: HashMap<Role, Thresholds> = analytics::analyze_by_role(&baseline)
        .into_iter()
        .map(|(role, a)| (role, Thresholds::from_analytics(&a, confidence)))
        .collect();

    let champion_thresholds: HashMap<String, Thresholds> =
        analytics::analyze_by_champion(&baseline)
            .into_iter()
            .map(|(champion, a)| (champion, Thresholds::from_analytics(&a, confidence)))
            .collect();

    let by_role = analytics::analyze_by_role(&season);
    let mut roles: Vec<Role> = by_role.keys().copied().collect();
    roles.sort();

    for role in roles {
        let thresholds = role_thresholds.get(&role).unwrap_or(&general);
        display_analytics(&role.to_string(), &by_role[&role], thresholds);
    }

    let by_champion = analytics::analyze_by_champion(&season);
    let mut champions: Vec<String> = by_champion.keys().cloned().collect();
    champions.sort();

    for champion in champions {
        let thresholds = champion_thresholds.get(&champion).unwrap_or(&general);
        display_analytics(&champion, &by_champion[&champion], thresholds);
    }

    Ok(())
}

fn show_matches(config: &Config, riot_id: &str, count: usize) -> Result<(), AppError> {
    let (game_name, tag_line) = model::split_riot_id(riot_id)?;

    let store = Store::open(&config.db_path)?;

    let player = store
        .player_by_riot_id(&game_name, &tag_line)
        .ok_or_else(|| AppError::PlayerNotFound(riot_id.to_string()))?;

    let mut matches = player.metrics.clone();
    matches.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    matches.truncate(count);

    display_matches(riot_id, &matches);

    Ok(())
}

fn export_player(
    config: &Config,
    riot_id: &str,
    file: &Path,
    since: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    let (game_name, tag_line) = model::split_riot_id(riot_id)?;

    let store = Store::open(&config.db_path)?;

    let player = store
        .player_by_riot_id(&game_name, &tag_line)
        .ok_or_else(|| AppError::PlayerNotFound(riot_id.to_string()))?;

    let records = match since {
        Some(cutoff) => filter::since(&player.metrics, cutoff),
        None => player.metrics.clone(),
    };

    if records.is_empty() {
        return Err(AppError::NoMatches);
    }

    export::write_metrics(file, &records)?;
    display_success(&format!(
        "Wrote {} matches to {}",
        records.len(),
        file.display()
    ));

    Ok(())
}

fn show_role_thresholds(config: &Config, confidence: f64) -> Result<(), AppError> {
    validate_confidence(confidence)?;

    let store = Store::open(&config.db_path)?;

    let rows: Vec<(Role, Thresholds)> = model::ROLES
        .iter()
        .map(|&role| {
            let group = store.metrics_for_role(role);

            let thresholds = if group.len() >= analytics::MIN_SAMPLES {
                analytics::analyze(&group)
                    .map(|a| Thresholds::from_analytics(&a, confidence))
                    .unwrap_or_else(|_| Thresholds::general())
            } else {
                Thresholds::general()
            };

            (role, thresholds)
        })
        .collect();

    display_role_thresholds(&rows);

    Ok(())
}

fn init_playvs_teams(config: &Config) -> Result<(), AppError> {
    let riot = RiotApiClient::new(config);
    let playvs = PlayVsClient::new();

    let mut store = Store::open(&config.db_path)?;

    let teams = playvs.teams()?;
    display_success(&format!("Found {} teams", teams.len()));

    for team in teams {
        display_info(&format!("Initializing {} ({})", team.name, team.state));

        let riot_ids = playvs.roster_riot_ids(&team.id)?;

        for riot_id in riot_ids {
            let (game_name, tag_line) = match model::split_riot_id(&riot_id) {
                Ok(parts) => parts,
                Err(_) => {
                    display_error(&format!("bad riot id format {}", riot_id));
                    continue;
                }
            };

            let account = match riot.get_account(&game_name, &tag_line) {
                Ok(account) => account,
                Err(e) => {
                    display_error(&format!("could not find riot id {}: {}", riot_id, e));
                    continue;
                }
            };

            let player = store.ensure_player(
                &account.puuid,
                &account.game_name,
                &account.tag_line,
            );
            player.team_id = Some(team.id.clone());
        }

        store.upsert_team(Team {
            id: team.id,
            name: team.name,
        });
    }

    store.save()
}

fn list_playvs_teams(config: &Config) -> Result<(), AppError> {
    let store = Store::open(&config.db_path)?;

    if store.teams().is_empty() {
        display_info("No stored teams; run `lolscout playvs teams init` first");
        return Ok(());
    }

    for team in store.teams() {
        println!("{}: {}", team.name, team.id);
    }

    Ok(())
}

fn playvs_team_info(config: &Config, team_id: &str) -> Result<(), AppError> {
    let store = Store::open(&config.db_path)?;

    let team = store
        .team_by_id(team_id)
        .ok_or_else(|| AppError::TeamNotFound(team_id.to_string()))?;

    println!("{}: {}", team.name, team.id);

    for player in store.players_on_team(team_id) {
        println!("{}", player.riot_id());
    }

    Ok(())
}

fn scan_playvs_team(config: &Config, team_id: &str, cutoff: DateTime<Utc>) -> Result<(), AppError> {
    let lol = LolApiClient::new(config);
    let mut store = Store::open(&config.db_path)?;

    let team_name = store
        .team_by_id(team_id)
        .ok_or_else(|| AppError::TeamNotFound(team_id.to_string()))?
        .name
        .clone();

    display_info(&format!("Scanning team {}", team_name));

    let members: Vec<(String, String, String)> = store
        .players_on_team(team_id)
        .iter()
        .map(|p| (p.puuid.clone(), p.game_name.clone(), p.tag_line.clone()))
        .collect();

    if members.is_empty() {
        return Err(AppError::ApiError(
            "team has no players; run `lolscout playvs teams init` first".to_string(),
        ));
    }

    for (puuid, game_name, tag_line) in members {
        scan_account(&lol, &mut store, &puuid, &game_name, &tag_line, cutoff)?;
    }

    store.save()
}
