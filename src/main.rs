//! Space Scavenger headless runner
//!
//! Plays one session with the autopilot at the controls, forwarding sounds to
//! a logging backend and recording the final score.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use space_scavenger::Game;
use space_scavenger::audio::{AudioManager, LogBackend};
use space_scavenger::highscores::RecordsFile;
use space_scavenger::settings::Settings;
use space_scavenger::sim::Level;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level to play (0 = training, 4 = endless)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=4))]
    level: u8,

    /// RNG seed (defaults to the clock)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many ticks if the session hasn't ended
    #[arg(short, long, default_value_t = 60 * 60 * 5)]
    ticks: u64,

    /// Records file (overrides the settings file)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Settings file
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// Zero the record for --level and exit
    #[arg(long)]
    reset: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(level) = Level::new(args.level) else {
        log::error!("No such level: {}", args.level);
        return ExitCode::FAILURE;
    };

    let settings = Settings::load(&args.settings);
    let records_path = args.records.unwrap_or_else(|| settings.records_path.clone());
    let mut records = RecordsFile::open(records_path);

    if args.reset {
        return match records.reset(level) {
            Ok(()) => {
                println!("Record for level {level} reset");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let previous_best = records.records().best(level);
    let seed = args.seed.unwrap_or_else(clock_seed);
    log::info!("{} (seed {seed})", level.title());
    log::info!("Quality preset: {}", settings.quality.as_str());

    let audio = AudioManager::from_settings(LogBackend, &settings);
    let mut game = Game::new(settings.session_config(level, seed), audio, records);
    game.apply_settings(&settings);
    game.set_idle_mode(true);

    while !game.is_over() && game.session().time_ticks < args.ticks {
        game.step();
    }

    let session = game.session();
    let result = match session.outcome() {
        Some(outcome) => format!("{outcome:?}"),
        None => "Time up".to_string(),
    };
    println!("{result} after {} ticks", session.time_ticks);
    println!("{}", session.status_line());
    println!("{}", session.goal_line());

    let best = game.scores().records().best(level);
    if best > previous_best {
        println!("New record: {best}");
    } else {
        println!("Record: {best}");
    }

    ExitCode::SUCCESS
}
