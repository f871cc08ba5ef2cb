//! Binary entrypoint for the DeFi Dojo CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and seed the quest catalog
//! - `quests` - list the quest catalog
//! - `start <participant> <quest>` - begin a quest run
//! - `step <participant> <quest> <step>` - complete the next unlocked step
//! - `progress <participant> <quest>` - show run progress and bonus timer
//! - `leaderboard [--limit <n>]` - show the XP leaderboard
//! - `badges <participant>` - list a participant's minted badges
//! - `status` - print catalog and ledger counts
//!
//! See the library crate docs for module-level details: `defidojo::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use defidojo::config::Config;
use defidojo::dojo::{self, DojoStore, DojoStoreBuilder, SystemClock};
use defidojo::validation::{validate_participant_id, validate_quest_slug};

#[derive(Parser)]
#[command(name = "defidojo")]
#[command(about = "Gamified DeFi training quests with XP rewards and badges")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new dojo configuration and seed the quest catalog
    Init,
    /// List the quest catalog
    Quests {
        /// Emit the catalog as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start a quest run for a participant
    Start {
        participant: String,
        quest: String,
    },
    /// Complete the next unlocked step of a run
    Step {
        participant: String,
        quest: String,
        step: u32,
    },
    /// Show a run's progress and remaining bonus time
    Progress {
        participant: String,
        quest: String,
    },
    /// Show the XP leaderboard
    Leaderboard {
        /// Maximum number of entries to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Emit the leaderboard as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List a participant's minted badges
    Badges { participant: String },
    /// Show dojo status and statistics
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Init => {
            info!("Initializing new dojo configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            let config = Config::load(&cli.config).await?;
            let store = open_store(&config)?;
            let seeded = store.seed_catalog_if_needed()?;
            if seeded > 0 {
                info!("Seeded {} canonical quests", seeded);
            }
            println!(
                "Dojo initialized: {} quests in catalog at {}",
                store.list_quest_ids()?.len(),
                config.storage.data_dir
            );
        }
        Commands::Quests { json } => {
            let config = require_config(pre_config, &cli.config).await?;
            let store = open_store(&config)?;
            let quests = dojo::list_quests(&store)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&quests)?);
            } else {
                print!("{}", dojo::format_quest_list(&quests));
            }
        }
        Commands::Start { participant, quest } => {
            let config = require_config(pre_config, &cli.config).await?;
            validate_participant_id(&participant)?;
            validate_quest_slug(&quest)?;
            let store = open_store(&config)?;
            let run = dojo::start_quest(&store, &SystemClock, &participant, &quest)?;
            println!(
                "{} started quest {} at {} (run {})",
                participant,
                quest,
                run.started_at.format("%Y-%m-%dT%H:%M:%SZ"),
                run.run_id
            );
        }
        Commands::Step {
            participant,
            quest,
            step,
        } => {
            let config = require_config(pre_config, &cli.config).await?;
            validate_participant_id(&participant)?;
            validate_quest_slug(&quest)?;
            let store = open_store(&config)?;
            let (run, event) =
                dojo::complete_step(&store, &SystemClock, &participant, &quest, step)?;
            match event {
                Some(event) => println!(
                    "Quest complete! {} earned {} XP ({} base + {} bonus) and badge #{}",
                    participant, event.total_xp, event.base_xp, event.bonus_xp, event.badge_id
                ),
                None => println!(
                    "Step {} complete ({} of {} steps done)",
                    step,
                    run.completed_step_ids.len(),
                    store.get_quest(&quest)?.steps.len()
                ),
            }
        }
        Commands::Progress { participant, quest } => {
            let config = require_config(pre_config, &cli.config).await?;
            validate_participant_id(&participant)?;
            validate_quest_slug(&quest)?;
            let store = open_store(&config)?;
            let snapshot = dojo::get_progress(&store, &SystemClock, &participant, &quest)?;
            let definition = store.get_quest(&quest)?;
            print!("{}", dojo::format_progress(&definition, &snapshot));
        }
        Commands::Leaderboard { limit, json } => {
            let config = require_config(pre_config, &cli.config).await?;
            let store = open_store(&config)?;
            let entries = dojo::top_participants(&store, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", dojo::format_leaderboard(&entries));
            }
        }
        Commands::Badges { participant } => {
            let config = require_config(pre_config, &cli.config).await?;
            validate_participant_id(&participant)?;
            let store = open_store(&config)?;
            let badges = dojo::badges_for(&store, &participant)?;
            if badges.is_empty() {
                println!("{} has no badges yet.", participant);
            } else {
                println!("=== BADGES: {} ===", participant);
                for badge in badges {
                    println!(
                        "#{} {} (minted {})",
                        badge.badge_id,
                        badge.quest_id,
                        badge.minted_at.format("%Y-%m-%d")
                    );
                }
            }
        }
        Commands::Status => {
            let config = require_config(pre_config, &cli.config).await?;
            let store = open_store(&config)?;
            let quests = store.list_quest_ids()?.len();
            let participants = store.list_ledger()?.len();
            println!("Dojo: {}", config.dojo.name);
            println!("Sensei: {}", store.authority()?);
            println!("Quests in catalog: {}", quests);
            println!("Participants with XP: {}", participants);
        }
    }

    Ok(())
}

async fn require_config(pre_config: Option<Config>, path: &str) -> Result<Config> {
    match pre_config {
        Some(config) => Ok(config),
        None => Config::load(path).await,
    }
}

fn open_store(config: &Config) -> Result<DojoStore> {
    let path = format!("{}/dojo", config.storage.data_dir);
    Ok(DojoStoreBuilder::new(path)
        .with_authority(&config.dojo.sensei)
        .open()?)
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => match config.as_ref().map(|c| c.logging.level.as_str()) {
            Some("error") => log::LevelFilter::Error,
            Some("warn") => log::LevelFilter::Warn,
            Some("debug") => log::LevelFilter::Debug,
            Some("trace") => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        },
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // If stdout is a TTY, mirror log lines to the console as well.
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }

    let _ = builder.try_init();
}
