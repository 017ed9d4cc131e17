//! Butterfly CLI - every screen of Butterfly Earth from the terminal

mod commands;

use anyhow::Result;
use butterfly_core::{AppConfig, Topic};
use clap::{Parser, Subcommand};
use commands::{carbon, card, chat, globe, hub, landing, quiz};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "butterfly")]
#[command(about = "Climate quizzes, badges and a spinning Earth", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Without a command, show the landing page
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the topic hub with earned badges
    Hub,

    /// Show the badge inventory
    Badges,

    /// Take a topic quiz
    Quiz {
        /// Topic name or key (e.g. "deforestation", "Air Quality")
        #[arg(value_parser = parse_topic)]
        topic: Topic,

        /// Read `<dir>/<topic>.json` instead of calling the question service
        #[arg(long)]
        questions_dir: Option<PathBuf>,
    },

    /// Watch a topic's briefing before its quiz
    Briefing {
        #[arg(value_parser = parse_topic)]
        topic: Topic,

        /// Read `<dir>/<topic>.json` instead of calling the question service
        #[arg(long)]
        questions_dir: Option<PathBuf>,
    },

    /// Answer the Climate Champions flashcard
    Card,

    /// Open the globe window
    Globe {
        /// Fixed texture seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Generate the planet maps and write them as PNGs
    Textures {
        /// Output directory
        #[arg(short, long, default_value = "textures")]
        out: PathBuf,

        /// Fixed texture seed
        #[arg(long)]
        seed: Option<u64>,

        /// Map width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Map height in pixels
        #[arg(long)]
        height: Option<u32>,
    },

    /// Talk to the assistant; interactive without a message
    Chat {
        message: Option<String>,
    },

    /// Estimate a yearly carbon footprint; asks for each habit without flags
    Carbon {
        /// Daily commute distance (km)
        #[arg(long)]
        distance: Option<String>,

        /// Monthly electricity consumption (kWh)
        #[arg(long)]
        electricity: Option<String>,

        /// Waste generated per week (kg)
        #[arg(long)]
        waste: Option<String>,

        /// Meals per day
        #[arg(long)]
        meals: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Go to any route path (e.g. "/quiz3", "/level1")
    Open {
        path: String,
    },

    /// List every route
    Routes,
}

fn parse_topic(s: &str) -> Result<Topic, String> {
    s.parse::<Topic>().map_err(|e| {
        let known: Vec<&str> = Topic::ALL.iter().map(|t| t.key()).collect();
        format!("{}; valid topics: {}", e, known.join(", "))
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load()?;
    log::debug!("Config: {:?}", config);

    match cli.command {
        None => landing::run(),
        Some(Commands::Hub) => hub::run(&config),
        Some(Commands::Badges) => hub::badges(&config),
        Some(Commands::Quiz {
            topic,
            questions_dir,
        }) => quiz::run(&config, topic, questions_dir.as_deref()),
        Some(Commands::Briefing {
            topic,
            questions_dir,
        }) => quiz::briefing(&config, topic, questions_dir.as_deref()),
        Some(Commands::Card) => card::run(),
        Some(Commands::Globe { seed }) => globe::run(&config, seed),
        Some(Commands::Textures {
            out,
            seed,
            width,
            height,
        }) => globe::textures(
            &config,
            globe::TextureArgs {
                out,
                seed,
                width,
                height,
            },
        ),
        Some(Commands::Chat { message }) => chat::run(&config, message.as_deref()),
        Some(Commands::Carbon {
            distance,
            electricity,
            waste,
            meals,
            json,
        }) => carbon::run(carbon::CarbonArgs {
            distance,
            electricity,
            waste,
            meals,
            json,
        }),
        Some(Commands::Open { path }) => landing::open(&config, &path),
        Some(Commands::Routes) => landing::routes(),
    }
}
