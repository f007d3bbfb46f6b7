//! Tosoku CLI: headless replay and scenario tooling.
//!
//! Usage:
//!   tosoku play <SCENARIO> <TRACE>     Replay a recorded trace as a run
//!   tosoku synth <OUTPUT> --speed S    Write a constant-speed trace
//!   tosoku identity <SCENARIO>         Print the scenario identity
//!   tosoku encode <SCENARIO>           Print a TSK1: share code
//!   tosoku decode <CODE>               Decode a share code to JSON
//!   tosoku info <SCENARIO>             Show scenario details
//!   tosoku history                     List recent runs
//!   tosoku library                     List saved scenarios
//!
//! `<SCENARIO>` is either a JSON file or a `TSK1:` share code.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tosoku_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "tosoku",
    about = "Speed-tracking aim trainer: replay, scoring, and scenario tools",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace through a scenario and score it
    Play {
        /// Scenario file or TSK1: share code
        scenario: String,

        /// Trace file (JSONL)
        trace: PathBuf,

        /// Run mode
        #[arg(long, value_enum, default_value = "challenge")]
        mode: ModeArg,

        /// Run history file (defaults to the data directory)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Do not write the result to history or the library
        #[arg(long)]
        no_save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a constant-speed synthetic trace
    Synth {
        /// Output trace file
        output: PathBuf,

        /// Speed in counts per second
        #[arg(long)]
        speed: f64,

        /// Trace length in seconds
        #[arg(long, default_value = "12.0")]
        seconds: f64,

        /// Frame rate in Hz
        #[arg(long, default_value = "144")]
        hz: u32,

        /// Movement axis
        #[arg(long, value_enum, default_value = "x")]
        axis: AxisArg,
    },

    /// Print the identity hash of a scenario
    Identity {
        /// Scenario file or TSK1: share code
        scenario: String,
    },

    /// Encode a scenario as a TSK1: share code
    Encode {
        /// Scenario file or TSK1: share code
        scenario: String,
    },

    /// Decode a TSK1: share code
    Decode {
        /// Share code
        code: String,

        /// Write the scenario JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Add the scenario to the library's imported list
        #[arg(long)]
        import: bool,
    },

    /// Show scenario details and its target curve
    Info {
        /// Scenario file or TSK1: share code
        scenario: String,

        /// Number of points sampled along the target curve
        #[arg(long, default_value = "11")]
        samples: usize,
    },

    /// List recent runs
    History {
        /// Run history file (defaults to the data directory)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Maximum runs to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List saved, recent, and imported scenarios
    Library {
        /// Library file (defaults to the data directory)
        #[arg(long)]
        library: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Challenge,
    Warmup,
}

#[derive(Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Xy,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    tosoku_common::logging::init_logging(&logging);
    config.validate()?;

    match cli.command {
        Commands::Play {
            scenario,
            trace,
            mode,
            history,
            no_save,
            json,
        } => commands::play::run(
            &config,
            &scenario,
            trace,
            mode.into(),
            history,
            !no_save,
            json,
        ),
        Commands::Synth {
            output,
            speed,
            seconds,
            hz,
            axis,
        } => commands::synth::run(output, speed, seconds, hz, axis.into()),
        Commands::Identity { scenario } => commands::identity::run(&scenario),
        Commands::Encode { scenario } => commands::share::encode(&scenario),
        Commands::Decode {
            code,
            output,
            import,
        } => commands::share::decode(&config, &code, output, import),
        Commands::Info { scenario, samples } => commands::info::run(&config, &scenario, samples),
        Commands::History { history, limit } => commands::history::run(&config, history, limit),
        Commands::Library { library } => commands::library::run(&config, library),
    }
}

impl From<ModeArg> for tosoku_run_scorer::RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Challenge => Self::Challenge,
            ModeArg::Warmup => Self::Warmup,
        }
    }
}

impl From<AxisArg> for tosoku_scenario_model::TraceAxis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::X => Self::X,
            AxisArg::Y => Self::Y,
            AxisArg::Xy => Self::Diagonal,
        }
    }
}
