//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use unveil_core::config::Config;
use unveil_core::interrupt;
use unveil_core::logging::{self, LogTarget};
use unveil_core::prefs::Mode;
use unveil_core::script::TimingProfile;

mod commands;

#[derive(Parser)]
#[command(name = "unveil")]
#[command(version)]
#[command(about = "Staged typewriter demos in your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    source: SourceArgs,
}

/// Which script to play and how.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Script id from the catalog (default: `default_script` from config)
    #[arg(long, short, value_name = "ID")]
    pub script: Option<String>,

    /// Play a script file instead of a catalog entry
    #[arg(long, value_name = "PATH", conflicts_with = "script")]
    pub file: Option<PathBuf>,

    /// Override the script's timing profile (terminal, evolution, compact)
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<TimingProfile>,

    /// Advance stages on the autoplay interval
    #[arg(long)]
    pub autoplay: bool,
}

impl SourceArgs {
    fn is_empty(&self) -> bool {
        self.script.is_none() && self.file.is_none() && self.profile.is_none() && !self.autoplay
    }

    /// Fills anything unset here from options given before the subcommand.
    fn merge(self, outer: Self) -> Result<Self> {
        let merged = Self {
            script: self.script.or(outer.script),
            file: self.file.or(outer.file),
            profile: self.profile.or(outer.profile),
            autoplay: self.autoplay || outer.autoplay,
        };
        if merged.script.is_some() && merged.file.is_some() {
            bail!("--script cannot be used with --file");
        }
        Ok(merged)
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Play a script in the full-screen player (default)
    Play {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Play a script headless, printing lines as they finish
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Skip the waiting and jump from deadline to deadline
        #[arg(long)]
        instant: bool,

        /// Print the final playback state as JSON instead of lines
        #[arg(long)]
        json: bool,
    },
    /// Inspect the script catalog
    Scripts {
        #[command(subcommand)]
        command: ScriptCommands,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print or save the colour mode
    Mode {
        /// light or dark
        #[arg(value_name = "MODE")]
        mode: Option<Mode>,
    },
    /// Ask the canned chat assistant a question
    Ask {
        #[arg(value_name = "TEXT", required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

#[derive(clap::Subcommand)]
enum ScriptCommands {
    /// Lists built-in and user scripts
    List,
    /// Shows the stages and lines of a script
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Checks a script file without playing it
    Validate {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Rewrite the config on the latest template, keeping your values
    Upgrade,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    interrupt::init()?;

    let config = Config::load().context("load config")?;
    let target = if is_player(cli.command.as_ref()) {
        LogTarget::File(config.logging.directory())
    } else {
        LogTarget::Stderr
    };
    let _log_guard = logging::init(&config.logging.level, target)?;

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli, &config).await })
}

fn is_player(command: Option<&Commands>) -> bool {
    matches!(command, None | Some(Commands::Play { .. }))
}

async fn dispatch(cli: Cli, config: &Config) -> Result<()> {
    let Cli { command, source } = cli;

    // default to the player
    let Some(command) = command else {
        return commands::play::run(&source, config);
    };

    let outer = source;
    if !outer.is_empty() && !matches!(command, Commands::Play { .. } | Commands::Run { .. }) {
        bail!("--script, --file, --profile and --autoplay only apply to `play` and `run`");
    }

    match command {
        Commands::Play { source } => commands::play::run(&source.merge(outer)?, config),
        Commands::Run {
            source,
            instant,
            json,
        } => commands::run::run(&source.merge(outer)?, config, instant, json).await,
        Commands::Scripts { command } => match command {
            ScriptCommands::List => commands::scripts::list(config),
            ScriptCommands::Show { id } => commands::scripts::show(&id, config),
            ScriptCommands::Validate { path } => commands::scripts::validate(&path, config),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Upgrade => commands::config::upgrade(),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Commands::Mode { mode } => commands::mode::run(mode),
        Commands::Ask { text } => {
            commands::ask::run(&text.join(" "));
            Ok(())
        }
    }
}
