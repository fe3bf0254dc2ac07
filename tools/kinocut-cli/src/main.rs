//! Kinocut CLI — inspect encoder combinations, timeline layout, and presets.
//!
//! Usage:
//!   kinocut combinations <REGISTRY>   Show muxer/encoder combinations
//!   kinocut layout <TIMELINE>         Compute screen geometry for a timeline
//!   kinocut presets                   List saved render presets

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "kinocut",
    about = "Timeline layout and render compatibility tooling",
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
    /// Show every displayable muxer/encoder combination in a registry snapshot
    Combinations {
        /// Path to a registry snapshot (JSON array of element descriptors)
        registry: PathBuf,

        /// Only show combinations for this muxer factory
        #[arg(long)]
        muxer: Option<String>,
    },

    /// Compute screen geometry for a timeline file
    Layout {
        /// Path to a timeline file (JSON)
        timeline: PathBuf,

        /// Zoom level (0 = furthest out)
        #[arg(long)]
        zoom: Option<u32>,

        /// Canvas width in pixels, used for best-fit zoom and scrolling
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Playhead position in nanoseconds
        #[arg(long, default_value = "0")]
        playhead: u64,
    },

    /// List saved render presets
    Presets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    kinocut_common::logging::init_logging(&kinocut_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
    });

    match cli.command {
        Commands::Combinations { registry, muxer } => {
            commands::combinations::run(registry, muxer)
        }
        Commands::Layout {
            timeline,
            zoom,
            width,
            playhead,
        } => commands::layout::run(timeline, zoom, width, playhead),
        Commands::Presets => commands::presets::run(),
    }
}
