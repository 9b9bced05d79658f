use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use neurograph::QualityTier;

/// Diagnostics for the neurograph knowledge-graph renderer.
///
/// Every command prints JSON on stdout; logs go to stderr (`RUST_LOG`).
#[derive(Parser, Debug)]
#[command(name = "neurograph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether a GPU rendering context can be created
    Probe,

    /// Print the 3D position of every node
    Layout {
        /// Graph file (.json, .yaml or .yml)
        graph: PathBuf,
    },

    /// Print the nodes and relationships submitted in one frame
    Select {
        /// Graph file (.json, .yaml or .yml)
        graph: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        interaction: InteractionArgs,
    },

    /// Run the engine for a number of frames and print its status
    Render {
        /// Graph file (.json, .yaml or .yml)
        graph: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        interaction: InteractionArgs,

        /// Frames to run
        #[arg(long, default_value_t = 60)]
        frames: u32,

        /// Simulated display refresh rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Render on the GPU instead of recording draw lists
        #[arg(long)]
        gpu: bool,
    },
}

/// Engine configuration: a file plus overrides
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Engine configuration file (.yaml, .yml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Nodes submitted per frame
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Initial (and highest) quality tier
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,
}

/// Interaction state to apply before selecting or rendering
#[derive(Args, Debug, Clone, Default)]
pub struct InteractionArgs {
    /// Id of the selected node
    #[arg(long)]
    pub selected: Option<String>,

    /// Id of the hovered node
    #[arg(long)]
    pub hovered: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityArg {
    Low,
    Medium,
    High,
}

impl From<QualityArg> for QualityTier {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Low => QualityTier::Low,
            QualityArg::Medium => QualityTier::Medium,
            QualityArg::High => QualityTier::High,
        }
    }
}
