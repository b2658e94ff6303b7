//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Referral genealogy: who recruited whom, ranked by influence
#[derive(Parser, Debug)]
#[command(name = "genealogy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Constituents snapshot (JSON), overrides the configured one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the referral forest as a tree
    Tree {
        /// Collapse these constituents (repeatable)
        #[arg(short, long, value_name = "ID")]
        collapse: Vec<String>,
        /// Start with every node collapsed
        #[arg(long, conflicts_with = "collapse")]
        collapsed: bool,
        /// Start with every node expanded, overriding `expanded_by_default`
        #[arg(long, conflicts_with = "collapsed")]
        expanded: bool,
        /// Draw at most this many levels
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },

    /// List the most influential recruiters
    Rank {
        /// Number of recruiters (default: config `top`)
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Show the referral chain from a constituent up to its root
    Chain {
        /// Constituent identity
        id: String,
    },

    /// Summarize the forest
    Stats {
        /// List every recovered data anomaly
        #[arg(short, long)]
        anomalies: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
