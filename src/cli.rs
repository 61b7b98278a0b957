//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

use crate::build_info;

/// Discover, preview, and apply Starship prompt themes from the community hub.
#[derive(Debug, Parser)]
#[command(name = "nebula", version = build_info::VERSION, after_help = build_info::HELP_BUILD_METADATA)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Override the hub base URL.
    #[arg(long = "hub-url", global = true, value_name = "URL")]
    pub hub_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply a theme, downloading it into the cache if needed.
    Apply {
        /// Theme identifier, e.g. alice/rainbow or alice/rainbow@1.2.
        identifier: String,
        /// Skip the risky-content confirmation prompt.
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Preview a theme in a new terminal window without applying it.
    Preview {
        /// Theme identifier, e.g. alice/rainbow or alice/rainbow@1.2.
        identifier: String,
    },

    /// List all cached themes.
    List,

    /// Show the currently applied theme.
    Current,

    /// Switch back to the previously applied theme.
    Rollback,

    /// Remove a cached theme.
    Remove {
        /// Theme identifier, e.g. alice/rainbow or alice/rainbow@1.2.
        identifier: String,
        /// Remove every cached version of the theme.
        #[arg(long = "all-versions")]
        all_versions: bool,
        /// Remove even the currently active theme.
        #[arg(short = 'f', long = "force")]
        force: bool,
    },

    /// Remove cached themes, keeping the active one.
    Clean {
        /// Remove everything, including the active theme.
        #[arg(long = "all")]
        all: bool,
    },

    /// Show hub metadata for a theme.
    Info {
        /// Theme identifier, e.g. alice/rainbow.
        identifier: String,
    },

    /// Update the nebula binary to the latest release.
    Update,
}
