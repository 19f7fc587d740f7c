use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = "rapi")]
#[command(about = "Generates RSS and Atom feeds from WordPress REST APIs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve every configured website and write its feeds
    Run {
        /// Path to the configuration file
        #[arg(env = "RAPI_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Folder to write feeds into, overriding the configuration file
        #[arg(short, long)]
        destination: Option<PathBuf>,

        /// Dry run - render feeds but don't write them
        #[arg(long)]
        dry_run: bool,
    },

    /// Discover the REST API and favicon of a website
    Discover {
        /// Website root URL
        url: String,
    },
}
