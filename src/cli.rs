use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "akwam-addon")]
#[command(author, version, about = "Catalog, metadata and stream addon for the Akwam site")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the addon HTTP server
    Start {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve one entry page to a direct link and print it as JSON
    Resolve {
        /// Entry page URL on the upstream site
        #[arg(required = true)]
        url: String,

        /// Title to label the stream with
        #[arg(long, default_value = "entry")]
        title: String,
    },

    /// Decode an opaque catalog id
    Decode {
        /// Token as it appears in catalog, meta or stream paths
        #[arg(required = true)]
        token: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
