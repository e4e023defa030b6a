//! Core CLI definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::format::{BucketArg, OutputFormat};

#[derive(Parser)]
#[command(name = "scrapyard")]
#[command(about = "Item catalog classifier: what to keep, sell or recycle", long_about = None)]
pub struct Cli {
    /// Enable debug logging from the classifier
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read item data from; unset values fall back to the config file
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Data directory holding items/, images/, hideout/, quests/ and projects.json
    #[arg(short, long, env = "SCRAPYARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory that receives servable image copies
    #[arg(long, env = "SCRAPYARD_PUBLIC_DIR")]
    pub public_dir: Option<PathBuf>,

    /// URL prefix recorded for resolved images (e.g. "/arcraiders-data/images")
    #[arg(long)]
    pub image_url_prefix: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify every item into weapon/blueprint/keep/sell/recycle
    #[command(visible_alias = "c")]
    Classify {
        #[command(flatten)]
        data: DataArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List items with sell value, recycle value and bucket
    #[command(visible_alias = "ls")]
    Items {
        #[command(flatten)]
        data: DataArgs,

        /// Only items whose type contains this text
        #[arg(short = 't', long = "type")]
        item_type: Option<String>,

        /// Only items in this bucket
        #[arg(short, long, value_enum)]
        bucket: Option<BucketArg>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Show one item: values, verdict and what references it
    #[command(visible_alias = "s")]
    Show {
        /// Item id, or part of its name
        query: String,

        #[command(flatten)]
        data: DataArgs,
    },

    /// Serve the classification over HTTP
    Serve {
        #[command(flatten)]
        data: DataArgs,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Bind address
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Configure default settings
    Configure {
        /// Set default data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Set default public directory
        #[arg(long)]
        public_dir: Option<PathBuf>,

        /// Set default image URL prefix
        #[arg(long)]
        image_url_prefix: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
