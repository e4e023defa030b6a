//! Output selection shared by listing commands

use scrapyard::Bucket;

/// Output format for listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Bucket filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BucketArg {
    Weapon,
    Blueprint,
    Keep,
    Sell,
    Recycle,
}

impl From<BucketArg> for Bucket {
    fn from(arg: BucketArg) -> Self {
        match arg {
            BucketArg::Weapon => Bucket::Weapon,
            BucketArg::Blueprint => Bucket::Blueprint,
            BucketArg::Keep => Bucket::Keep,
            BucketArg::Sell => Bucket::Sell,
            BucketArg::Recycle => Bucket::Recycle,
        }
    }
}
