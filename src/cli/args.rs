//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};
use clap_complete::Shell;

use crate::config::CandidateLocation;

/// Propagate glosses between FLEx LIFT lexicon exports
#[derive(Parser, Debug)]
#[command(name = "liftsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files to process: a single file is pretty-printed to stdout; with
    /// two or more, the first supplies glosses and the rest are updated
    #[arg(required_unless_present = "generator", num_args = 1.., value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Language of the glosses to copy (default: the source headword language)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Field type marking a cross-reference in the source [default: CAWL]
    #[arg(long, value_name = "TYPE")]
    pub source_type: Option<String>,

    /// Field type marking a cross-reference in the targets [default: CAWL]
    #[arg(long, value_name = "TYPE")]
    pub target_type: Option<String>,

    /// Where candidate text is taken from (repeatable) [default: headword]
    #[arg(long, value_enum, value_name = "LOCATION")]
    pub copy_from: Vec<CandidateLocation>,

    /// Enable debug output (-d: info, -dd: debug, -ddd: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,
}
