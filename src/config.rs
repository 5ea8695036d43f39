// ⚙️ Configuration - command line flags with environment fallbacks

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::memo::MemoFormat;
use crate::records::FallbackPolicy;

#[derive(Debug, Parser)]
#[command(name = "ynab-memo", version, about = "Turn Amazon order history into YNAB memos")]
pub struct Config {
    /// Amazon order history export (.csv or .json)
    #[arg(long, env = "YNAB_MEMO_EXPORT")]
    pub export: PathBuf,

    /// Memo layout for orders with several items
    #[arg(long, env = "YNAB_MEMO_FORMAT", value_enum, default_value_t = MemoFormat::Plain)]
    pub format: MemoFormat,

    /// Fail on orders the Amazon mapping cannot read instead of validating them raw
    #[arg(long, env = "YNAB_MEMO_STRICT")]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print one memo per order (default)
    Orders,
    /// Print the normalized orders as JSON
    Json,
}

impl Config {
    pub fn fallback_policy(&self) -> FallbackPolicy {
        if self.strict {
            FallbackPolicy::Strict
        } else {
            FallbackPolicy::PassThrough
        }
    }

    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Orders)
    }
}
