use clap::Subcommand;
use thr_core::enums::HintContext;

/// Stored hint commands.
#[derive(Clone, Debug, Subcommand)]
pub enum HintCommands {
    /// Persist a hint for the next resolution.
    Set {
        #[arg(long)]
        context: HintContext,
        #[arg(long = "org")]
        organization: String,
    },
    /// Drop the stored hint.
    Clear,
}
