use clap::Subcommand;

/// Identity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum IdentityCommands {
    /// Register an identity.
    Add {
        #[arg(long)]
        email: String,
        /// Mark the email address as verified.
        #[arg(long)]
        verified: bool,
        /// Provider metadata role, e.g. `client`.
        #[arg(long)]
        metadata_role: Option<String>,
    },
    /// Show an identity by id or email.
    Get {
        #[command(flatten)]
        who: crate::cli::root_commands::IdentityRef,
    },
    /// Mark an identity's email as verified.
    Verify {
        #[command(flatten)]
        who: crate::cli::root_commands::IdentityRef,
    },
}
