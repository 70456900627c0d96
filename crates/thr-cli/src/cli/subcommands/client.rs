use clap::Subcommand;
use thr_core::enums::ClientOrigin;

/// Client record commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ClientCommands {
    /// Create a client record, optionally linked to an identity.
    Add {
        #[arg(long = "org")]
        organization: String,
        #[arg(long)]
        email: String,
        /// Owning identity; omit for a token-only record.
        #[arg(long)]
        identity: Option<String>,
        /// invitation, form_submission, import
        #[arg(long, default_value = "invitation")]
        origin: ClientOrigin,
    },
    /// Soft-delete a client record.
    Delete {
        /// Client record id.
        id: String,
    },
    /// Issue a fresh access token for a client record.
    IssueToken {
        /// Client record id.
        id: String,
        /// Lifetime in hours (defaults to `tokens.default_ttl_hours`).
        #[arg(long)]
        ttl_hours: Option<u32>,
    },
    /// List live client records for an identity.
    List {
        #[arg(long)]
        identity: String,
    },
}
