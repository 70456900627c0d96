use clap::Subcommand;
use thr_core::enums::StaffRole;

/// Staff membership commands.
#[derive(Clone, Debug, Subcommand)]
pub enum MemberCommands {
    /// Add (or restore) a staff membership.
    Add {
        #[arg(long)]
        identity: String,
        #[arg(long = "org")]
        organization: String,
        /// owner, admin, member
        #[arg(long, default_value = "member")]
        role: StaffRole,
    },
    /// Remove a staff membership.
    Remove {
        #[arg(long)]
        identity: String,
        #[arg(long = "org")]
        organization: String,
    },
    /// List live staff memberships for an identity.
    List {
        #[arg(long)]
        identity: String,
    },
}
