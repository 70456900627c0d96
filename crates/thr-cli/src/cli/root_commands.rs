use clap::{Args, Subcommand};
use thr_core::enums::{AuthEventKind, HintContext};

use crate::cli::subcommands::{
    ClientCommands, FormCommands, HintCommands, IdentityCommands, MemberCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize threshold for a project.
    Init(InitArgs),
    /// Identities as created by the auth provider.
    Identity {
        #[command(subcommand)]
        action: IdentityCommands,
    },
    /// Staff memberships.
    Member {
        #[command(subcommand)]
        action: MemberCommands,
    },
    /// Client records and access tokens.
    Client {
        #[command(subcommand)]
        action: ClientCommands,
    },
    /// Stored routing hint.
    Hint {
        #[command(subcommand)]
        action: HintCommands,
    },
    /// Resolve the destination for an auth event.
    Resolve(ResolveArgs),
    /// Resolve after the user picked a side on the role chooser.
    ChooseRole(ChooseRoleArgs),
    /// Resolve a bearer access-link visit.
    Visit(VisitArgs),
    /// Public intake forms.
    Form {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Print the JSON schema of a wire type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to --project or the current directory).
    pub path: Option<String>,
}

/// Identity selector for commands that need an authenticated identity.
#[derive(Clone, Debug, Args)]
#[group(id = "identity_ref", required = true, multiple = false)]
pub struct IdentityRef {
    /// Identity id.
    #[arg(long)]
    pub identity: Option<String>,
    /// Identity email (case-insensitive).
    #[arg(long)]
    pub email: Option<String>,
}

/// Identity selector for auth events; omit both to simulate a missing session.
#[derive(Clone, Debug, Args)]
#[group(id = "session_identity", multiple = false)]
pub struct SessionIdentity {
    /// Identity id.
    #[arg(long)]
    pub identity: Option<String>,
    /// Identity email (case-insensitive).
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub who: SessionIdentity,
    /// Auth event kind.
    #[arg(long, default_value = "sign-in")]
    pub event: AuthEventKind,
    /// URL hint context.
    #[arg(long, requires = "org")]
    pub context: Option<HintContext>,
    /// URL hint organization id.
    #[arg(long, requires = "context")]
    pub org: Option<String>,
    /// Provider `type` flag, e.g. `recovery`.
    #[arg(long = "type")]
    pub type_flag: Option<String>,
    /// Raw callback query or fragment (`?type=recovery&access_token=...`).
    #[arg(long)]
    pub callback: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ChooseRoleArgs {
    #[command(flatten)]
    pub who: IdentityRef,
    /// Side picked on the role chooser.
    pub choice: HintContext,
}

#[derive(Clone, Debug, Args)]
pub struct VisitArgs {
    /// Access token from the link.
    pub token: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name: destination, hint, public-form, client-record
    #[arg(default_value = "destination")]
    pub type_name: String,
}
