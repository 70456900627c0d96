use clap::Subcommand;

use crate::cli::root_commands::IdentityRef;

/// Public intake form commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FormCommands {
    /// Open a public form as an authenticated identity.
    Open {
        #[command(flatten)]
        who: IdentityRef,
        /// Form id.
        #[arg(long = "form")]
        form_id: String,
        /// Organization that owns the form.
        #[arg(long = "org")]
        organization: String,
    },
}
