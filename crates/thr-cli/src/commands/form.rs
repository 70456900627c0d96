use thr_core::entities::PublicForm;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FormCommands;
use crate::context::AppContext;
use crate::output::output_outcome;

/// Handle `thr form`.
pub async fn handle(
    action: &FormCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FormCommands::Open {
            who,
            form_id,
            organization,
        } => {
            let identity = ctx.identity(who).await?;
            let form = PublicForm {
                id: form_id.clone(),
                organization_id: organization.clone(),
            };
            let outcome = ctx.gate.open_public_form(&identity, &form).await;
            output_outcome(&outcome, flags.format)
        }
    }
}
