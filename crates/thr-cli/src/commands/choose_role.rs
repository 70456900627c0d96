use crate::cli::GlobalFlags;
use crate::cli::root_commands::ChooseRoleArgs;
use crate::context::AppContext;
use crate::output::output_outcome;

/// Handle `thr choose-role`.
pub async fn handle(
    args: &ChooseRoleArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let identity = ctx.identity(&args.who).await?;
    let outcome = ctx.gate.choose_role(&identity, args.choice).await;
    ctx.gate.settle().await;
    output_outcome(&outcome, flags.format)
}
