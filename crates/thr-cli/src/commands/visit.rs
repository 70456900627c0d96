use crate::cli::GlobalFlags;
use crate::cli::root_commands::VisitArgs;
use crate::context::AppContext;
use crate::output::output_outcome;

/// Handle `thr visit`.
pub async fn handle(args: &VisitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx.tokens.visit(&args.token).await;
    output_outcome(&outcome, flags.format)
}
