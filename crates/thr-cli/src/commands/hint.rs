use serde::Serialize;
use thr_core::entities::Hint;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::HintCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct HintResponse {
    stored: Option<Hint>,
}

/// Handle `thr hint`.
pub fn handle(action: &HintCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        HintCommands::Set {
            context,
            organization,
        } => {
            let hint = Hint::new(*context, organization.trim());
            ctx.gate.hints().write(&hint)?;
            output(&HintResponse { stored: Some(hint) }, flags.format)
        }
        HintCommands::Clear => {
            ctx.gate.hints().clear()?;
            output(&HintResponse { stored: None }, flags.format)
        }
    }
}
