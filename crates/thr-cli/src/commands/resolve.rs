use thr_core::entities::{Hint, Identity};
use thr_gate::AuthEvent;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ResolveArgs;
use crate::context::AppContext;
use crate::output::output_outcome;

/// Handle `thr resolve`.
pub async fn handle(args: &ResolveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let identity = ctx.session_identity(&args.who).await?;
    let event = build_event(args, identity);
    tracing::debug!(event = %event.kind, recovery = event.is_recovery(), "resolving auth event");

    let outcome = ctx.gate.handle(&event).await;
    ctx.gate.settle().await;
    output_outcome(&outcome, flags.format)
}

/// Explicit flags win over values parsed from `--callback`.
fn build_event(args: &ResolveArgs, identity: Option<Identity>) -> AuthEvent {
    let mut event = match &args.callback {
        Some(query) => AuthEvent::from_callback_query(args.event, query),
        None => AuthEvent::new(args.event),
    };
    if let Some(identity) = identity {
        event = event.with_identity(identity);
    }
    if let (Some(context), Some(org)) = (args.context, args.org.as_deref()) {
        event = event.with_url_hint(Hint::new(context, org));
    }
    if let Some(flag) = &args.type_flag {
        event = event.with_type_flag(flag.clone());
    }
    event
}
