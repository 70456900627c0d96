use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::MemberCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RemoveResponse<'a> {
    identity_id: &'a str,
    organization_id: &'a str,
    removed: bool,
}

/// Handle `thr member`.
pub async fn handle(
    action: &MemberCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        MemberCommands::Add {
            identity,
            organization,
            role,
        } => {
            let membership = ctx
                .service
                .add_membership(identity, organization, *role)
                .await?;
            output(&membership, flags.format)
        }
        MemberCommands::Remove {
            identity,
            organization,
        } => {
            let removed = ctx.service.remove_membership(identity, organization).await?;
            output(
                &RemoveResponse {
                    identity_id: identity,
                    organization_id: organization,
                    removed,
                },
                flags.format,
            )
        }
        MemberCommands::List { identity } => {
            output(&ctx.service.list_staff_memberships(identity).await?, flags.format)
        }
    }
}
