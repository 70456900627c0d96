use crate::cli::GlobalFlags;
use crate::cli::subcommands::IdentityCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `thr identity`.
pub async fn handle(
    action: &IdentityCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        IdentityCommands::Add {
            email,
            verified,
            metadata_role,
        } => {
            let identity = ctx
                .service
                .create_identity(email, *verified, metadata_role.as_deref())
                .await?;
            output(&identity, flags.format)
        }
        IdentityCommands::Get { who } => output(&ctx.identity(who).await?, flags.format),
        IdentityCommands::Verify { who } => {
            let identity = ctx.identity(who).await?;
            ctx.service.verify_email(&identity.id).await?;
            output(&ctx.service.get_identity(&identity.id).await?, flags.format)
        }
    }
}
