use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thr_db::repos::client::NewClientRecord;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ClientCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct DeleteResponse<'a> {
    id: &'a str,
    deleted: bool,
}

#[derive(Debug, Serialize)]
struct TokenResponse<'a> {
    id: &'a str,
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Handle `thr client`.
pub async fn handle(
    action: &ClientCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ClientCommands::Add {
            organization,
            email,
            identity,
            origin,
        } => {
            let record = ctx
                .service
                .insert_client(&NewClientRecord {
                    identity_id: identity.clone(),
                    organization_id: organization.clone(),
                    email: email.clone(),
                    created_from: *origin,
                    source_form_id: None,
                })
                .await?;
            output(&record, flags.format)
        }
        ClientCommands::Delete { id } => {
            let deleted = ctx.service.delete_client(id).await?;
            output(&DeleteResponse { id, deleted }, flags.format)
        }
        ClientCommands::IssueToken { id, ttl_hours } => {
            let hours = ttl_hours.unwrap_or(ctx.config.tokens.default_ttl_hours);
            let (access_token, expires_at) = ctx
                .service
                .issue_access_token(id, TimeDelta::hours(i64::from(hours)))
                .await?;
            output(
                &TokenResponse {
                    id,
                    access_token,
                    expires_at,
                },
                flags.format,
            )
        }
        ClientCommands::List { identity } => {
            output(&ctx.service.list_client_records(identity).await?, flags.format)
        }
    }
}
