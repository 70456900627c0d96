use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Identity { action } => commands::identity::handle(&action, ctx, flags).await,
        Commands::Member { action } => commands::member::handle(&action, ctx, flags).await,
        Commands::Client { action } => commands::client::handle(&action, ctx, flags).await,
        Commands::Hint { action } => commands::hint::handle(&action, ctx, flags),
        Commands::Resolve(args) => commands::resolve::handle(&args, ctx, flags).await,
        Commands::ChooseRole(args) => commands::choose_role::handle(&args, ctx, flags).await,
        Commands::Visit(args) => commands::visit::handle(&args, ctx, flags).await,
        Commands::Form { action } => commands::form::handle(&action, ctx, flags).await,
        Commands::Init(_) | Commands::Schema(_) => {
            unreachable!("init/schema are pre-dispatched in main")
        }
    }
}
