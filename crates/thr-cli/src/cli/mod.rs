use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `thr` binary.
#[derive(Debug, Parser)]
#[command(
    name = "thr",
    version,
    about = "Threshold - post-authentication identity and route resolution"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .threshold)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use thr_core::enums::{AuthEventKind, ClientOrigin, HintContext, StaffRole};

    use super::{Cli, Commands, GlobalFlags, OutputFormat};
    use crate::cli::subcommands::{ClientCommands, HintCommands, MemberCommands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["thr", "--format", "raw", "--verbose", "visit", "tok-1"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Visit(ref args) if args.token == "tok-1"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["thr", "visit", "tok-1", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["thr", "--format", "table", "visit", "tok-1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["thr", "--project", "/tmp/demo", "visit", "tok-1"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }

    #[test]
    fn resolve_defaults_to_sign_in() {
        let cli = Cli::try_parse_from(["thr", "resolve", "--email", "ana@example.com"])
            .expect("cli should parse");
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.event, AuthEventKind::SignIn);
        assert_eq!(args.who.email.as_deref(), Some("ana@example.com"));
        assert!(args.context.is_none());
    }

    #[test]
    fn resolve_parses_hint_and_callback() {
        let cli = Cli::try_parse_from([
            "thr",
            "resolve",
            "--identity",
            "usr-1",
            "--event",
            "magic-link-callback",
            "--context",
            "client",
            "--org",
            "org-a",
            "--callback",
            "?type=magiclink",
        ])
        .expect("cli should parse");
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.event, AuthEventKind::MagicLinkCallback);
        assert_eq!(args.context, Some(HintContext::Client));
        assert_eq!(args.org.as_deref(), Some("org-a"));
        assert_eq!(args.callback.as_deref(), Some("?type=magiclink"));
    }

    #[test]
    fn resolve_rejects_identity_and_email_together() {
        let parsed = Cli::try_parse_from([
            "thr",
            "resolve",
            "--identity",
            "usr-1",
            "--email",
            "ana@example.com",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn resolve_rejects_unknown_event() {
        let parsed = Cli::try_parse_from(["thr", "resolve", "--event", "sign-out"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn member_add_parses_role() {
        let cli = Cli::try_parse_from([
            "thr", "member", "add", "--identity", "usr-1", "--org", "org-a", "--role", "admin",
        ])
        .expect("cli should parse");
        let Commands::Member { action } = cli.command else {
            panic!("expected member");
        };
        assert!(matches!(
            action,
            MemberCommands::Add { role: StaffRole::Admin, ref organization, .. } if organization == "org-a"
        ));
    }

    #[test]
    fn client_add_defaults_to_invitation() {
        let cli = Cli::try_parse_from([
            "thr", "client", "add", "--org", "org-a", "--email", "c@example.com",
        ])
        .expect("cli should parse");
        let Commands::Client { action } = cli.command else {
            panic!("expected client");
        };
        assert!(matches!(
            action,
            ClientCommands::Add { origin: ClientOrigin::Invitation, identity: None, .. }
        ));
    }

    #[test]
    fn hint_set_requires_context_and_org() {
        assert!(Cli::try_parse_from(["thr", "hint", "set", "--context", "agency"]).is_err());
        let cli = Cli::try_parse_from(["thr", "hint", "set", "--context", "agency", "--org", "A"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Hint { action: HintCommands::Set { context: HintContext::Agency, .. } }
        ));
    }

    #[test]
    fn choose_role_requires_a_context() {
        assert!(Cli::try_parse_from(["thr", "choose-role", "--identity", "usr-1"]).is_err());
        assert!(
            Cli::try_parse_from(["thr", "choose-role", "--identity", "usr-1", "client"]).is_ok()
        );
    }
}
