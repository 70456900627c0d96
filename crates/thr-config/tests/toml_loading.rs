//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed cwd and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use thr_config::{ConfigError, ThresholdConfig};

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/threshold/state.db"

[hints]
dir = "/tmp/hints"
ttl_secs = 600

[session]
touch_last_seen = false

[tokens]
default_ttl_hours = 24
"#,
        )?;

        let config: ThresholdConfig =
            Figment::from(Serialized::defaults(ThresholdConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract()?;

        assert_eq!(config.database.path, "/var/lib/threshold/state.db");
        assert_eq!(config.hints.dir, "/tmp/hints");
        assert_eq!(config.hints.ttl_secs, 600);
        assert!(!config.session.touch_last_seen);
        assert_eq!(config.tokens.default_ttl_hours, 24);
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults_for_missing_fields() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r"
[hints]
ttl_secs = 0
",
        )?;

        let config: ThresholdConfig =
            Figment::from(Serialized::defaults(ThresholdConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract()?;

        assert_eq!(config.hints.dir, ".threshold/hints");
        assert!(config.hints.ttl().is_none());
        assert_eq!(config.database.path, ".threshold/threshold.db");
        assert!(config.session.touch_last_seen);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("THRESHOLD_DATABASE__PATH", "from-env.db");

        let config: ThresholdConfig =
            Figment::from(Serialized::defaults(ThresholdConfig::default()))
                .merge(Toml::file("config.toml"))
                .merge(Env::prefixed("THRESHOLD_").split("__"))
                .extract()?;

        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn project_config_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".threshold")).map_err(|e| e.to_string())?;
        jail.create_file(
            ".threshold/config.toml",
            r"
[tokens]
default_ttl_hours = 2
",
        )?;

        let config = ThresholdConfig::load().expect("config loads");
        assert_eq!(config.tokens.default_ttl_hours, 2);
        Ok(())
    });
}

#[test]
fn load_rejects_blank_database_path() {
    Jail::expect_with(|jail| {
        jail.set_env("THRESHOLD_DATABASE__PATH", " ");

        let err = ThresholdConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::NotConfigured { ref section } if section == "database"));
        Ok(())
    });
}
