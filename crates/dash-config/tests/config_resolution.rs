//! Configuration resolution + loading tests against real files.
//!
//! Covers:
//! - Resolution order (CLI > env path > env dir)
//! - Missing CLI path falls through
//! - load_config validation on disk

use dash_config::resolve::{resolve_config, ConfigSource, ENV_CONFIG_DIR, ENV_CONFIG_PATH};
use dash_config::{load_config, ValidationError};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct EnvGuard {
    keys: Vec<String>,
    saved: Vec<Option<String>>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let mut saved = Vec::with_capacity(keys.len());
        for key in keys {
            saved.push(env::var(key).ok());
            env::remove_var(key);
        }
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            saved,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (idx, key) in self.keys.iter().enumerate() {
            match self.saved.get(idx).and_then(|v| v.as_ref()) {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .expect("env lock poisoned");
    f()
}

fn write_config(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create config parent");
    }
    fs::write(path, body).expect("write config");
}

#[test]
fn cli_path_wins_over_environment() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let cli = dir.path().join("cli.json");
        let via_env = dir.path().join("env.json");
        write_config(&cli, "{}");
        write_config(&via_env, "{}");
        env::set_var(ENV_CONFIG_PATH, &via_env);

        let resolved = resolve_config(Some(&cli));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(resolved.path.as_deref(), Some(cli.as_path()));
    });
}

#[test]
fn missing_cli_path_falls_through_to_env() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let via_env = dir.path().join("env.json");
        write_config(&via_env, "{}");
        env::set_var(ENV_CONFIG_PATH, &via_env);

        let resolved = resolve_config(Some(&dir.path().join("does-not-exist.json")));
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(via_env.as_path()));
    });
}

#[test]
fn config_dir_env_is_used_when_path_env_unset() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dashboard.json");
        write_config(&file, "{}");
        env::set_var(ENV_CONFIG_DIR, dir.path());

        let resolved = resolve_config(None);
        assert_eq!(resolved.source, ConfigSource::Environment);
        assert_eq!(resolved.path.as_deref(), Some(file.as_path()));
    });
}

#[test]
fn load_config_reads_and_validates_file() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dashboard.json");
        write_config(
            &file,
            r#"{ "title": "Weekly review", "churn_threshold_days": 30, "top_users": 3 }"#,
        );

        let (config, resolved) = load_config(Some(&file)).expect("load config");
        assert_eq!(resolved.source, ConfigSource::CliArgument);
        assert_eq!(config.title.as_deref(), Some("Weekly review"));
        assert_eq!(config.churn_threshold_days, 30);
        assert_eq!(config.top_users, 3);
    });
}

#[test]
fn load_config_rejects_semantically_invalid_file() {
    with_env_lock(|| {
        let _env = EnvGuard::new(&[ENV_CONFIG_PATH, ENV_CONFIG_DIR]);
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dashboard.json");
        write_config(&file, r#"{ "export_filename": "report.xlsx" }"#);

        let err = load_config(Some(&file)).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    });
}
