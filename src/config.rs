//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--log-file`, `--theme`, `--no-confirm-delete`)
//! 2. `--config <FILE>`
//! 3. `$TFB_CONFIG` environment variable (path to config file)
//! 4. Project-local `.tfb.toml` in the current working directory
//! 5. Global `~/.config/tfb/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::lister::{ListOptions, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_WORKERS};
use crate::fs::operations::DEFAULT_MAX_DEPTH;
use crate::viewer::{ViewerOptions, DEFAULT_SCAN_LIMIT, DEFAULT_TAB_WIDTH};

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub default_path: Option<String>,
    /// Confirm before delete operations.
    pub confirm_delete: Option<bool>,
}

/// Directory listing settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListingConfig {
    /// Entry count above which metadata is resolved on worker threads.
    pub parallel_threshold: Option<usize>,
    /// Number of metadata worker threads.
    pub workers: Option<usize>,
}

/// File viewer settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    /// Bytes inspected for text/binary detection; larger files are binary.
    pub scan_limit_bytes: Option<u64>,
    /// Tab rendering width.
    pub tab_width: Option<usize>,
}

/// Recursive size scan settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SizeConfig {
    /// Deepest subdirectory level included in a size scan.
    pub max_depth: Option<usize>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path.
    pub file: Option<String>,
    /// "error", "warn", "info", "debug" or "trace".
    pub level: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark" or "light".
    pub scheme: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub listing: ListingConfig,
    pub viewer: ViewerConfig,
    pub size: SizeConfig,
    pub log: LogConfig,
    pub theme: ThemeConfig,
}

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that one is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("TFB_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".tfb.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("tfb").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`. `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: other
                    .general
                    .default_path
                    .clone()
                    .or(self.general.default_path),
                confirm_delete: other.general.confirm_delete.or(self.general.confirm_delete),
            },
            listing: ListingConfig {
                parallel_threshold: other
                    .listing
                    .parallel_threshold
                    .or(self.listing.parallel_threshold),
                workers: other.listing.workers.or(self.listing.workers),
            },
            viewer: ViewerConfig {
                scan_limit_bytes: other
                    .viewer
                    .scan_limit_bytes
                    .or(self.viewer.scan_limit_bytes),
                tab_width: other.viewer.tab_width.or(self.viewer.tab_width),
            },
            size: SizeConfig {
                max_depth: other.size.max_depth.or(self.size.max_depth),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether to confirm before delete.
    pub fn confirm_delete(&self) -> bool {
        self.general.confirm_delete.unwrap_or(true)
    }

    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            parallel_threshold: self
                .listing
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
            workers: self.listing.workers.unwrap_or(DEFAULT_WORKERS).max(1),
        }
    }

    pub fn viewer_options(&self) -> ViewerOptions {
        ViewerOptions {
            scan_limit: self.viewer.scan_limit_bytes.unwrap_or(DEFAULT_SCAN_LIMIT),
            tab_width: self.viewer.tab_width.unwrap_or(DEFAULT_TAB_WIDTH).max(1),
        }
    }

    /// Depth cap for recursive size scans.
    pub fn max_depth(&self) -> usize {
        self.size.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Log file path: configured, else `<cache_dir>/tfb/tfb.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.log.file {
            Some(file) => Some(PathBuf::from(file)),
            None => dirs::cache_dir().map(|d| d.join("tfb").join("tfb.log")),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Theme scheme: "dark" or "light".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(cfg.confirm_delete());
        assert_eq!(cfg.list_options().parallel_threshold, 2_000);
        assert_eq!(cfg.list_options().workers, 4);
        assert_eq!(cfg.viewer_options().scan_limit, 65_536);
        assert_eq!(cfg.viewer_options().tab_width, 4);
        assert_eq!(cfg.max_depth(), 64);
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.theme_scheme(), "dark");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
default_path = "/srv"
confirm_delete = false

[listing]
parallel_threshold = 500
workers = 8

[viewer]
scan_limit_bytes = 1_000_000
tab_width = 8

[size]
max_depth = 10

[log]
file = "/tmp/tfb-test.log"
level = "debug"

[theme]
scheme = "light"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.general.default_path.as_deref(), Some("/srv"));
        assert!(!cfg.confirm_delete());
        assert_eq!(cfg.list_options().parallel_threshold, 500);
        assert_eq!(cfg.list_options().workers, 8);
        assert_eq!(cfg.viewer_options().scan_limit, 1_000_000);
        assert_eq!(cfg.viewer_options().tab_width, 8);
        assert_eq!(cfg.max_depth(), 10);
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/tfb-test.log")));
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.theme_scheme(), "light");
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[viewer]
tab_width = 2
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert_eq!(cfg.viewer_options().tab_width, 2);
        assert_eq!(cfg.viewer_options().scan_limit, 65_536);
        assert!(cfg.confirm_delete());
    }

    #[test]
    fn test_zero_workers_clamped() {
        let cfg: AppConfig = toml::from_str("[listing]\nworkers = 0\n").expect("parse failed");
        assert_eq!(cfg.list_options().workers, 1);
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                confirm_delete: Some(true),
                ..Default::default()
            },
            size: SizeConfig {
                max_depth: Some(5),
            },
            ..Default::default()
        };
        let over = AppConfig {
            general: GeneralConfig {
                confirm_delete: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(!merged.confirm_delete());
        assert_eq!(merged.max_depth(), 5);
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            log: LogConfig {
                file: Some("/var/log/tfb.log".into()),
                level: Some("warn".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.log_level(), "warn");
        assert_eq!(merged.log_file(), Some(PathBuf::from("/var/log/tfb.log")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[viewer]
scan_limit_bytes = 4096

[theme]
scheme = "light"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert_eq!(cfg.viewer_options().scan_limit, 4096);
        assert_eq!(cfg.theme_scheme(), "light");
        assert_eq!(cfg.max_depth(), 64);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
confirm_delete = true

[size]
max_depth = 3
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                confirm_delete: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert!(!cfg.confirm_delete());
        assert_eq!(cfg.max_depth(), 3);
    }
}
