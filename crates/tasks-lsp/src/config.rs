//! User configuration for the tasks language server.
//!
//! Configuration is stored at `~/.config/camel-tasks/config.json` and says
//! which documents get task completions.

use std::path::PathBuf;

use serde::Deserialize;
use tower_lsp::lsp_types::Url;
use tracing::{debug, info, warn};

/// Glob used when no config file says otherwise.
pub const DEFAULT_FILE_PATTERN: &str = "**/tasks.json";

/// User configuration for the tasks language server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TasksLspConfig {
    /// Glob patterns matched against the path of a document URI. Only
    /// matching documents are completed and diagnosed.
    pub file_patterns: Vec<String>,
}

impl Default for TasksLspConfig {
    fn default() -> Self {
        Self {
            file_patterns: vec![DEFAULT_FILE_PATTERN.to_string()],
        }
    }
}

/// Get the path to the user config file.
///
/// Returns `~/.config/camel-tasks/config.json` on Unix, or the equivalent
/// platform-specific config directory on other platforms.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("camel-tasks").join("config.json"))
}

/// Load the user configuration from disk.
///
/// Returns `Ok(None)` if the config file doesn't exist.
/// Returns `Err` if the file exists but couldn't be read or parsed.
pub fn load_config() -> Result<Option<TasksLspConfig>, LoadConfigError> {
    let Some(path) = config_path() else {
        debug!("No config directory available");
        return Ok(None);
    };

    if !path.exists() {
        debug!(?path, "Config file does not exist");
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| LoadConfigError::Io {
        path: path.clone(),
        error: e,
    })?;

    let config = parse_config(&content).map_err(|e| LoadConfigError::Parse {
        path: path.clone(),
        error: e.to_string(),
    })?;

    info!(?path, patterns = config.file_patterns.len(), "Loaded user config");
    Ok(Some(config))
}

fn parse_config(content: &str) -> Result<TasksLspConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Error loading the user config.
#[derive(Debug)]
pub enum LoadConfigError {
    Io { path: PathBuf, error: std::io::Error },
    Parse { path: PathBuf, error: String },
}

impl std::fmt::Display for LoadConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadConfigError::Io { path, error } => {
                write!(f, "Failed to read config at {}: {}", path.display(), error)
            }
            LoadConfigError::Parse { path, error } => {
                write!(f, "Failed to parse config at {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for LoadConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadConfigError::Io { error, .. } => Some(error),
            LoadConfigError::Parse { .. } => None,
        }
    }
}

/// Compiled file patterns deciding which documents the server handles.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    patterns: Vec<glob::Pattern>,
}

impl DocumentFilter {
    /// Compile the configured patterns. Invalid ones are skipped with a
    /// warning.
    pub fn new(config: &TasksLspConfig) -> Self {
        let patterns = config
            .file_patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    warn!(pattern, error = %e, "Ignoring invalid file pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Whether the path of `uri` matches any pattern.
    pub fn matches(&self, uri: &Url) -> bool {
        let path = uri.path();
        self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

impl Default for DocumentFilter {
    fn default() -> Self {
        Self::new(&TasksLspConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = TasksLspConfig::default();
        assert_eq!(config.file_patterns, vec!["**/tasks.json".to_string()]);
    }

    #[test]
    fn test_parse_config() {
        let config = parse_config(r#"{"filePatterns": ["**/*.tasks.json"]}"#).unwrap();
        assert_eq!(config.file_patterns, vec!["**/*.tasks.json".to_string()]);
    }

    #[test]
    fn test_parse_config_missing_field_uses_default() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, TasksLspConfig::default());
    }

    #[test]
    fn test_parse_config_invalid() {
        assert!(parse_config("{\"filePatterns\": 3}").is_err());
        assert!(parse_config("not json").is_err());
    }

    #[test]
    fn test_default_filter() {
        let filter = DocumentFilter::default();
        assert!(filter.matches(&url("file:///workspace/.vscode/tasks.json")));
        assert!(filter.matches(&url("file:///tasks.json")));
        assert!(!filter.matches(&url("file:///workspace/.vscode/launch.json")));
        assert!(!filter.matches(&url("file:///workspace/mytasks.json")));
        assert!(!filter.matches(&url("file:///workspace/tasks.json.bak")));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let filter = DocumentFilter::new(&TasksLspConfig {
            file_patterns: vec!["[".to_string(), "**/launch.json".to_string()],
        });
        assert!(filter.matches(&url("file:///w/.vscode/launch.json")));
        assert!(!filter.matches(&url("file:///w/.vscode/tasks.json")));
    }

    #[test]
    fn test_no_patterns_matches_nothing() {
        let filter = DocumentFilter::new(&TasksLspConfig {
            file_patterns: Vec::new(),
        });
        assert!(!filter.matches(&url("file:///w/.vscode/tasks.json")));
    }

    #[test]
    fn test_error_display() {
        let error = LoadConfigError::Parse {
            path: PathBuf::from("/cfg/config.json"),
            error: "expected value".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config at /cfg/config.json: expected value"
        );
    }
}
