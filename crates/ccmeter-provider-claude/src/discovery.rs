//! Claude data directory discovery
//!
//! A Claude base directory is any directory holding a `projects/` child.
//! Explicit locations come from `CLAUDE_CONFIG_DIR` (or the equivalent CLI
//! flag) as a comma-separated list; without one, `~/.config/claude` and
//! `~/.claude` are tried.

use ccmeter_core::error::{CcmeterError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming one or more Claude base directories
pub const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Resolve the Claude base directories to read
///
/// `explicit` is a comma-separated list. When given, only those entries are
/// considered; otherwise the default locations are probed. Fails with
/// [`CcmeterError::NoClaudeDirectory`] when nothing usable is found.
pub fn discover_claude_dirs(explicit: Option<&str>) -> Result<Vec<PathBuf>> {
    let candidates = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(list) => parse_dir_list(list),
        None => default_candidates(),
    };

    let mut found: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if !has_projects_dir(&candidate) {
            if explicit.is_some() {
                warn!(
                    "{} has no projects directory, ignoring it",
                    candidate.display()
                );
            }
            continue;
        }
        if !found.contains(&candidate) {
            found.push(candidate);
        }
    }

    if found.is_empty() {
        return Err(CcmeterError::NoClaudeDirectory);
    }
    debug!("Discovered {} Claude data directories", found.len());
    Ok(found)
}

/// [`discover_claude_dirs`] driven by `CLAUDE_CONFIG_DIR`
pub fn discover_from_env() -> Result<Vec<PathBuf>> {
    let value = std::env::var(CLAUDE_CONFIG_DIR_ENV).ok();
    discover_claude_dirs(value.as_deref())
}

fn parse_dir_list(list: &str) -> Vec<PathBuf> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".config").join("claude"));
        candidates.push(home.join(".claude"));
    }
    candidates
}

fn has_projects_dir(base: &Path) -> bool {
    base.join("projects").is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_MUTEX, EnvVarGuard};
    use tempfile::TempDir;

    fn claude_dir(temp_dir: &TempDir, name: &str) -> PathBuf {
        let base = temp_dir.path().join(name);
        std::fs::create_dir_all(base.join("projects")).unwrap();
        base
    }

    #[test]
    fn test_explicit_list() {
        let temp_dir = TempDir::new().unwrap();
        let first = claude_dir(&temp_dir, "first");
        let second = claude_dir(&temp_dir, "second");
        let bare = temp_dir.path().join("bare");
        std::fs::create_dir_all(&bare).unwrap();

        let list = format!(
            "{}, {} ,{},{}",
            first.display(),
            bare.display(),
            second.display(),
            first.display()
        );
        let dirs = discover_claude_dirs(Some(&list)).unwrap();
        assert_eq!(dirs, vec![first, second]);
    }

    #[test]
    fn test_explicit_list_without_projects() {
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().display().to_string();
        assert!(matches!(
            discover_claude_dirs(Some(&list)),
            Err(CcmeterError::NoClaudeDirectory)
        ));
    }

    #[tokio::test]
    async fn test_env_var_and_home_fallback() {
        let _lock = ENV_MUTEX.lock().await;
        let mut guard = EnvVarGuard::new();
        let temp_dir = TempDir::new().unwrap();
        let custom = claude_dir(&temp_dir, "custom");

        guard.set(CLAUDE_CONFIG_DIR_ENV, &custom.display().to_string());
        assert_eq!(discover_from_env().unwrap(), vec![custom]);

        let home = temp_dir.path().join("home");
        std::fs::create_dir_all(home.join(".claude").join("projects")).unwrap();
        guard.remove(CLAUDE_CONFIG_DIR_ENV);
        guard.set("HOME", &home.display().to_string());
        assert_eq!(discover_from_env().unwrap(), vec![home.join(".claude")]);
    }
}
