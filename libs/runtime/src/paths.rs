use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the application home directory.
///
/// `explicit` wins when provided (with `~` expansion and absolutization);
/// otherwise the platform user directory joined with `default_subdir` is used.
/// The directory is created when `create` is set.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match explicit {
        Some(raw) => absolutize(&expand_tilde(&raw)?)?,
        None => user_base_dir()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("Failed to create home dir '{}'", resolved.display()))?;
    }

    Ok(resolved)
}

/// Expand a leading `~` or `~/` against the platform user directory.
fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_base_dir();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_base_dir()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

fn absolutize(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        let cwd = std::env::current_dir().context("Failed to read current dir")?;
        Ok(cwd.join(p))
    }
}

#[cfg(target_os = "windows")]
fn user_base_dir() -> Result<PathBuf> {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .context("APPDATA is not set")
}

#[cfg(not(target_os = "windows"))]
fn user_base_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .context("HOME is not set")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_path_is_kept() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let resolved = resolve_home_dir(
            Some(target.to_string_lossy().to_string()),
            ".nextstep",
            true,
        )
        .unwrap();
        assert_eq!(resolved, target);
        assert!(resolved.is_dir());
    }

    #[test]
    fn tilde_expands_to_user_dir() {
        let tmp = tempdir().unwrap();
        #[cfg(target_os = "windows")]
        std::env::set_var("APPDATA", tmp.path());
        #[cfg(not(target_os = "windows"))]
        std::env::set_var("HOME", tmp.path());

        let resolved = resolve_home_dir(Some("~/here".to_string()), ".nextstep", false).unwrap();
        assert_eq!(resolved, tmp.path().join("here"));
    }

    #[test]
    fn default_subdir_when_not_provided() {
        let tmp = tempdir().unwrap();
        #[cfg(target_os = "windows")]
        std::env::set_var("APPDATA", tmp.path());
        #[cfg(not(target_os = "windows"))]
        std::env::set_var("HOME", tmp.path());

        let resolved = resolve_home_dir(None, ".nextstep", true).unwrap();
        assert_eq!(resolved, tmp.path().join(".nextstep"));
        assert!(resolved.is_dir());
    }
}
