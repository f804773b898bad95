use std::path::{Path, PathBuf};

/// Resolve the directory that holds `.kvp/`.
///
/// Priority:
/// 1. `--root` flag / `KVP_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.kvp/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd, kvp_core::paths::KVP_DIR).unwrap_or(cwd)
}

fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(marker).is_dir() {
            return Some(dir);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_kvp_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".kvp")).unwrap();
        let subdir = dir.path().join("reports/2024");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_upward(&subdir, ".kvp").unwrap(), dir.path());
    }

    #[test]
    fn missing_marker_yields_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_upward(dir.path(), ".definitely-not-here").is_none());
    }
}
