use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const KVP_DIR: &str = ".kvp";
pub const CONFIG_FILE: &str = ".kvp/config.yaml";

pub const EXPORT_PREFIX: &str = "kvp_project_";
pub const EXPORT_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn kvp_dir(root: &Path) -> PathBuf {
    root.join(KVP_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// `kvp_project_<name>.json`. Spaces, path separators and characters that are
/// not portable in file names become underscores, so the result is always a
/// single path component.
pub fn export_file_name(project_name: &str) -> String {
    let stem: String = project_name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{EXPORT_PREFIX}{stem}.{EXPORT_EXTENSION}")
}

pub fn export_path(dir: &Path, project_name: &str) -> PathBuf {
    dir.join(export_file_name(project_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_name_replaces_spaces() {
        assert_eq!(
            export_file_name("Reduce waiting times"),
            "kvp_project_Reduce_waiting_times.json"
        );
        assert_eq!(export_file_name("Ausschuss"), "kvp_project_Ausschuss.json");
    }

    #[test]
    fn export_name_is_a_single_component() {
        assert_eq!(
            export_file_name("x/../../escaped"),
            "kvp_project_x_.._.._escaped.json"
        );
        assert_eq!(
            export_file_name("Line 2: a\\b"),
            "kvp_project_Line_2__a_b.json"
        );
        let dir = Path::new("/tmp/exports");
        assert_eq!(export_path(dir, "../../etc/passwd").parent(), Some(dir));
    }

    #[test]
    fn config_lives_under_kvp_dir() {
        let root = Path::new("/tmp/work");
        assert_eq!(config_path(root), kvp_dir(root).join("config.yaml"));
    }
}
