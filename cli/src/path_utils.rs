use std::path::Path;
use std::path::PathBuf;

pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(path_str) = path.to_str() else {
        return path.to_path_buf();
    };
    if path_str == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path_str));
    }
    let Some(rest) = path_str.strip_prefix("~/") else {
        return path.to_path_buf();
    };
    let Some(home) = dirs::home_dir() else {
        return path.to_path_buf();
    };
    home.join(rest)
}

/// Expand `~` and anchor relative paths at `cwd`.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    }
}

/// Resolve symlinks when the path exists; otherwise return it unchanged.
pub fn canonicalize_or_keep(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn relative_paths_are_anchored_at_cwd() {
        let cwd = Path::new("/work/proj");
        assert_eq!(
            absolutize(Path::new("docs/notes.md"), cwd),
            PathBuf::from("/work/proj/docs/notes.md")
        );
        assert_eq!(
            absolutize(Path::new("/abs/notes.md"), cwd),
            PathBuf::from("/abs/notes.md")
        );
    }

    #[test]
    fn canonicalize_keeps_missing_paths() {
        let missing = Path::new("/definitely/missing/notes.md");
        assert_eq!(canonicalize_or_keep(missing), missing.to_path_buf());
    }

    #[test]
    fn non_tilde_paths_are_unchanged() {
        assert_eq!(
            expand_tilde(Path::new("~user/x")),
            PathBuf::from("~user/x")
        );
    }
}
