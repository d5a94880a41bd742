use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use crate::path_utils;

/// Pick the project root: the explicit `--workspace`, else the enclosing git
/// checkout, else `cwd`. An explicit path that is not a directory yields `None`.
///
/// The root is canonical, matching what git reports, so it can be diffed
/// against canonical document paths.
pub fn resolve_workspace_root(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(explicit) = explicit {
        let root = path_utils::absolutize(explicit, cwd);
        if !root.is_dir() {
            return None;
        }
        return Some(path_utils::canonicalize_or_keep(&root));
    }

    let root = git_stdout_trimmed(cwd, &["rev-parse", "--show-toplevel"])
        .map(PathBuf::from)
        .unwrap_or_else(|| cwd.to_path_buf());
    Some(path_utils::canonicalize_or_keep(&root))
}

fn git_stdout_trimmed(workdir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(workdir)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        return None;
    }

    Some(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_workspace_must_exist() {
        let dir = tempfile::tempdir().expect("tempdir");

        assert_eq!(
            resolve_workspace_root(Some(dir.path()), Path::new("/")),
            Some(dir.path().canonicalize().expect("canonicalize"))
        );
        assert_eq!(
            resolve_workspace_root(Some(Path::new("missing")), dir.path()),
            None
        );
    }

    #[test]
    fn falls_back_to_git_toplevel_or_cwd() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).expect("mkdir");

        let git_ok = Command::new("git")
            .arg("-C")
            .arg(dir.path())
            .args(["init", "-q"])
            .status()
            .is_ok_and(|status| status.success());

        let root = resolve_workspace_root(None, &nested).expect("root");
        if git_ok {
            assert_eq!(root, dir.path().canonicalize().expect("canonicalize"));
        } else {
            assert_eq!(root, nested.canonicalize().expect("canonicalize"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_workspace_and_document_give_short_references() {
        let dir = tempfile::tempdir().expect("tempdir");
        let real = dir.path().join("real");
        std::fs::create_dir_all(&real).expect("mkdir");
        std::fs::write(real.join("notes.md"), "# Notes\n").expect("write");
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).expect("symlink");

        let root = resolve_workspace_root(Some(&link), Path::new("/")).expect("root");
        let real = real.canonicalize().expect("canonicalize");
        assert_eq!(root, real);

        let document =
            crate::document::describe_document(&link.join("notes.md"), None, None)
                .expect("describe");
        assert_eq!(document.path, real.join("notes.md"));

        let image = root.join("images").join("a.png");
        assert_eq!(
            md_img_paster_core::relative_reference_path(&document.path, &image),
            "images/a.png"
        );
    }
}
