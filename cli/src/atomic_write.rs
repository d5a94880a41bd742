use std::path::Path;

use anyhow::Context;
use tempfile::NamedTempFile;

/// Replace `path` with `contents` through a temp file in the same directory,
/// so readers never observe a half-written document.
pub fn write_atomic_text(path: &Path, contents: &str) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        anyhow::bail!("invalid path for atomic write: {}", path.display());
    };

    let mut tmp = NamedTempFile::new_in(parent).context("create temp file")?;
    use std::io::Write as _;
    tmp.write_all(contents.as_bytes())
        .context("write temp file")?;
    tmp.flush().context("flush temp file")?;

    if let Ok(meta) = std::fs::metadata(path) {
        // Keep the document's permissions; the temp file is created 0600.
        let _ = std::fs::set_permissions(tmp.path(), meta.permissions());
    }

    tmp.persist(path).map_err(|err| {
        anyhow::Error::new(err.error).context(format!("persist file to {}", path.display()))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replaces_contents_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "old\n").expect("write");

        write_atomic_text(&path, "new without newline").expect("write atomic");

        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "new without newline");
    }

    #[cfg(unix)]
    #[test]
    fn keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "old\n").expect("write");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod");

        write_atomic_text(&path, "new\n").expect("write atomic");

        let mode = std::fs::metadata(&path).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }
}
