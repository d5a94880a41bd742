use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::error::PasteError;

/// Join `root/folder/filename`, create the parent directories and refuse to
/// point at a file that already exists.
///
/// `folder` must be a non-empty relative path without `..` components.
/// Directory creation is idempotent and is not undone when the collision
/// check fails.
pub async fn resolve_destination(
    root: &Path,
    folder: &Path,
    filename: &str,
) -> Result<PathBuf, PasteError> {
    ensure_folder_inside_root(folder)?;

    let image_path = root.join(folder).join(filename);
    let Some(parent) = image_path.parent() else {
        return Err(PasteError::io(
            format!("resolve parent of {}", image_path.display()),
            std::io::Error::from(std::io::ErrorKind::InvalidInput),
        ));
    };

    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|err| PasteError::io(format!("create {}", parent.display()), err))?;

    let exists = tokio::fs::try_exists(&image_path)
        .await
        .map_err(|err| PasteError::io(format!("check {}", image_path.display()), err))?;
    if exists {
        return Err(PasteError::DuplicateFilename { path: image_path });
    }

    Ok(image_path)
}

fn ensure_folder_inside_root(folder: &Path) -> Result<(), PasteError> {
    let mut has_normal = false;
    for component in folder.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(PasteError::UnsafeFolder {
                    folder: folder.to_path_buf(),
                });
            }
        }
    }
    if !has_normal {
        return Err(PasteError::UnsafeFolder {
            folder: folder.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn creates_missing_folders() {
        let dir = tempfile::tempdir().expect("tempdir");

        let path = resolve_destination(dir.path(), Path::new("images"), "shots/a.png")
            .await
            .expect("resolve");

        assert_eq!(path, dir.path().join("images").join("shots").join("a.png"));
        assert!(dir.path().join("images/shots").is_dir());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn existing_folders_are_fine() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("images")).expect("mkdir");

        let path = resolve_destination(dir.path(), Path::new("images"), "a.png")
            .await
            .expect("resolve");
        assert_eq!(path, dir.path().join("images/a.png"));
    }

    #[tokio::test]
    async fn folder_outside_the_root_is_rejected_before_creating_anything() {
        let root = tempfile::tempdir().expect("tempdir");
        let elsewhere = tempfile::tempdir().expect("tempdir");

        for folder in [
            elsewhere.path().to_path_buf(),
            PathBuf::from("../../escaped"),
            PathBuf::from("images/../../escaped"),
            PathBuf::from(""),
            PathBuf::from("."),
        ] {
            let err = resolve_destination(root.path(), &folder, "a.png")
                .await
                .expect_err("folder must stay under the root");
            assert!(
                matches!(err, PasteError::UnsafeFolder { .. }),
                "{folder:?} gave {err:?}"
            );
        }

        assert!(!elsewhere.path().join("a.png").exists());
        assert!(!root.path().join("../../escaped").exists());
        assert_eq!(
            std::fs::read_dir(root.path()).expect("read_dir").count(),
            0
        );
    }

    #[tokio::test]
    async fn nested_relative_folder_is_allowed() {
        let root = tempfile::tempdir().expect("tempdir");

        let path = resolve_destination(root.path(), Path::new("./assets/img"), "a.png")
            .await
            .expect("resolve");
        assert!(path.starts_with(root.path()));
        assert!(root.path().join("assets/img").is_dir());
    }

    #[tokio::test]
    async fn existing_file_is_a_duplicate_and_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let existing = dir.path().join("images/a.png");
        std::fs::create_dir_all(dir.path().join("images")).expect("mkdir");
        std::fs::write(&existing, b"old").expect("write");

        let err = resolve_destination(dir.path(), Path::new("images"), "a.png")
            .await
            .expect_err("duplicate");

        let PasteError::DuplicateFilename { path } = err else {
            panic!("expected duplicate, got {err:?}");
        };
        assert_eq!(path, existing);
        assert_eq!(std::fs::read(&existing).expect("read"), b"old");
    }
}
