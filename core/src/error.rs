use std::path::PathBuf;
use std::process::ExitStatus;

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// User backed out of a prompt; nothing is shown.
    Silent,
    /// Precondition not met; shown once as an informational message.
    GuardInfo,
    /// Precondition not met; shown once as an error message.
    GuardError,
    /// Failure while doing work; shown behind the failure banner and logged.
    Operational,
}

#[derive(Debug, thiserror::Error)]
pub enum PasteError {
    #[error("md-img-paster does not work on {platform}.")]
    UnsupportedPlatform { platform: String },

    #[error("No workspace opened!")]
    NoWorkspace,

    #[error("Please select a document first.")]
    NoActiveDocument,

    #[error("Please save the document so we can get the path.")]
    UnsavedDocument,

    #[error("cancelled")]
    UserCancelled,

    #[error("you entered an empty filename")]
    EmptyFilename,

    #[error("invalid filename (cannot contain \"..\" or start with a path separator): {filename}")]
    UnsafeFilename { filename: String },

    #[error("invalid image folder (must be a relative path inside the workspace): {}", folder.display())]
    UnsafeFolder { folder: PathBuf },

    #[error("duplcate filename")]
    DuplicateFilename { path: PathBuf },

    #[error("clipboard does not contain an image")]
    ClipboardNotImage,

    #[error("failed to inspect clipboard: {0}")]
    ClipboardInspectionFailed(String),

    #[error("failed to write image ({status})")]
    WriteFailed { status: ExitStatus },

    #[error("failed to write image: {0}")]
    WriteError(String),

    #[error("failed to start `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    #[error("failed to edit document: {0}")]
    Edit(#[source] std::io::Error),
}

impl PasteError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PasteError::UserCancelled => ErrorClass::Silent,
            PasteError::NoWorkspace | PasteError::NoActiveDocument | PasteError::UnsavedDocument => {
                ErrorClass::GuardInfo
            }
            PasteError::UnsupportedPlatform { .. } => ErrorClass::GuardError,
            PasteError::EmptyFilename
            | PasteError::UnsafeFilename { .. }
            | PasteError::UnsafeFolder { .. }
            | PasteError::DuplicateFilename { .. }
            | PasteError::ClipboardNotImage
            | PasteError::ClipboardInspectionFailed(_)
            | PasteError::WriteFailed { .. }
            | PasteError::WriteError(_)
            | PasteError::SpawnFailed { .. }
            | PasteError::Io { .. }
            | PasteError::Prompt(_)
            | PasteError::Edit(_) => ErrorClass::Operational,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PasteError::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cancellation_is_the_only_silent_error() {
        assert_eq!(PasteError::UserCancelled.class(), ErrorClass::Silent);
        assert_eq!(PasteError::EmptyFilename.class(), ErrorClass::Operational);
        assert_eq!(PasteError::ClipboardNotImage.class(), ErrorClass::Operational);
    }

    #[test]
    fn guards_are_split_by_severity() {
        assert_eq!(PasteError::UnsavedDocument.class(), ErrorClass::GuardInfo);
        assert_eq!(
            PasteError::UnsupportedPlatform {
                platform: "linux".to_string()
            }
            .class(),
            ErrorClass::GuardError
        );
    }

    #[test]
    fn duplicate_keeps_historical_wording() {
        let err = PasteError::DuplicateFilename {
            path: PathBuf::from("/proj/images/a.png"),
        };
        assert_eq!(err.to_string(), "duplcate filename");
    }
}
