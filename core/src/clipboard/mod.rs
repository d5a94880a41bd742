//! OS clipboard capabilities used by the paste workflow.

mod process;

use std::future::Future;
use std::path::Path;

pub use process::CommandSpec;
pub use process::IMAGE_MARKER;
pub use process::ProcessClipboard;

use crate::error::PasteError;

/// Answers whether the clipboard currently holds image data.
pub trait ClipboardInspector {
    /// Resolves `Ok(())` if an image is present, [`PasteError::ClipboardNotImage`] if not.
    fn inspect(&self) -> impl Future<Output = Result<(), PasteError>>;
}

/// Saves the clipboard image to a file.
pub trait ClipboardWriter {
    fn write_image(&self, path: &Path) -> impl Future<Output = Result<(), PasteError>>;
}
