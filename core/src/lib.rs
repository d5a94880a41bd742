//! Paste the image held on the system clipboard into a project folder and
//! reference it from the markup document being edited.
//!
//! The workflow is host-agnostic: the editor side is reached through
//! [`EditorHost`], the OS clipboard through [`ClipboardInspector`] and
//! [`ClipboardWriter`].

mod clipboard;
mod destination;
mod error;
mod filename;
mod host;
mod pipeline;
mod platform;
mod reference;

pub use clipboard::ClipboardInspector;
pub use clipboard::ClipboardWriter;
pub use clipboard::CommandSpec;
pub use clipboard::IMAGE_MARKER;
pub use clipboard::ProcessClipboard;
pub use destination::resolve_destination;
pub use error::ErrorClass;
pub use error::PasteError;
pub use filename::IMAGE_EXTENSION;
pub use filename::NameStyle;
pub use filename::generate_default_name;
pub use filename::validate_filename;
pub use host::DocumentHandle;
pub use host::EditorHost;
pub use host::Position;
pub use host::Selection;
pub use host::TextEdit;
pub use pipeline::DEFAULT_IMAGE_FOLDER;
pub use pipeline::FAILURE_BANNER;
pub use pipeline::MARKUP_EXTENSIONS;
pub use pipeline::PasteOutcome;
pub use pipeline::PasteRequest;
pub use pipeline::Stage;
pub use pipeline::paste_image;
pub use pipeline::report;
pub use platform::Platform;
pub use reference::format_reference;
pub use reference::relative_reference_path;
