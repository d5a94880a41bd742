//! The paste-image workflow: ordered stages that halt on the first failure.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::path::PathBuf;

use crate::clipboard::ClipboardInspector;
use crate::clipboard::ClipboardWriter;
use crate::destination::resolve_destination;
use crate::error::ErrorClass;
use crate::error::PasteError;
use crate::filename::validate_filename;
use crate::host::DocumentHandle;
use crate::host::EditorHost;
use crate::host::TextEdit;
use crate::platform::Platform;
use crate::reference::format_reference;
use crate::reference::relative_reference_path;


pub const DEFAULT_IMAGE_FOLDER: &str = "images";
pub const MARKUP_EXTENSIONS: &[&str] = &[".md", ".markdown"];
pub const FAILURE_BANNER: &str = "Failed to paste image";

const CONTINUE: &str = "Continue";
const CANCEL: &str = "Cancel";
const FILENAME_PROMPT: &str = "Please specify the filename of the image.";

/// Fixed parameters of one invocation.
#[derive(Debug, Clone)]
pub struct PasteRequest {
    pub platform: Platform,
    /// Folder under the workspace root that receives images.
    pub folder: PathBuf,
    /// Pre-filled value of the filename prompt.
    pub default_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOutcome {
    pub image_path: PathBuf,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ContextGuard,
    DocumentType,
    ClipboardCheck,
    FilenameNegotiation,
    PathResolution,
    PersistAndInsert,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::ContextGuard => "context-guard",
            Stage::DocumentType => "document-type",
            Stage::ClipboardCheck => "clipboard-check",
            Stage::FilenameNegotiation => "filename",
            Stage::PathResolution => "path-resolution",
            Stage::PersistAndInsert => "persist-and-insert",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Target {
    root: PathBuf,
    document: DocumentHandle,
}

/// Run the whole workflow once. Each stage starts only after the previous one succeeded.
///
/// The result should be handed to [`report`].
pub async fn paste_image<H, C>(
    host: &mut H,
    clipboard: &C,
    request: &PasteRequest,
) -> Result<PasteOutcome, PasteError>
where
    H: EditorHost,
    C: ClipboardInspector + ClipboardWriter,
{
    request.platform.ensure_supported()?;

    let target = run_stage(Stage::ContextGuard, async { context_guard(&*host) }).await?;
    run_stage(
        Stage::DocumentType,
        confirm_document_type(host, &target.document.path),
    )
    .await?;
    run_stage(Stage::ClipboardCheck, clipboard.inspect()).await?;
    let filename = run_stage(
        Stage::FilenameNegotiation,
        negotiate_filename(host, &request.default_name),
    )
    .await?;
    let image_path = run_stage(
        Stage::PathResolution,
        resolve_destination(&target.root, &request.folder, &filename),
    )
    .await?;
    run_stage(
        Stage::PersistAndInsert,
        persist_and_insert(host, clipboard, &target.document, image_path),
    )
    .await
}

async fn run_stage<T, F>(stage: Stage, fut: F) -> Result<T, PasteError>
where
    F: Future<Output = Result<T, PasteError>>,
{
    tracing::debug!(%stage, "stage started");
    let result = fut.await;
    match &result {
        Ok(_) => tracing::debug!(%stage, "stage finished"),
        Err(err) => tracing::debug!(%stage, "stage stopped: {err}"),
    }
    result
}

fn context_guard<H: EditorHost>(host: &H) -> Result<Target, PasteError> {
    let root = host.workspace_root().ok_or(PasteError::NoWorkspace)?;
    tracing::debug!("workspace root={}", root.display());

    let document = host.active_document().ok_or(PasteError::NoActiveDocument)?;
    if document.is_untitled {
        return Err(PasteError::UnsavedDocument);
    }

    Ok(Target { root, document })
}

async fn confirm_document_type<H: EditorHost>(
    host: &mut H,
    document_path: &Path,
) -> Result<(), PasteError> {
    let path = document_path.to_string_lossy();
    if MARKUP_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return Ok(());
    }

    let choice = host
        .ask_choice(
            "The file extension does not end in .md or .markdown. Do you want to continue?",
            &[CONTINUE, CANCEL],
        )
        .await
        .map_err(PasteError::Prompt)?;
    match choice.as_deref() {
        Some(CONTINUE) => Ok(()),
        _ => Err(PasteError::UserCancelled),
    }
}

async fn negotiate_filename<H: EditorHost>(
    host: &mut H,
    default_name: &str,
) -> Result<String, PasteError> {
    let entered = host
        .input_box(FILENAME_PROMPT, default_name)
        .await
        .map_err(PasteError::Prompt)?;
    validate_filename(entered.as_deref())
}

async fn persist_and_insert<H, C>(
    host: &mut H,
    clipboard: &C,
    document: &DocumentHandle,
    image_path: PathBuf,
) -> Result<PasteOutcome, PasteError>
where
    H: EditorHost,
    C: ClipboardWriter,
{
    // A failed write may leave a partial file behind; it is not cleaned up.
    clipboard.write_image(&image_path).await?;
    log_image_dimensions(&image_path).await;

    let relative = relative_reference_path(&document.path, &image_path);
    let reference = format_reference(&relative);
    host.apply_edit(TextEdit::at_selection(document.selection, reference.clone()))
        .await
        .map_err(PasteError::Edit)?;

    Ok(PasteOutcome {
        image_path,
        reference,
    })
}

async fn log_image_dimensions(path: &Path) {
    let owned = path.to_path_buf();
    match tokio::task::spawn_blocking(move || image::image_dimensions(owned)).await {
        Ok(Ok((width, height))) => tracing::debug!("image dimensions={width}x{height}"),
        Ok(Err(err)) => tracing::warn!("could not read dimensions of {}: {err}", path.display()),
        Err(err) => tracing::warn!("image dimension lookup did not finish: {err}"),
    }
}

/// Route the result of [`paste_image`] to the host's message sinks.
pub fn report<H: EditorHost>(host: &mut H, result: &Result<PasteOutcome, PasteError>) {
    let err = match result {
        Ok(outcome) => {
            tracing::info!("pasted image to {}", outcome.image_path.display());
            return;
        }
        Err(err) => err,
    };

    match err.class() {
        ErrorClass::Silent => tracing::debug!("paste cancelled"),
        ErrorClass::GuardInfo => host.show_info(&err.to_string()),
        ErrorClass::GuardError => host.show_error(&err.to_string()),
        ErrorClass::Operational => {
            let message = format!("{FAILURE_BANNER}: {err}.");
            tracing::error!("{message}");
            host.show_error(&message);
        }
    }
}
