use std::ffi::OsString;
use std::path::Path;
use std::process::Output;
use std::process::Stdio;

use tokio::process::Command;

use super::ClipboardInspector;
use super::ClipboardWriter;
use crate::error::PasteError;

/// Substring of `clipboard info` output that signals PNG data on the clipboard.
pub const IMAGE_MARKER: &str = "«class PNGf»";

const PATH_PLACEHOLDER: &str = "{path}";

/// An external command. Arguments equal to `{path}` are replaced by the target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn render_args(&self, path: Option<&Path>) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match path {
                Some(path) if arg == PATH_PLACEHOLDER => path.as_os_str().to_os_string(),
                _ => OsString::from(arg),
            })
            .collect()
    }

    async fn run(&self, path: Option<&Path>) -> Result<Output, PasteError> {
        let mut cmd = Command::new(&self.program);
        cmd.kill_on_drop(true);
        cmd.args(self.render_args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| PasteError::SpawnFailed {
                program: self.program.clone(),
                source,
            })
    }
}

/// Clipboard access through OS scripting commands.
///
/// No timeout is applied; a hung command stalls the caller.
#[derive(Debug, Clone)]
pub struct ProcessClipboard {
    inspect: CommandSpec,
    write: CommandSpec,
}

impl ProcessClipboard {
    pub fn new(inspect: CommandSpec, write: CommandSpec) -> Self {
        Self { inspect, write }
    }

    /// `osascript` based implementation for macOS.
    pub fn macos() -> Self {
        Self::new(
            CommandSpec::new("osascript", ["-e", "clipboard info"]),
            CommandSpec::new(
                "osascript",
                [
                    "-e",
                    "on run argv",
                    "-e",
                    "set png_data to (the clipboard as «class PNGf»)",
                    "-e",
                    "set the_file to open for access POSIX file (item 1 of argv) with write permission",
                    "-e",
                    "write png_data to the_file",
                    "-e",
                    "close access the_file",
                    "-e",
                    "end run",
                    PATH_PLACEHOLDER,
                ],
            ),
        )
    }
}

impl ClipboardInspector for ProcessClipboard {
    async fn inspect(&self) -> Result<(), PasteError> {
        let output = self
            .inspect
            .run(None)
            .await
            .map_err(|err| PasteError::ClipboardInspectionFailed(err.to_string()))?;
        classify_inspection(&output)
    }
}

impl ClipboardWriter for ProcessClipboard {
    async fn write_image(&self, path: &Path) -> Result<(), PasteError> {
        let output = self.write.run(Some(path)).await?;
        classify_write(&output)
    }
}

fn classify_inspection(output: &Output) -> Result<(), PasteError> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let reason = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        };
        return Err(PasteError::ClipboardInspectionFailed(reason));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    tracing::debug!("clipboard info: {}", stdout.trim());
    if stdout.contains(IMAGE_MARKER) {
        Ok(())
    } else {
        Err(PasteError::ClipboardNotImage)
    }
}

fn classify_write(output: &Output) -> Result<(), PasteError> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !stderr.is_empty() {
        return Err(PasteError::WriteError(stderr));
    }
    if !output.status.success() {
        return Err(PasteError::WriteFailed {
            status: output.status,
        });
    }
    Ok(())
}
