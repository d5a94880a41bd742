use std::io::Write;
use std::path::PathBuf;

use md_img_paster_core::DocumentHandle;
use md_img_paster_core::EditorHost;
use md_img_paster_core::TextEdit;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;

use crate::atomic_write::write_atomic_text;
use crate::document::TextDocument;

/// [`EditorHost`] backed by a terminal and the document file on disk.
///
/// Prompts are written to `output` and answered line by line from `input`;
/// end of input counts as dismissing the prompt.
pub struct TerminalHost<R, W> {
    workspace_root: Option<PathBuf>,
    document: Option<DocumentHandle>,
    input: R,
    output: W,
    preset_name: Option<String>,
    assume_continue: bool,
}

impl<R, W> TerminalHost<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        workspace_root: Option<PathBuf>,
        document: Option<DocumentHandle>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            workspace_root,
            document,
            input,
            output,
            preset_name: None,
            assume_continue: false,
        }
    }

    /// Answer the filename prompt with `name` instead of reading input.
    pub fn with_preset_name(mut self, name: Option<String>) -> Self {
        self.preset_name = name;
        self
    }

    /// Pick "Continue" whenever it is offered.
    pub fn with_assume_continue(mut self, assume_continue: bool) -> Self {
        self.assume_continue = assume_continue;
        self
    }

    async fn read_answer(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write_message(&mut self, message: &str) {
        if let Err(err) = writeln!(self.output, "{message}") {
            tracing::warn!("failed to show message: {err}");
        }
    }
}

impl<R, W> EditorHost for TerminalHost<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_root.clone()
    }

    fn active_document(&self) -> Option<DocumentHandle> {
        self.document.clone()
    }

    fn show_info(&mut self, message: &str) {
        self.write_message(message);
    }

    fn show_error(&mut self, message: &str) {
        self.write_message(&format!("error: {message}"));
    }

    async fn ask_choice(
        &mut self,
        message: &str,
        choices: &[&str],
    ) -> std::io::Result<Option<String>> {
        if self.assume_continue
            && let Some(choice) = choices.iter().find(|c| c.eq_ignore_ascii_case("continue"))
        {
            return Ok(Some((*choice).to_string()));
        }

        let prompt = format!("{message} [{}]: ", choices.join("/"));
        let Some(answer) = self.read_answer(&prompt).await? else {
            return Ok(None);
        };
        Ok(match_choice(&answer, choices).map(str::to_string))
    }

    async fn input_box(
        &mut self,
        prompt: &str,
        default_value: &str,
    ) -> std::io::Result<Option<String>> {
        if let Some(name) = self.preset_name.take() {
            return Ok(Some(name));
        }

        let prompt = format!("{prompt} [{default_value}]: ");
        let Some(answer) = self.read_answer(&prompt).await? else {
            return Ok(None);
        };
        // An empty line accepts the pre-filled value.
        if answer.is_empty() {
            return Ok(Some(default_value.to_string()));
        }
        Ok(Some(answer))
    }

    async fn apply_edit(&mut self, edit: TextEdit) -> std::io::Result<()> {
        let Some(path) = self.document.as_ref().map(|doc| doc.path.clone()) else {
            return Err(std::io::Error::other("no active document"));
        };

        let text = tokio::fs::read_to_string(&path).await?;
        let updated = TextDocument::new(text).apply(&edit);
        write_atomic_text(&path, &updated).map_err(|err| std::io::Error::other(format!("{err:#}")))
    }
}

/// Case-insensitive match on a choice label or its 1-based index.
fn match_choice<'a>(answer: &str, choices: &[&'a str]) -> Option<&'a str> {
    let answer = answer.trim();
    if let Ok(index) = answer.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| choices.get(i)).copied();
    }
    choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(answer))
        .copied()
}
