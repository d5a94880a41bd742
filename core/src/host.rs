use std::future::Future;
use std::path::PathBuf;

/// Zero-based line/character position inside a text document.
///
/// `character` counts Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The same range with `start <= end`.
    pub fn normalized(self) -> Self {
        if self.end < self.start {
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }
}

/// The document currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    /// Absolute file path. For an untitled buffer this is the host's placeholder name.
    pub path: PathBuf,
    /// `true` when the document has never been saved to disk.
    pub is_untitled: bool,
    pub selection: Selection,
}

/// A single replacement applied through the host's undo-aware edit mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Selection,
    pub text: String,
}

impl TextEdit {
    /// Insert at a caret or replace a non-empty selection.
    pub fn at_selection(selection: Selection, text: impl Into<String>) -> Self {
        Self {
            range: selection.normalized(),
            text: text.into(),
        }
    }
}

/// Editor services the paste workflow consumes.
///
/// `None` from a prompt means the user dismissed it.
pub trait EditorHost {
    fn workspace_root(&self) -> Option<PathBuf>;

    fn active_document(&self) -> Option<DocumentHandle>;

    fn show_info(&mut self, message: &str);

    fn show_error(&mut self, message: &str);

    fn ask_choice(
        &mut self,
        message: &str,
        choices: &[&str],
    ) -> impl Future<Output = std::io::Result<Option<String>>>;

    fn input_box(
        &mut self,
        prompt: &str,
        default_value: &str,
    ) -> impl Future<Output = std::io::Result<Option<String>>>;

    fn apply_edit(&mut self, edit: TextEdit) -> impl Future<Output = std::io::Result<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reversed_selection_is_normalized_for_edits() {
        let sel = Selection::new(Position::new(3, 1), Position::new(1, 4));
        let edit = TextEdit::at_selection(sel, "x");
        assert_eq!(edit.range.start, Position::new(1, 4));
        assert_eq!(edit.range.end, Position::new(3, 1));
        assert!(!edit.range.is_empty());
    }

    #[test]
    fn caret_is_empty_selection() {
        assert!(Selection::caret(Position::new(2, 0)).is_empty());
    }
}
