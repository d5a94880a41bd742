use std::path::Path;

use anyhow::Context;
use md_img_paster_core::DocumentHandle;
use md_img_paster_core::Position;
use md_img_paster_core::Selection;
use md_img_paster_core::TextEdit;

/// In-memory text with line/character addressing.
#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(text: String) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { text, line_starts }
    }

    /// Byte offset of `pos`, clamped to the end of its line or of the document.
    pub fn offset_at(&self, pos: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(pos.line) else {
            return self.text.len();
        };
        let line_end = self.line_end(pos.line);
        self.text[line_start..line_end]
            .char_indices()
            .nth(pos.character)
            .map_or(line_end, |(idx, _)| line_start + idx)
    }

    pub fn end_position(&self) -> Position {
        let line = self.line_starts.len() - 1;
        let start = self.line_starts[line];
        Position::new(line, self.text[start..].chars().count())
    }

    /// Text after applying `edit`: insertion for a caret, replacement for a range.
    pub fn apply(&self, edit: &TextEdit) -> String {
        let range = edit.range.normalized();
        let start = self.offset_at(range.start);
        let end = self.offset_at(range.end).max(start);

        let mut out = String::with_capacity(self.text.len() + edit.text.len());
        out.push_str(&self.text[..start]);
        out.push_str(&edit.text);
        out.push_str(&self.text[end..]);
        out
    }

    // Excludes the `\n` (and a preceding `\r`) terminating the line.
    fn line_end(&self, line: usize) -> usize {
        let Some(&next) = self.line_starts.get(line + 1) else {
            return self.text.len();
        };
        let end = next - 1;
        if self.text[..end].ends_with('\r') {
            end - 1
        } else {
            end
        }
    }
}

/// Describe the document named on the command line.
///
/// A path that is not an existing file is reported as never saved. Saved
/// documents get their canonical path so references are computed against the
/// same form as the workspace root. Without a cursor the caret sits at the
/// end of the document.
pub fn describe_document(
    path: &Path,
    cursor: Option<Position>,
    selection_end: Option<Position>,
) -> anyhow::Result<DocumentHandle> {
    if !path.is_file() {
        return Ok(DocumentHandle {
            path: path.to_path_buf(),
            is_untitled: true,
            selection: Selection::default(),
        });
    }

    let path = crate::path_utils::canonicalize_or_keep(path);
    let start = match cursor {
        Some(cursor) => cursor,
        None => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            TextDocument::new(text).end_position()
        }
    };
    let end = selection_end.unwrap_or(start);

    Ok(DocumentHandle {
        path,
        is_untitled: false,
        selection: Selection::new(start, end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> TextDocument {
        TextDocument::new(text.to_string())
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let d = doc("héllo\nwörld\n");
        assert_eq!(d.offset_at(Position::new(0, 2)), 3);
        assert_eq!(d.offset_at(Position::new(1, 0)), 7);
        assert_eq!(d.offset_at(Position::new(1, 2)), 10);
    }

    #[test]
    fn positions_clamp_to_line_and_document_end() {
        let d = doc("ab\r\ncd");
        assert_eq!(d.offset_at(Position::new(0, 99)), 2);
        assert_eq!(d.offset_at(Position::new(1, 99)), 6);
        assert_eq!(d.offset_at(Position::new(7, 0)), 6);
    }

    #[test]
    fn end_position_handles_trailing_newline() {
        assert_eq!(doc("a\nbc").end_position(), Position::new(1, 2));
        assert_eq!(doc("a\n").end_position(), Position::new(1, 0));
        assert_eq!(doc("").end_position(), Position::new(0, 0));
    }

    #[test]
    fn caret_edit_inserts() {
        let d = doc("# Notes\n\nmore\n");
        let edit = TextEdit::at_selection(
            Selection::caret(Position::new(1, 0)),
            "![image](images/a.png)\n",
        );
        assert_eq!(d.apply(&edit), "# Notes\n![image](images/a.png)\n\nmore\n");
    }

    #[test]
    fn range_edit_replaces_selection() {
        let d = doc("see PLACEHOLDER here\n");
        let edit = TextEdit::at_selection(
            Selection::new(Position::new(0, 15), Position::new(0, 4)),
            "X",
        );
        assert_eq!(d.apply(&edit), "see X here\n");
    }

    #[test]
    fn describe_missing_file_as_untitled() {
        let dir = tempfile::tempdir().expect("tempdir");
        let handle =
            describe_document(&dir.path().join("Untitled-1"), None, None).expect("describe");
        assert!(handle.is_untitled);
    }

    #[test]
    fn describe_defaults_caret_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "one\ntwo").expect("write");

        let handle = describe_document(&path, None, None).expect("describe");
        assert!(!handle.is_untitled);
        assert_eq!(handle.path, path.canonicalize().expect("canonicalize"));
        assert_eq!(handle.selection, Selection::caret(Position::new(1, 3)));

        let handle = describe_document(
            &path,
            Some(Position::new(0, 1)),
            Some(Position::new(1, 0)),
        )
        .expect("describe");
        assert_eq!(
            handle.selection,
            Selection::new(Position::new(0, 1), Position::new(1, 0))
        );
    }
}
