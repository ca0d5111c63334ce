//! Byte offset to line/column resolution for diagnostics.
//!
//! This runs only on the error path and is linear in the size of the
//! document preceding the offset.

use core::fmt;

use bstr::{BStr, ByteSlice};

/// The line surrounding a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context<'a> {
    /// 1-based line number.
    pub line_number: usize,
    /// 0-based byte column within [`line`](Self::line).
    pub column: usize,
    /// The full line, without its terminator.
    pub line: &'a BStr,
}

impl<'a> Context<'a> {
    /// Finds the line containing `offset` in `document`.
    ///
    /// An offset that points at a `\n` belongs to the line it terminates.
    /// Offsets past the end are clamped to the document length.
    #[must_use]
    pub fn resolve(document: &'a [u8], offset: usize) -> Self {
        let offset = offset.min(document.len());
        let before = &document[..offset];

        let line_number = 1 + before.iter().filter(|&&b| b == b'\n').count();
        let line_start = before.rfind_byte(b'\n').map_or(0, |nl| nl + 1);
        let line_end = document[offset..]
            .find_byte(b'\n')
            .map_or(document.len(), |nl| offset + nl);

        let mut line = &document[line_start..line_end];
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }

        Self {
            line_number,
            column: offset - line_start,
            line: line.as_bstr(),
        }
    }
}

/// Renders the line followed by a caret under the column.
impl fmt::Display for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.line)?;
        write!(f, "{:width$}^", "", width = self.column)
    }
}
