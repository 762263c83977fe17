//! Utility functions for LSP implementation

use std::path::PathBuf;
use tower_lsp::lsp_types::{Position, Range, Url};

/// Convert a file:// URI to a PathBuf
pub fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    uri.to_file_path().ok()
}

/// Convert 1-based line/column to LSP Position (0-based)
pub fn to_position(line: usize, column: usize) -> Position {
    Position {
        line: (line.saturating_sub(1)) as u32,
        character: (column.saturating_sub(1)) as u32,
    }
}

/// Convert (line, col, len) to LSP Range
pub fn to_range(line: usize, column: usize, length: usize) -> Range {
    let start = to_position(line, column);
    let end = Position {
        line: start.line,
        character: start.character.saturating_add(length as u32),
    };
    Range { start, end }
}

/// Content of the 0-based line `index`, without its line ending
pub fn line_at(content: &str, index: usize) -> Option<&str> {
    content
        .split('\n')
        .nth(index)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Length of `text` in UTF-16 code units, the unit LSP positions count in
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// UTF-16 column of the 0-based byte offset `byte` within `line`
///
/// Offsets inside a multi-byte character snap back to its start; offsets
/// past the end of the line count one unit per byte.
pub fn utf16_column(line: &str, byte: usize) -> u32 {
    if byte >= line.len() {
        return utf16_len(line).saturating_add((byte - line.len()) as u32);
    }
    let mut end = byte;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    utf16_len(&line[..end])
}

/// Range covering the whole of the 0-based line `index`
pub fn line_range(index: u32, line: &str) -> Range {
    Range {
        start: Position::new(index, 0),
        end: Position::new(index, utf16_len(line)),
    }
}

/// Position just past the last character of `content`
pub fn document_end(content: &str) -> Position {
    let last_line = content.matches('\n').count() as u32;
    let tail = content.rsplit('\n').next().unwrap_or_default();
    Position::new(last_line, utf16_len(tail))
}

/// Range from the document start to its end
pub fn full_range(content: &str) -> Range {
    Range {
        start: Position::new(0, 0),
        end: document_end(content),
    }
}
