//! Byte offsets to line/column positions.

use serde::{Deserialize, Serialize};

/// Zero-based line and column. Columns count UTF-16 code units, like
/// editors and `tsc` do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Position { line, character }
    }
}

/// Offsets where each line begins. `\n`, `\r\n` and a lone `\r` all end a
/// line.
#[derive(Debug, Clone)]
pub struct LineMap {
    starts: Vec<u32>,
}

impl LineMap {
    pub fn build(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];
        for (i, &byte) in bytes.iter().enumerate() {
            let ends_line = byte == b'\n' || (byte == b'\r' && bytes.get(i + 1) != Some(&b'\n'));
            if ends_line {
                starts.push(i as u32 + 1);
            }
        }
        LineMap { starts }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Offsets past the end of `source` clamp to its end.
    pub fn offset_to_position(&self, offset: u32, source: &str) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let end = (offset as usize).min(source.len());
        let start = (self.starts[line] as usize).min(end);
        let character = source
            .get(start..end)
            .map_or(0, |prefix| prefix.encode_utf16().count() as u32);
        Position::new(line as u32, character)
    }
}
