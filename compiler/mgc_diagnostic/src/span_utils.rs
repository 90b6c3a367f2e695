//! Byte offset to line/column mapping.

use mgc_ir::Span;

/// Pre-computed line start offsets for one source text.
///
/// Built once per rendered unit so each label lookup is a binary search.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `offsets[i]` is the byte offset where line `i + 1` starts.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let index = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(index).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let start = self.line_start(line);
        let end = (offset as usize).min(source.len());
        let prefix = source.get(start..end).unwrap_or("");
        let col = u32::try_from(prefix.chars().count()).unwrap_or(u32::MAX - 1) + 1;
        (line, col)
    }

    /// Text of a 1-based line without its trailing newline.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> &'a str {
        let start = self.line_start(line);
        let rest = source.get(start..).unwrap_or("");
        let text = rest.split('\n').next().unwrap_or("");
        text.strip_suffix('\r').unwrap_or(text)
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    fn line_start(&self, line: u32) -> usize {
        line.checked_sub(1)
            .and_then(|i| self.offsets.get(i as usize))
            .map_or(0, |&o| o as usize)
    }
}

/// 1-based line where `span` starts. Prefer [`LineOffsetTable`] for repeated lookups.
pub fn line_number(source: &str, span: Span) -> u32 {
    let end = (span.start as usize).min(source.len());
    let newlines = source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count();
    u32::try_from(newlines).unwrap_or(u32::MAX - 1) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_column() {
        let source = "let a := 1;\nprintln a;\n";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(source, 4), (1, 5));
        assert_eq!(table.offset_to_line_col(source, 12), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 20), (2, 9));
        assert_eq!(table.line_count(), 3);
    }

    #[test]
    fn line_text_strips_newline() {
        let source = "a\r\nbb\nccc";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_text(source, 1), "a");
        assert_eq!(table.line_text(source, 2), "bb");
        assert_eq!(table.line_text(source, 3), "ccc");
    }

    #[test]
    fn line_number_matches_table() {
        let source = "one\ntwo\nthree";
        let table = LineOffsetTable::build(source);
        for offset in 0..13u32 {
            assert_eq!(
                line_number(source, Span::new(offset, offset)),
                table.line_from_offset(offset)
            );
        }
    }
}
