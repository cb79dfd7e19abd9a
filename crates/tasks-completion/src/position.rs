//! Conversion between editor positions and byte offsets.

/// A zero-based line and character, with characters counted in UTF-16 code
/// units as editors speaking LSP do by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Byte offset of the first character of the line after the break that
/// follows `from`, if there is one. `\r\n`, `\n` and a lone `\r` all break.
fn next_line_start(text: &str, from: usize) -> Option<usize> {
    let rest = &text[from..];
    let idx = rest.find(['\n', '\r'])?;
    let len = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
    Some(from + idx + len)
}

/// Convert a position to a byte offset into `text`.
///
/// Positions past the last line clamp to the end of the text, characters
/// past the end of a line clamp to the end of that line, and a character
/// pointing into the middle of a surrogate pair clamps to the start of the
/// char.
pub fn offset_at(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match next_line_start(text, line_start) {
            Some(next) => line_start = next,
            None => return text.len(),
        }
    }

    let line = &text[line_start..];
    let line = &line[..line.find(['\n', '\r']).unwrap_or(line.len())];

    let mut units = 0u32;
    for (i, ch) in line.char_indices() {
        let next = units + ch.len_utf16() as u32;
        if next > position.character {
            return line_start + i;
        }
        units = next;
    }
    line_start + line.len()
}

/// Convert a byte offset into `text` to a position. Offsets past the end
/// clamp to the end; offsets inside a char snap back to its start.
pub fn position_at(text: &str, offset: usize) -> Position {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }

    let mut line = 0;
    let mut line_start = 0;
    while let Some(next) = next_line_start(text, line_start) {
        if next > offset {
            break;
        }
        line += 1;
        line_start = next;
    }

    let character = text[line_start..offset].encode_utf16().count() as u32;
    Position::new(line, character)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_offset_at() {
        let content = "line1\nline2\nline3";
        assert_eq!(offset_at(content, Position::new(0, 0)), 0);
        assert_eq!(offset_at(content, Position::new(0, 5)), 5);
        assert_eq!(offset_at(content, Position::new(1, 0)), 6);
        assert_eq!(offset_at(content, Position::new(2, 2)), 14);
    }

    #[test]
    fn test_offset_at_clamps() {
        let content = "ab\ncd";
        // Past the end of a line
        assert_eq!(offset_at(content, Position::new(0, 10)), 2);
        // Past the last line
        assert_eq!(offset_at(content, Position::new(7, 0)), content.len());
        assert_eq!(offset_at("", Position::new(0, 3)), 0);
    }

    #[test]
    fn test_offset_at_line_breaks() {
        let content = "a\r\nb\rc\nd";
        assert_eq!(offset_at(content, Position::new(1, 0)), 3);
        assert_eq!(offset_at(content, Position::new(1, 9)), 4);
        assert_eq!(offset_at(content, Position::new(2, 0)), 5);
        assert_eq!(offset_at(content, Position::new(3, 1)), 8);
    }

    #[test]
    fn test_offset_at_utf16() {
        // `é` is one UTF-16 unit and two bytes, `😀` two units and four bytes
        let content = "é😀x";
        assert_eq!(offset_at(content, Position::new(0, 1)), 2);
        assert_eq!(offset_at(content, Position::new(0, 2)), 2);
        assert_eq!(offset_at(content, Position::new(0, 3)), 6);
        assert_eq!(offset_at(content, Position::new(0, 4)), 7);
    }

    #[test]
    fn test_position_at() {
        let content = "line1\nline2\r\nline3";
        assert_eq!(position_at(content, 0), Position::new(0, 0));
        assert_eq!(position_at(content, 5), Position::new(0, 5));
        assert_eq!(position_at(content, 6), Position::new(1, 0));
        assert_eq!(position_at(content, 13), Position::new(2, 0));
        assert_eq!(position_at(content, 100), Position::new(2, 5));
    }

    #[test]
    fn test_position_at_utf16() {
        let content = "é😀x";
        assert_eq!(position_at(content, 2), Position::new(0, 1));
        assert_eq!(position_at(content, 6), Position::new(0, 3));
        // Inside the emoji
        assert_eq!(position_at(content, 4), Position::new(0, 1));
    }

    #[test]
    fn test_round_trip_on_char_boundaries() {
        let content = "{\n\t\"tasks\": [ \"é😀\" ]\n}";
        for (offset, _) in content.char_indices() {
            assert_eq!(offset_at(content, position_at(content, offset)), offset);
        }
    }
}
