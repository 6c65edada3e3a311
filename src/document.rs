use std::path::PathBuf;

// Word characters for word-wise movement; punctuation forms its own runs.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Editable text buffer: one flat UTF-8 string plus a cursor and an optional
/// selection anchor. All positions are byte offsets on char boundaries; the
/// selection spans anchor..cursor in either direction.
pub struct Document {
    pub text: String,
    pub cursor: usize,
    pub anchor: Option<usize>,
    pub filename: Option<PathBuf>,
    pub modified: bool,
}

impl Document {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            anchor: None,
            filename: None,
            modified: false,
        }
    }

    /// Replaces the whole buffer, resetting cursor and selection.
    pub fn load(&mut self, text: String, filename: Option<PathBuf>) {
        self.text = text;
        self.cursor = 0;
        self.anchor = None;
        self.filename = filename;
        self.modified = false;
    }

    /// Ordered selection bounds, or `None` when the selection is empty.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.anchor = Some(start);
        self.cursor = end;
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn select_all(&mut self) {
        if self.text.is_empty() {
            return;
        }
        self.anchor = Some(0);
        self.cursor = self.text.len();
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selection().map(|(start, end)| &self.text[start..end])
    }

    // Single splice of the buffer; every mutation funnels through here.
    pub(crate) fn splice(&mut self, start: usize, end: usize, replacement: &str) {
        self.text.replace_range(start..end, replacement);
        self.modified = true;
    }

    /// Inserts text at the cursor, replacing the selection when one is active.
    pub fn insert_str(&mut self, s: &str) {
        let (start, end) = match self.selection() {
            Some(range) => range,
            None => (self.cursor, self.cursor),
        };
        self.splice(start, end, s);
        self.cursor = start + s.len();
        self.anchor = None;
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    pub fn backspace(&mut self) {
        if let Some((start, end)) = self.selection() {
            self.splice(start, end, "");
            self.cursor = start;
            self.anchor = None;
            return;
        }
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_boundary(self.cursor);
        self.splice(prev, self.cursor, "");
        self.cursor = prev;
    }

    pub fn delete_forward(&mut self) {
        if let Some((start, end)) = self.selection() {
            self.splice(start, end, "");
            self.cursor = start;
            self.anchor = None;
            return;
        }
        if self.cursor >= self.text.len() {
            return;
        }
        let next = self.next_boundary(self.cursor);
        self.splice(self.cursor, next, "");
    }

    /// Byte offset of the start of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        self.text[..offset].rfind('\n').map_or(0, |i| i + 1)
    }

    /// Byte offset of the end of the line containing `offset` (the `\n` or EOF).
    pub fn line_end(&self, offset: usize) -> usize {
        self.text[offset..]
            .find('\n')
            .map_or(self.text.len(), |i| offset + i)
    }

    /// Zero-based (line, column) of the cursor, column counted in chars.
    pub fn cursor_position(&self) -> (usize, usize) {
        let line_start = self.line_start(self.cursor);
        let line = self.text[..line_start].matches('\n').count();
        let column = self.text[line_start..self.cursor].chars().count();
        (line, column)
    }

    /// Line and character counts for the statistics display.
    pub fn stats(&self) -> (usize, usize) {
        (self.text.split('\n').count(), self.text.chars().count())
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend {
            if let Some((start, _)) = self.selection() {
                self.cursor = start;
                self.anchor = None;
                return;
            }
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
        self.cursor = self.prev_boundary(self.cursor);
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend {
            if let Some((_, end)) = self.selection() {
                self.cursor = end;
                self.anchor = None;
                return;
            }
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(self.cursor);
        }
        self.cursor = self.next_boundary(self.cursor);
    }

    /// Ctrl+Left: start of the word (or punctuation run) before the cursor,
    /// crossing line breaks with the whitespace.
    pub fn move_word_left(&mut self, extend: bool) {
        self.begin_move(extend);
        let mut it = self.text[..self.cursor].chars().rev().peekable();
        let mut offset = self.cursor;
        while let Some(c) = it.peek().copied() {
            if !c.is_whitespace() {
                break;
            }
            offset -= c.len_utf8();
            it.next();
        }
        let Some(first) = it.peek().copied() else {
            self.cursor = offset;
            return;
        };
        let word = is_word_char(first);
        while let Some(c) = it.peek().copied() {
            if c.is_whitespace() || is_word_char(c) != word {
                break;
            }
            offset -= c.len_utf8();
            it.next();
        }
        self.cursor = offset;
    }

    /// Ctrl+Right: end of the word (or punctuation run) after the cursor.
    pub fn move_word_right(&mut self, extend: bool) {
        self.begin_move(extend);
        let mut it = self.text[self.cursor..].chars().peekable();
        let mut offset = self.cursor;
        while let Some(c) = it.peek().copied() {
            if !c.is_whitespace() {
                break;
            }
            offset += c.len_utf8();
            it.next();
        }
        let Some(first) = it.peek().copied() else {
            self.cursor = offset;
            return;
        };
        let word = is_word_char(first);
        while let Some(c) = it.peek().copied() {
            if c.is_whitespace() || is_word_char(c) != word {
                break;
            }
            offset += c.len_utf8();
            it.next();
        }
        self.cursor = offset;
    }

    pub fn move_up(&mut self, extend: bool) {
        self.begin_move(extend);
        let line_start = self.line_start(self.cursor);
        if line_start == 0 {
            self.cursor = 0;
            return;
        }
        let column = self.text[line_start..self.cursor].chars().count();
        let prev_start = self.line_start(line_start - 1);
        self.cursor = self.offset_at_column(prev_start, column);
    }

    pub fn move_down(&mut self, extend: bool) {
        self.begin_move(extend);
        let line_end = self.line_end(self.cursor);
        if line_end == self.text.len() {
            self.cursor = line_end;
            return;
        }
        let line_start = self.line_start(self.cursor);
        let column = self.text[line_start..self.cursor].chars().count();
        self.cursor = self.offset_at_column(line_end + 1, column);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor = self.line_start(self.cursor);
    }

    pub fn move_end(&mut self, extend: bool) {
        self.begin_move(extend);
        self.cursor = self.line_end(self.cursor);
    }

    fn begin_move(&mut self, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
    }

    // Offset of the char at `column` on the line beginning at `line_start`,
    // clamped to the line end.
    fn offset_at_column(&self, line_start: usize, column: usize) -> usize {
        let line_end = self.line_end(line_start);
        let mut offset = line_start;
        let mut seen = 0;
        for c in self.text[line_start..line_end].chars() {
            if seen == column {
                break;
            }
            offset += c.len_utf8();
            seen += 1;
        }
        offset
    }

    /// Strips trailing whitespace from every line; returns how many lines changed.
    pub fn trim_line_ends(&mut self) -> usize {
        let mut changed = 0;
        let new_text = {
            let parts: Vec<&str> = self
                .text
                .split('\n')
                .map(|line| {
                    let trimmed = line.trim_end();
                    if trimmed.len() != line.len() {
                        changed += 1;
                    }
                    trimmed
                })
                .collect();
            parts.join("\n")
        };
        if changed == 0 {
            return 0;
        }
        self.text = new_text;
        self.modified = true;
        self.anchor = None;
        self.clamp_cursor();
        changed
    }

    pub(crate) fn clamp_cursor(&mut self) {
        if self.cursor > self.text.len() {
            self.cursor = self.text.len();
        }
        while self.cursor > 0 && !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub(crate) fn prev_boundary(&self, offset: usize) -> usize {
        self.text[..offset]
            .chars()
            .next_back()
            .map_or(0, |c| offset - c.len_utf8())
    }

    pub(crate) fn next_boundary(&self, offset: usize) -> usize {
        self.text[offset..]
            .chars()
            .next()
            .map_or(offset, |c| offset + c.len_utf8())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str, cursor: usize) -> Document {
        let mut d = Document::new();
        d.text = text.to_string();
        d.cursor = cursor;
        d
    }

    #[test]
    fn test_insert_advances_cursor() {
        let mut d = Document::new();
        d.insert_str("hello");
        d.insert_char('!');
        assert_eq!(d.text, "hello!");
        assert_eq!(d.cursor, 6);
        assert!(d.modified);
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut d = doc("hello world", 0);
        d.set_selection(6, 11);
        d.insert_str("there");
        assert_eq!(d.text, "hello there");
        assert_eq!(d.cursor, 11);
        assert!(d.selection().is_none());
    }

    #[test]
    fn test_selection_is_ordered() {
        let mut d = doc("abcdef", 1);
        d.anchor = Some(4);
        assert_eq!(d.selection(), Some((1, 4)));
        assert_eq!(d.selected_text(), Some("bcd"));
    }

    #[test]
    fn test_backspace_deletes_selection_then_char() {
        let mut d = doc("abcdef", 5);
        d.anchor = Some(2);
        d.backspace();
        assert_eq!(d.text, "abf");
        assert_eq!(d.cursor, 2);
        d.backspace();
        assert_eq!(d.text, "af");
        assert_eq!(d.cursor, 1);
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut d = doc("ab", 2);
        d.delete_forward();
        assert_eq!(d.text, "ab");
    }

    #[test]
    fn test_line_bounds() {
        let d = doc("one\ntwo\nthree", 5);
        assert_eq!(d.line_start(5), 4);
        assert_eq!(d.line_end(5), 7);
        assert_eq!(d.line_start(0), 0);
        assert_eq!(d.line_end(9), 13);
    }

    #[test]
    fn test_cursor_position_counts_chars_not_bytes() {
        let d = doc("aé\nxyz", 5);
        let (line, column) = d.cursor_position();
        assert_eq!(line, 1);
        assert_eq!(column, 1);
    }

    #[test]
    fn test_move_up_down_keeps_column_clamped() {
        let mut d = doc("long line\nab\nlonger line", 8);
        d.move_down(false);
        assert_eq!(d.cursor, 12); // clamped to end of "ab"
        d.move_down(false);
        assert_eq!(d.cursor_position(), (2, 2));
        d.move_up(false);
        d.move_up(false);
        assert_eq!(d.cursor_position(), (0, 2));
    }

    #[test]
    fn test_arrow_collapses_selection_to_edge() {
        let mut d = doc("abcdef", 4);
        d.anchor = Some(1);
        d.move_left(false);
        assert_eq!(d.cursor, 1);
        assert!(d.selection().is_none());

        let mut d = doc("abcdef", 1);
        d.anchor = Some(4);
        d.move_right(false);
        assert_eq!(d.cursor, 4);
    }

    #[test]
    fn test_word_movement_hops_words_and_punctuation() {
        let mut d = doc("def foo(bar):", 0);
        d.move_word_right(false);
        assert_eq!(d.cursor, 3); // after "def"
        d.move_word_right(false);
        assert_eq!(d.cursor, 7); // after "foo"
        d.move_word_right(false);
        assert_eq!(d.cursor, 8); // after "("
        d.move_word_right(false);
        d.move_word_right(false);
        assert_eq!(d.cursor, 13); // "):" is one punctuation run
        d.move_word_right(false);
        assert_eq!(d.cursor, 13);

        d.move_word_left(false);
        assert_eq!(d.cursor, 11);
        d.move_word_left(false);
        assert_eq!(d.cursor, 8);
        d.move_word_left(false);
        d.move_word_left(false);
        d.move_word_left(false);
        assert_eq!(d.cursor, 0);
    }

    #[test]
    fn test_word_movement_crosses_lines() {
        let mut d = doc("uno\n  dos", 3);
        d.move_word_right(false);
        assert_eq!(d.cursor, 9);
        d.move_word_left(false);
        assert_eq!(d.cursor, 6);
    }

    #[test]
    fn test_word_movement_extends_selection() {
        let mut d = doc("uno dos", 0);
        d.move_word_right(true);
        assert_eq!(d.selection(), Some((0, 3)));
        d.move_word_right(true);
        assert_eq!(d.selection(), Some((0, 7)));
        assert_eq!(d.selected_text(), Some("uno dos"));
    }

    #[test]
    fn test_shift_movement_extends_selection() {
        let mut d = doc("abcdef", 2);
        d.move_right(true);
        d.move_right(true);
        assert_eq!(d.selection(), Some((2, 4)));
        d.move_end(true);
        assert_eq!(d.selection(), Some((2, 6)));
    }

    #[test]
    fn test_select_all() {
        let mut d = doc("abc\ndef", 3);
        d.select_all();
        assert_eq!(d.selection(), Some((0, 7)));
    }

    #[test]
    fn test_stats() {
        assert_eq!(doc("", 0).stats(), (1, 0));
        assert_eq!(doc("a\nb", 0).stats(), (2, 3));
        assert_eq!(doc("a\n", 0).stats(), (2, 2));
    }

    #[test]
    fn test_trim_line_ends() {
        let mut d = doc("a  \nb\t\nc", 8);
        let changed = d.trim_line_ends();
        assert_eq!(changed, 2);
        assert_eq!(d.text, "a\nb\nc");
        assert_eq!(d.cursor, 5);
    }

    #[test]
    fn test_trim_line_ends_clamps_cursor_to_boundary() {
        let mut d = doc("é  \né", 4);
        d.trim_line_ends();
        assert_eq!(d.text, "é\né");
        assert!(d.text.is_char_boundary(d.cursor));
    }

    #[test]
    fn test_load_resets_state() {
        let mut d = doc("old", 3);
        d.anchor = Some(1);
        d.modified = true;
        d.load("new text".to_string(), None);
        assert_eq!(d.cursor, 0);
        assert!(d.anchor.is_none());
        assert!(!d.modified);
    }
}
