use std::sync::OnceLock;

use crate::document::Document;
use regex::Regex;

/// The indent unit. Tabs are never inserted; outdenting matches spaces only.
pub const INDENT: &str = "    ";

// Compiled once; matches the run of spaces a cursor outdent removes.
fn trailing_spaces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r" {1,4}$").expect("valid pattern"))
}

fn closing_for(key: char) -> Option<char> {
    match key {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

fn leading_spaces(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

// Toggles a `# ` (or bare `#`) prefix on one line, preserving leading
// whitespace. Returns the new line and the signed length delta.
fn toggle_line(line: &str) -> (String, isize) {
    let trimmed = line.trim_start();
    let leading = &line[..line.len() - trimmed.len()];
    if let Some(rest) = trimmed.strip_prefix("# ") {
        (format!("{leading}{rest}"), -2)
    } else if let Some(rest) = trimmed.strip_prefix('#') {
        (format!("{leading}{rest}"), -1)
    } else {
        (format!("{leading}# {trimmed}"), 2)
    }
}

impl Document {
    /// Tab: with a selection, prefixes every non-blank line it touches with
    /// one indent unit and grows the selection end to match; otherwise
    /// inserts the unit at the cursor.
    pub fn insert_indent(&mut self) {
        match self.selection() {
            Some((start, end)) => {
                let line_start = self.line_start(start);
                let segment = self.text[line_start..end].to_string();
                let mut added = 0;
                let indented: Vec<String> = segment
                    .split('\n')
                    .map(|line| {
                        if line.trim().is_empty() {
                            line.to_string()
                        } else {
                            added += INDENT.len();
                            format!("{INDENT}{line}")
                        }
                    })
                    .collect();
                self.splice(line_start, end, &indented.join("\n"));
                self.set_selection(start, end + added);
            }
            None => {
                let at = self.cursor;
                self.splice(at, at, INDENT);
                self.cursor = at + INDENT.len();
            }
        }
    }

    /// Shift+Tab: with a selection, strips up to one indent unit from the
    /// start of every non-blank selected line (4 spaces, else 3, 2, 1) and
    /// shrinks the selection by the total removed; otherwise removes up to
    /// four spaces immediately before the cursor.
    pub fn remove_indent(&mut self) {
        match self.selection() {
            Some((start, end)) => {
                let line_start = self.line_start(start);
                let segment = self.text[line_start..end].to_string();
                let mut removed = 0;
                let mut first_strip = 0;
                let outdented: Vec<&str> = segment
                    .split('\n')
                    .enumerate()
                    .map(|(index, line)| {
                        if line.trim().is_empty() {
                            return line;
                        }
                        let strip = leading_spaces(line).min(INDENT.len());
                        if index == 0 {
                            first_strip = strip;
                        }
                        removed += strip;
                        &line[strip..]
                    })
                    .collect();
                self.splice(line_start, end, &outdented.join("\n"));
                // Spaces stripped ahead of the selection start pull it back
                // too, never past the line start.
                let new_start = start.saturating_sub(first_strip).max(line_start);
                let new_end = end.saturating_sub(removed).max(new_start);
                self.set_selection(new_start, new_end);
            }
            None => {
                let found = trailing_spaces_re()
                    .find(&self.text[..self.cursor])
                    .map(|m| m.start());
                if let Some(at) = found {
                    self.splice(at, self.cursor, "");
                    self.cursor = at;
                }
            }
        }
    }

    /// Enter: re-indents the new line to match the current one, plus one
    /// indent unit when the text before the cursor ends with `:`. Replaces
    /// the selection when one is active.
    pub fn handle_newline(&mut self) {
        let (start, end) = match self.selection() {
            Some(range) => range,
            None => (self.cursor, self.cursor),
        };
        let insertion = {
            let before = &self.text[..start];
            let current = before.rsplit('\n').next().unwrap_or("");
            let mut indent: String = current
                .chars()
                .take_while(|c| c.is_whitespace())
                .collect();
            if current.trim().ends_with(':') {
                indent.push_str(INDENT);
            }
            format!("\n{indent}")
        };
        self.splice(start, end, &insertion);
        self.cursor = start + insertion.len();
        self.anchor = None;
    }

    /// Ctrl+/: toggles a `#` comment prefix on the current line, or on every
    /// non-blank line of the selection. A selection is uncommented only when
    /// all of its non-blank lines are already commented.
    pub fn toggle_comment(&mut self) {
        match self.selection() {
            Some((start, end)) => self.toggle_comment_selection(start, end),
            None => self.toggle_comment_line(),
        }
    }

    fn toggle_comment_line(&mut self) {
        let line_start = self.line_start(self.cursor);
        let line_end = self.line_end(self.cursor);
        let line = self.text[line_start..line_end].to_string();
        let (new_line, delta) = toggle_line(&line);
        self.splice(line_start, line_end, &new_line);
        let moved = (self.cursor as isize + delta).max(line_start as isize);
        self.cursor = moved as usize;
        self.anchor = None;
    }

    fn toggle_comment_selection(&mut self, start: usize, end: usize) {
        let line_start = self.line_start(start);
        let segment = self.text[line_start..end].to_string();
        let all_commented = segment.split('\n').all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#')
        });
        let mut delta: isize = 0;
        // Characters stripped ahead of the selection start on the first line
        // pull the start back with them.
        let mut start_shift = 0;
        let rewritten: Vec<String> = segment
            .split('\n')
            .enumerate()
            .map(|(index, line)| {
                if line.trim().is_empty() {
                    return line.to_string();
                }
                if all_commented {
                    let (new_line, d) = toggle_line(line);
                    if index == 0 {
                        let hash_at = line_start + (line.len() - line.trim_start().len());
                        start_shift = ((-d) as usize).min(start.saturating_sub(hash_at));
                    }
                    delta += d;
                    new_line
                } else {
                    let trimmed = line.trim_start();
                    let leading = &line[..line.len() - trimmed.len()];
                    delta += 2;
                    format!("{leading}# {trimmed}")
                }
            })
            .collect();
        self.splice(line_start, end, &rewritten.join("\n"));
        let new_start = start - start_shift;
        let new_end = (end as isize + delta).max(new_start as isize) as usize;
        self.set_selection(new_start, new_end);
    }

    /// Bracket/quote auto-pairing for `( [ { " '`. Wraps the selection when
    /// one is active, keeping it over the original text. Quotes do not pair
    /// when the next char is the same quote or the previous one is a
    /// backslash; they are then inserted as typed. Returns false for keys
    /// that are not pair openers.
    pub fn auto_pair(&mut self, key: char) -> bool {
        let Some(close) = closing_for(key) else {
            return false;
        };
        match self.selection() {
            Some((start, end)) => {
                let wrapped = format!("{key}{}{close}", &self.text[start..end]);
                self.splice(start, end, &wrapped);
                self.set_selection(start + 1, end + 1);
            }
            None => {
                if key == '"' || key == '\'' {
                    let after = self.text[self.cursor..].chars().next();
                    let before = self.text[..self.cursor].chars().next_back();
                    if after == Some(key) || before == Some('\\') {
                        self.insert_char(key);
                        return true;
                    }
                }
                let at = self.cursor;
                let mut pair = String::with_capacity(2);
                pair.push(key);
                pair.push(close);
                self.splice(at, at, &pair);
                self.cursor = at + 1;
                self.anchor = None;
            }
        }
        true
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

    fn doc_sel(text: &str, start: usize, end: usize) -> Document {
        let mut d = doc(text, end);
        d.set_selection(start, end);
        d
    }

    #[test]
    fn test_tab_inserts_four_spaces() {
        let mut d = doc("ab", 1);
        d.insert_indent();
        assert_eq!(d.text, "a    b");
        assert_eq!(d.cursor, 5);
    }

    #[test]
    fn test_indent_selection_grows_by_four_per_line() {
        let mut d = doc_sel("one\ntwo\nthree", 0, 13);
        d.insert_indent();
        assert_eq!(d.text, "    one\n    two\n    three");
        assert_eq!(d.selection(), Some((0, 25)));
        for line in d.text.split('\n') {
            assert!(line.starts_with(INDENT));
        }
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        let mut d = doc_sel("a\n\nb", 0, 4);
        d.insert_indent();
        assert_eq!(d.text, "    a\n\n    b");
        assert_eq!(d.selection(), Some((0, 12)));
    }

    #[test]
    fn test_indent_from_mid_line_covers_whole_first_line() {
        let mut d = doc_sel("alpha\nbeta", 2, 10);
        d.insert_indent();
        assert_eq!(d.text, "    alpha\n    beta");
        assert_eq!(d.selection(), Some((2, 18)));
    }

    #[test]
    fn test_outdent_strips_four_three_two_one() {
        let mut d = doc_sel("    a\n   b\n  c\n d", 0, 17);
        d.remove_indent();
        assert_eq!(d.text, "a\nb\nc\nd");
        assert_eq!(d.selection(), Some((0, 7)));
    }

    #[test]
    fn test_outdent_then_indent_round_trips() {
        let original = "    x\n    y";
        let mut d = doc_sel(original, 0, original.len());
        d.remove_indent();
        assert_eq!(d.text, "x\ny");
        d.insert_indent();
        assert_eq!(d.text, original);
        assert_eq!(d.selection(), Some((0, original.len())));
    }

    #[test]
    fn test_outdent_round_trip_with_blank_line() {
        let original = "    x\n\n    y";
        let mut d = doc_sel(original, 0, original.len());
        d.remove_indent();
        assert_eq!(d.text, "x\n\ny");
        d.insert_indent();
        assert_eq!(d.text, original);
    }

    #[test]
    fn test_outdent_selection_inside_stripped_prefix_stays_in_bounds() {
        // Selecting only "b" in "    ab": all four stripped spaces sit
        // before the selection, so the whole selection slides left.
        let mut d = doc_sel("    ab", 5, 6);
        d.remove_indent();
        assert_eq!(d.text, "ab");
        assert!(d.cursor <= d.text.len());
        assert_eq!(d.selection(), Some((1, 2)));
        assert_eq!(d.selected_text(), Some("b"));
    }

    #[test]
    fn test_outdent_selection_starting_mid_indent() {
        let mut d = doc_sel("    ab", 2, 6);
        d.remove_indent();
        assert_eq!(d.text, "ab");
        assert_eq!(d.selection(), Some((0, 2)));
    }

    #[test]
    fn test_outdent_without_selection_removes_up_to_four() {
        let mut d = doc("      ", 6);
        d.remove_indent();
        assert_eq!(d.text, "  ");
        assert_eq!(d.cursor, 2);
        d.remove_indent();
        assert_eq!(d.text, "");
        assert_eq!(d.cursor, 0);
        d.remove_indent();
        assert_eq!(d.cursor, 0);
    }

    #[test]
    fn test_outdent_only_matches_spaces_before_cursor() {
        let mut d = doc("x\t", 2);
        d.remove_indent();
        assert_eq!(d.text, "x\t");
    }

    #[test]
    fn test_newline_after_colon_adds_one_unit() {
        let mut d = doc("if x:", 5);
        d.handle_newline();
        assert_eq!(d.text, "if x:\n    ");
        assert_eq!(d.cursor, 10);
    }

    #[test]
    fn test_newline_nested_colon_extends_existing_indent() {
        let mut d = doc("    if x:", 9);
        d.handle_newline();
        assert_eq!(d.text, "    if x:\n        ");
        assert_eq!(d.cursor, 18);
    }

    #[test]
    fn test_newline_preserves_plain_indent() {
        let mut d = doc("    pass", 8);
        d.handle_newline();
        assert_eq!(d.text, "    pass\n    ");
        assert_eq!(d.cursor, 13);
    }

    #[test]
    fn test_newline_without_indent_is_plain() {
        let mut d = doc("abc", 3);
        d.handle_newline();
        assert_eq!(d.text, "abc\n");
        assert_eq!(d.cursor, 4);
    }

    #[test]
    fn test_newline_uses_text_before_cursor_only() {
        let mut d = doc("    abc", 5);
        d.handle_newline();
        assert_eq!(d.text, "    a\n    bc");
        assert_eq!(d.cursor, 10);
    }

    #[test]
    fn test_newline_replaces_selection() {
        let mut d = doc_sel("if x: y", 5, 7);
        d.handle_newline();
        assert_eq!(d.text, "if x:\n    ");
        assert!(d.selection().is_none());
    }

    #[test]
    fn test_comment_round_trips_a_line() {
        let original = "    x = 1";
        let mut d = doc(original, 6);
        d.toggle_comment();
        assert_eq!(d.text, "    # x = 1");
        assert_eq!(d.cursor, 8);
        d.toggle_comment();
        assert_eq!(d.text, original);
        assert_eq!(d.cursor, 6);
    }

    #[test]
    fn test_comment_bare_hash_removes_one() {
        let mut d = doc("#x", 2);
        d.toggle_comment();
        assert_eq!(d.text, "x");
        assert_eq!(d.cursor, 1);
    }

    #[test]
    fn test_uncomment_never_moves_cursor_before_line_start() {
        let mut d = doc("ab\n# cd", 3);
        d.toggle_comment();
        assert_eq!(d.text, "ab\ncd");
        assert_eq!(d.cursor, 3);
    }

    #[test]
    fn test_comment_selection_comments_all_when_mixed() {
        let mut d = doc_sel("a\n# b\nc", 0, 7);
        d.toggle_comment();
        assert_eq!(d.text, "# a\n# # b\n# c");
        assert_eq!(d.selection(), Some((0, 13)));
    }

    #[test]
    fn test_comment_selection_uncomments_when_all_commented() {
        let mut d = doc_sel("# a\n\n#b", 0, 7);
        d.toggle_comment();
        assert_eq!(d.text, "a\n\nb");
        assert_eq!(d.selection(), Some((0, 4)));
    }

    #[test]
    fn test_uncomment_selection_after_hash_stays_in_bounds() {
        // Selecting only "b" in "# ab": the stripped "# " sits before the
        // selection, which slides left with it.
        let mut d = doc_sel("# ab", 3, 4);
        d.toggle_comment();
        assert_eq!(d.text, "ab");
        assert!(d.cursor <= d.text.len());
        assert_eq!(d.selection(), Some((1, 2)));
        assert_eq!(d.selected_text(), Some("b"));
    }

    #[test]
    fn test_uncomment_selection_starting_before_hash_keeps_start() {
        let mut d = doc_sel("  # x\n  # y", 0, 11);
        d.toggle_comment();
        assert_eq!(d.text, "  x\n  y");
        assert_eq!(d.selection(), Some((0, 7)));
    }

    #[test]
    fn test_pair_bracket_inserts_pair_with_cursor_between() {
        let mut d = doc("", 0);
        assert!(d.auto_pair('('));
        assert_eq!(d.text, "()");
        assert_eq!(d.cursor, 1);
    }

    #[test]
    fn test_pair_wraps_selection_and_keeps_it() {
        let mut d = doc_sel("abc", 0, 3);
        d.auto_pair('[');
        assert_eq!(d.text, "[abc]");
        assert_eq!(d.selection(), Some((1, 4)));
        assert_eq!(d.selected_text(), Some("abc"));
    }

    #[test]
    fn test_quote_does_not_pair_before_same_quote() {
        let mut d = doc("\"", 0);
        d.auto_pair('"');
        assert_eq!(d.text, "\"\"");
        assert_eq!(d.cursor, 1);
    }

    #[test]
    fn test_quote_does_not_pair_after_backslash() {
        let mut d = doc("\\", 1);
        d.auto_pair('"');
        assert_eq!(d.text, "\\\"");
        assert_eq!(d.cursor, 2);
    }

    #[test]
    fn test_quote_pairs_in_the_open() {
        let mut d = doc("x = ", 4);
        d.auto_pair('\'');
        assert_eq!(d.text, "x = ''");
        assert_eq!(d.cursor, 5);
    }

    #[test]
    fn test_non_pair_key_is_rejected() {
        let mut d = doc("", 0);
        assert!(!d.auto_pair('a'));
        assert_eq!(d.text, "");
    }
}
