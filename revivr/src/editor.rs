//! Cursor and edit operations for the source-text buffer.
//!
//! The buffer itself is the session's `source_text: String`; this module only
//! tracks where the cursor sits in it. Positions are byte offsets and are kept
//! on char boundaries. Edit methods return whether the text changed so the
//! caller knows when to persist.

/// Spaces inserted for the Tab key.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Cursor {
    pos: usize,
    /// Column to aim for on vertical moves across shorter lines.
    goal_col: Option<usize>,
}

impl Cursor {
    /// A cursor placed after the last character of `text`.
    pub fn at_end(text: &str) -> Self {
        Self {
            pos: text.len(),
            goal_col: None,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Pulls the cursor back inside `text` after an external change.
    pub fn clamp(&mut self, text: &str) {
        self.pos = self.pos.min(text.len());
        while !text.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
        self.goal_col = None;
    }

    pub fn insert_char(&mut self, text: &mut String, c: char) -> bool {
        text.insert(self.pos, c);
        self.pos += c.len_utf8();
        self.goal_col = None;
        true
    }

    pub fn insert_str(&mut self, text: &mut String, s: &str) -> bool {
        if s.is_empty() {
            return false;
        }
        text.insert_str(self.pos, s);
        self.pos += s.len();
        self.goal_col = None;
        true
    }

    pub fn insert_tab(&mut self, text: &mut String) -> bool {
        self.insert_str(text, &" ".repeat(TAB_WIDTH))
    }

    /// Deletes the char before the cursor.
    pub fn backspace(&mut self, text: &mut String) -> bool {
        let Some(prev) = text[..self.pos].chars().next_back() else {
            return false;
        };
        self.pos -= prev.len_utf8();
        text.remove(self.pos);
        self.goal_col = None;
        true
    }

    /// Deletes the char under the cursor.
    pub fn delete(&mut self, text: &mut String) -> bool {
        if self.pos >= text.len() {
            return false;
        }
        text.remove(self.pos);
        self.goal_col = None;
        true
    }

    pub fn left(&mut self, text: &str) {
        if let Some(prev) = text[..self.pos].chars().next_back() {
            self.pos -= prev.len_utf8();
        }
        self.goal_col = None;
    }

    pub fn right(&mut self, text: &str) {
        if let Some(next) = text[self.pos..].chars().next() {
            self.pos += next.len_utf8();
        }
        self.goal_col = None;
    }

    pub fn home(&mut self, text: &str) {
        self.pos = line_start(text, self.pos);
        self.goal_col = None;
    }

    pub fn end(&mut self, text: &str) {
        self.pos = line_end(text, self.pos);
        self.goal_col = None;
    }

    pub fn top(&mut self) {
        self.pos = 0;
        self.goal_col = None;
    }

    pub fn bottom(&mut self, text: &str) {
        self.pos = text.len();
        self.goal_col = None;
    }

    /// Moves up one line, keeping the goal column. On the first line, goes to 0.
    pub fn up(&mut self, text: &str) {
        let col = self.goal_col.unwrap_or_else(|| self.line_col(text).1);
        let start = line_start(text, self.pos);
        if start == 0 {
            self.pos = 0;
        } else {
            let prev_start = line_start(text, start - 1);
            self.pos = offset_at_col(text, prev_start, col);
        }
        self.goal_col = Some(col);
    }

    /// Moves down one line, keeping the goal column. On the last line, goes to the end.
    pub fn down(&mut self, text: &str) {
        let col = self.goal_col.unwrap_or_else(|| self.line_col(text).1);
        let end = line_end(text, self.pos);
        if end == text.len() {
            self.pos = text.len();
        } else {
            self.pos = offset_at_col(text, end + 1, col);
        }
        self.goal_col = Some(col);
    }

    /// Zero-based (row, column in chars) of the cursor.
    pub fn line_col(&self, text: &str) -> (usize, usize) {
        let before = &text[..self.pos];
        let row = before.matches('\n').count();
        let col = before[line_start(text, self.pos)..].chars().count();
        (row, col)
    }
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map(|i| pos + i).unwrap_or(text.len())
}

fn offset_at_col(text: &str, start: usize, col: usize) -> usize {
    let end = line_end(text, start);
    text[start..end]
        .char_indices()
        .nth(col)
        .map(|(i, _)| start + i)
        .unwrap_or(end)
}
