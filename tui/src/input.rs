//! Line editing for the console prompt.
//!
//! A small editor over a `Vec<char>` buffer (so cursor arithmetic stays
//! correct for multi-byte input) with the handful of bindings the console
//! needs, plus session-local history recall. History lives only in memory
//! for the life of the console — nothing is ever persisted.

/// The console's input line.
pub struct InputLine {
    buffer: Vec<char>,
    cursor: usize,
    history: Vec<String>,
    history_pos: Option<usize>,
    /// In-progress input stashed while browsing history.
    pending: String,
}


impl InputLine {
    pub fn new() -> Self {
        InputLine {
            buffer: Vec::new(),
            cursor: 0,
            history: Vec::new(),
            history_pos: None,
            pending: String::new(),
        }
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Remove the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.buffer.remove(self.cursor);
        }
    }

    /// Remove the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Ctrl-U: clear everything before the cursor.
    pub fn kill_line(&mut self) {
        self.buffer.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Ctrl-W: delete the whitespace-delimited word before the cursor.
    pub fn kill_word(&mut self) {
        let end = self.cursor;
        let mut start = end;
        while start > 0 && self.buffer[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.buffer[start - 1].is_whitespace() {
            start -= 1;
        }
        self.buffer.drain(start..end);
        self.cursor = start;
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Submit the line: record non-empty input in history, clear the
    /// buffer, and hand back the text.
    pub fn submit(&mut self) -> String {
        let text = self.text();
        if !text.trim().is_empty() {
            self.history.push(text.clone());
        }
        self.buffer.clear();
        self.cursor = 0;
        self.history_pos = None;
        self.pending.clear();
        text
    }

    /// Recall the previous history entry (Up).
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next_pos = match self.history_pos {
            None => {
                self.pending = self.text();
                self.history.len() - 1
            }
            Some(0) => return,
            Some(pos) => pos - 1,
        };
        self.history_pos = Some(next_pos);
        self.load(&self.history[next_pos].clone());
    }

    /// Move forward through history (Down); past the newest entry, the
    /// stashed in-progress input is restored.
    pub fn history_next(&mut self) {
        let pos = match self.history_pos {
            None => return,
            Some(pos) => pos,
        };
        if pos + 1 < self.history.len() {
            self.history_pos = Some(pos + 1);
            self.load(&self.history[pos + 1].clone());
        } else {
            self.history_pos = None;
            let pending = self.pending.clone();
            self.load(&pending);
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn load(&mut self, text: &str) {
        self.buffer = text.chars().collect();
        self.cursor = self.buffer.len();
    }
}


impl Default for InputLine {
    fn default() -> Self {
        Self::new()
    }
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
