use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

/// What the text typed into the prompt is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptTarget {
    GlobalSearch,
    ColumnSearch(String),
}

impl PromptTarget {
    pub fn label(&self) -> String {
        match self {
            PromptTarget::GlobalSearch => "Search".to_string(),
            PromptTarget::ColumnSearch(column) => format!("Search {column}"),
        }
    }
}

/// A single-line editor for the prompt.
#[derive(Default)]
pub struct Inputter {
    target: Option<PromptTarget>,
    current_input: String,
    cursor_pos: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputResult {
    pub input: String,
    pub finished: bool,
    pub canceled: bool,
    pub cursor_pos: usize,
}

impl Inputter {
    pub fn open(&mut self, target: PromptTarget, initial: &str) {
        trace!("Prompt for {target:?}, starting with {initial:?}");
        self.target = Some(target);
        self.current_input = initial.to_string();
        self.cursor_pos = initial.chars().count();
    }

    pub fn is_active(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&PromptTarget> {
        self.target.as_ref()
    }

    /// Feeds one key. A finished result closes the prompt.
    pub fn read(&mut self, key: KeyEvent) -> InputResult {
        let result = match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => self.finish(false),
            (KeyCode::Esc, _) => self.finish(true),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Left, _) => self.left(),
            (KeyCode::Right, _) => self.right(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert(c),
            _ => self.get(false, false),
        };
        if result.finished {
            self.target = None;
            self.current_input.clear();
            self.cursor_pos = 0;
        }
        result
    }

    pub fn get(&self, finished: bool, canceled: bool) -> InputResult {
        InputResult {
            input: self.current_input.clone(),
            finished,
            canceled,
            cursor_pos: self.cursor_pos,
        }
    }

    fn finish(&mut self, canceled: bool) -> InputResult {
        self.get(true, canceled)
    }

    fn backspace(&mut self) -> InputResult {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.byte_pos();
            self.current_input.remove(at);
        }
        self.get(false, false)
    }

    fn left(&mut self) -> InputResult {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
        self.get(false, false)
    }

    fn right(&mut self) -> InputResult {
        if self.cursor_pos < self.current_input.chars().count() {
            self.cursor_pos += 1;
        }
        self.get(false, false)
    }

    fn insert(&mut self, chr: char) -> InputResult {
        let at = self.byte_pos();
        self.current_input.insert(at, chr);
        self.cursor_pos += 1;
        self.get(false, false)
    }

    fn byte_pos(&self) -> usize {
        self.current_input
            .char_indices()
            .nth(self.cursor_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.current_input.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(inputter: &mut Inputter, text: &str) {
        for c in text.chars() {
            inputter.read(KeyEvent::from(KeyCode::Char(c)));
        }
    }

    #[test]
    fn edits_in_the_middle() {
        let mut inputter = Inputter::default();
        inputter.open(PromptTarget::GlobalSearch, "Pscal");
        inputter.read(KeyEvent::from(KeyCode::Left));
        inputter.read(KeyEvent::from(KeyCode::Left));
        inputter.read(KeyEvent::from(KeyCode::Left));
        inputter.read(KeyEvent::from(KeyCode::Left));
        typed(&mut inputter, "a");

        let result = inputter.read(KeyEvent::from(KeyCode::Enter));
        assert_eq!(result.input, "Pascal");
        assert!(result.finished && !result.canceled);
        assert!(!inputter.is_active());
    }

    #[test]
    fn backspace_removes_before_the_cursor() {
        let mut inputter = Inputter::default();
        inputter.open(PromptTarget::ColumnSearch("name".into()), "");
        typed(&mut inputter, "Baljèt");
        inputter.read(KeyEvent::from(KeyCode::Left));
        let result = inputter.read(KeyEvent::from(KeyCode::Backspace));
        assert_eq!(result.input, "Baljt");
        assert_eq!(result.cursor_pos, 4);
    }

    #[test]
    fn escape_cancels() {
        let mut inputter = Inputter::default();
        inputter.open(PromptTarget::GlobalSearch, "x");
        let result = inputter.read(KeyEvent::from(KeyCode::Esc));
        assert!(result.canceled);
        assert!(inputter.target().is_none());
    }
}
