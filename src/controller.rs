use std::io;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent};
use tablestate::DataStore;
use tracing::trace;

use crate::model::Model;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveLeft,
    MoveRight,
    NextPage,
    PreviousPage,
    SortColumn,
    HideColumn,
    /// Toggle the n-th defined column (0-based), hidden or not.
    ToggleColumn(usize),
    SearchGlobal,
    SearchColumn,
    CycleFilter,
    Reset,
    RawKey(KeyEvent),
}

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(event_poll_time: u64) -> Self {
        Self { event_poll_time }
    }

    pub fn handle_event<S: DataStore>(&self, model: &Model<S>) -> io::Result<Option<Message>> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Message::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Message::PreviousPage),
            KeyCode::Char('s') => Some(Message::SortColumn),
            KeyCode::Char('x') => Some(Message::HideColumn),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|d| Message::ToggleColumn(d as usize - 1)),
            KeyCode::Char('/') => Some(Message::SearchGlobal),
            KeyCode::Char('f') => Some(Message::SearchColumn),
            KeyCode::Char('v') => Some(Message::CycleFilter),
            KeyCode::Char('r') => Some(Message::Reset),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<Message> {
        Controller::new(0).handle_key(KeyEvent::from(code))
    }

    #[test]
    fn maps_table_keys() {
        assert_eq!(press(KeyCode::Char('r')), Some(Message::Reset));
        assert_eq!(press(KeyCode::Char('s')), Some(Message::SortColumn));
        assert_eq!(press(KeyCode::PageDown), Some(Message::NextPage));
        assert_eq!(press(KeyCode::Char('3')), Some(Message::ToggleColumn(2)));
        assert_eq!(press(KeyCode::Char('z')), None);
    }
}
