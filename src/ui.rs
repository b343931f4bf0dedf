use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph, Row, Table},
};
use tablestate::{DataStore, SortDirection, TableView};

use crate::model::Model;

pub const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

const HELP_TEXT: &str =
    " ←/→ column  n/p page  s sort  x hide  1-9 toggle  / search  f column search  v filter  r reset  q quit";

#[derive(Debug, Default)]
pub struct TableUI;

impl TableUI {
    pub fn draw<S: DataStore>(&mut self, model: &Model<S>, frame: &mut Frame) {
        let [table_area, status_area, prompt_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        match model.view() {
            Some(view) => {
                self.draw_table(view, model.cursor_column(), frame, table_area);
                self.draw_status(model, view, frame, status_area);
            }
            None => frame.render_widget(Paragraph::new("Loading ..."), table_area),
        }
        self.draw_prompt(model, frame, prompt_area);
    }

    fn draw_table(&self, view: &TableView, cursor: usize, frame: &mut Frame, area: Rect) {
        let header = Row::new(view.columns.iter().enumerate().map(|(idx, key)| {
            let label = view
                .state
                .column(key)
                .map(|c| c.label.clone())
                .unwrap_or_else(|| key.clone());
            let marker = match (&view.state.sort.column, view.state.sort.direction) {
                (Some(sorted), SortDirection::Asc) if sorted == key => " ▲",
                (Some(sorted), SortDirection::Desc) if sorted == key => " ▼",
                _ => "",
            };
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if idx == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if view.state.filters.contains_key(key) {
                style = style.fg(Color::Yellow);
            }
            Cell::from(format!("{label}{marker}")).style(style)
        }));

        let rows = view
            .rows
            .iter()
            .map(|row| Row::new(row.values().map(|v| Cell::from(v.to_string()))));
        let widths = view.columns.iter().map(|_| Constraint::Fill(1));

        let title = Line::from(format!(
            " page {}/{} ({} rows) ",
            view.page(),
            view.page_count(),
            view.total_count
        ));
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(
                Block::bordered()
                    .title(title.centered())
                    .border_set(border::THICK),
            );
        frame.render_widget(table, area);
    }

    fn draw_status<S: DataStore>(
        &self,
        model: &Model<S>,
        view: &TableView,
        frame: &mut Frame,
        area: Rect,
    ) {
        let mut spans = Vec::new();
        if view.show_reset() {
            spans.push(Span::styled(
                " [r] reset ",
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
        }
        if !view.state.search.is_empty() {
            spans.push(Span::raw(format!(" search: \"{}\"", view.state.search)));
        }
        for entry in view.state.filters.values() {
            spans.push(Span::raw(format!(" {}={}", entry.column, entry.value)));
        }
        let hidden: Vec<String> = view
            .state
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.visible)
            .map(|(idx, c)| format!("{}:{}", idx + 1, c.key))
            .collect();
        if !hidden.is_empty() {
            spans.push(Span::styled(
                format!(" hidden: {}", hidden.join(" ")),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if model.last_status_message_update().elapsed() < STATUS_MESSAGE_TIMEOUT {
            spans.push(Span::styled(
                format!("  {}", model.status_message()),
                Style::default().fg(Color::Cyan),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_prompt<S: DataStore>(&self, model: &Model<S>, frame: &mut Frame, area: Rect) {
        match model.prompt() {
            Some((target, input)) => {
                let label = format!("{}: ", target.label());
                let x = area.x + (label.chars().count() + input.cursor_pos) as u16;
                let line = Line::from(vec![
                    Span::styled(label, Style::default().fg(Color::Blue)),
                    Span::raw(input.input.clone()),
                ]);
                frame.render_widget(Paragraph::new(line), area);
                frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
            }
            None => frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    HELP_TEXT,
                    Style::default().fg(Color::DarkGray),
                ))),
                area,
            ),
        }
    }
}
