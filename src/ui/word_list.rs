use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::session::Session;

/// Editable word list panel
pub struct WordListView<'a> {
    session: &'a Session,
    selected: usize,
    focused: bool,
}

impl<'a> WordListView<'a> {
    pub fn new(session: &'a Session, selected: usize, focused: bool) -> Self {
        Self {
            session,
            selected,
            focused,
        }
    }

    fn items(&self) -> Vec<ListItem<'a>> {
        let current = self.session.cursor().word;
        let column = self
            .session
            .words()
            .iter()
            .map(|w| w.width())
            .max()
            .unwrap_or(0);

        self.session
            .words()
            .iter()
            .enumerate()
            .map(|(idx, word)| {
                let marker = if idx == current { "▶ " } else { "  " };
                let padding = " ".repeat(column - word.width());
                let mut style = if idx == current {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                if self.focused && idx == self.selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{word}{padding}"), style),
                    Span::styled(
                        format!("  {}", word.chars().count()),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect()
    }
}

impl Widget for WordListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = format!("Words ({})", self.session.words().len());
        let list = List::new(self.items()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        );
        // scrolls so the selected row stays inside the panel
        let mut state = ListState::default().with_selected(Some(self.selected));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;
    use std::time::Duration;

    #[test]
    fn marks_current_and_selected() {
        let session = Session::new(["alpha", "be"], Duration::from_millis(100));
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        WordListView::new(&session, 1, true).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Words (2)"));
        assert!(text.contains("▶ alpha  5"));
        assert!(text.contains("  be     2"));

        let reversed: String = buf
            .content()
            .iter()
            .filter(|c| c.modifier.contains(Modifier::REVERSED))
            .map(|c| c.symbol())
            .collect();
        assert_eq!(reversed, "be   ");
    }

    #[test]
    fn long_list_scrolls_to_selection() {
        let words = [
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
            "eleven", "twelve",
        ];
        let session = Session::new(words, Duration::from_millis(100));
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        WordListView::new(&session, 10, true).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("eleven"));
        assert!(!text.contains("▶ one"));
    }
}
