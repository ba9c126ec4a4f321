use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::keyboard::{key_tone, KeyTone, ROWS};

/// On-screen QWERTY keyboard with the expected key highlighted
pub struct KeyboardView {
    target: Option<char>,
}

impl KeyboardView {
    pub fn new(target: Option<char>) -> Self {
        Self { target }
    }

    fn key_style(tone: KeyTone) -> Style {
        match tone {
            KeyTone::Target => Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            KeyTone::Vowel => Style::default().fg(Color::Black).bg(Color::LightBlue),
            KeyTone::Consonant => Style::default().fg(Color::Black).bg(Color::LightGreen),
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(ROWS.len() * 2);
        for (row_idx, row) in ROWS.iter().enumerate() {
            // stagger rows like a physical keyboard
            let mut spans = vec![Span::raw(" ".repeat(row_idx * 2))];
            for &letter in row.iter() {
                let style = Self::key_style(key_tone(letter, self.target));
                spans.push(Span::styled(format!(" {letter} "), style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
            if row_idx + 1 < ROWS.len() {
                lines.push(Line::default());
            }
        }
        lines
    }
}

impl Widget for KeyboardView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        Paragraph::new(self.lines())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Keyboard"))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;

    fn render(target: Option<char>) -> Buffer {
        let area = Rect::new(0, 0, 60, 7);
        let mut buf = Buffer::empty(area);
        KeyboardView::new(target).render(area, &mut buf);
        buf
    }

    #[test]
    fn draws_three_rows() {
        let text = buffer_text(&render(None));
        assert!(text.contains(" q "));
        assert!(text.contains(" a "));
        assert!(text.contains(" m "));
    }

    #[test]
    fn target_key_is_yellow() {
        let buf = render(Some('G'));
        let yellow: String = buf
            .content()
            .iter()
            .filter(|c| c.bg == Color::Yellow)
            .map(|c| c.symbol())
            .collect();
        assert_eq!(yellow, " g ");
    }

    #[test]
    fn no_target_for_space() {
        let buf = render(Some(' '));
        assert!(buf.content().iter().all(|c| c.bg != Color::Yellow));
    }
}
