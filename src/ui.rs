pub mod keyboard;
pub mod word_list;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::app::{App, Focus};
use crate::sound::SoundConfig;

const HORIZONTAL_MARGIN: u16 = 2;

fn panel(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // sound settings
                Constraint::Length(3), // current word
                Constraint::Length(7), // keyboard
                Constraint::Length(3), // progress
                Constraint::Min(3),    // word list
                Constraint::Length(1), // prompt / help
            ])
            .split(area);

        render_settings(self.sound.config(), self.focus == Focus::Settings)
            .render(chunks[0], buf);
        render_word(self).render(chunks[1], buf);
        keyboard::KeyboardView::new(self.session.expected_letter()).render(chunks[2], buf);

        Gauge::default()
            .block(panel("Progress", false))
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(self.session.progress().clamp(0.0, 100.0) as u16)
            .render(chunks[3], buf);

        word_list::WordListView::new(
            &self.session,
            self.selected,
            matches!(self.focus, Focus::WordList | Focus::AddWord),
        )
        .render(chunks[4], buf);

        render_footer(self).render(chunks[5], buf);
    }
}

fn render_settings(config: SoundConfig, focused: bool) -> Paragraph<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::raw("sound "),
        Span::styled(if config.enabled { "on" } else { "off" }, bold),
        Span::raw("   theme "),
        Span::styled(config.theme.to_string(), bold),
        Span::raw("   volume "),
        Span::styled(format!("{:.0}%", config.volume * 100.0), bold),
    ]);
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(panel("Sound", focused))
}

fn render_word(app: &App) -> Paragraph<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let done = bold.fg(Color::Green);
    let current = bold
        .fg(Color::Yellow)
        .add_modifier(Modifier::UNDERLINED);
    let pending = bold.add_modifier(Modifier::DIM);

    let letter = app.session.cursor().letter;
    let advancing = app.session.is_advancing();
    let spans: Vec<Span> = app
        .session
        .current_word()
        .chars()
        .enumerate()
        .map(|(idx, c)| {
            let style = if advancing || idx < letter {
                done
            } else if idx == letter {
                current
            } else {
                pending
            };
            let shown = if c == ' ' { '·' } else { c };
            Span::styled(shown.to_string(), style)
        })
        .collect();

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(panel("Type", app.focus == Focus::Typing))
}

fn render_footer(app: &App) -> Paragraph<'_> {
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    match app.focus {
        Focus::AddWord => Paragraph::new(Line::from(vec![
            Span::styled("new word: ", italic),
            Span::styled(
                format!("{}█", app.session.draft()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   (enter) add / (esc) cancel", italic),
        ])),
        Focus::Typing => Paragraph::new(Span::styled(
            "type the highlighted letter / (tab) words / (esc)ape",
            italic,
        )),
        Focus::WordList => Paragraph::new(Span::styled(
            "(↑/↓) select / (shift+↑/↓) move / (d)elete / (a)dd / (tab) settings / (esc) back",
            italic,
        )),
        Focus::Settings => Paragraph::new(Span::styled(
            "(m)ute / (t)heme / (+/-) volume / (tab) typing / (esc) back",
            italic,
        )),
    }
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::sound::SoundStore;
    use std::time::{Duration, Instant};

    fn render(app: &App) -> Buffer {
        let area = Rect::new(0, 0, 90, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    fn app(words: &[&str]) -> App {
        App::new(
            Session::new(words.iter().copied(), Duration::from_millis(100)),
            SoundStore::inert(),
        )
    }

    #[test]
    fn shows_word_keyboard_and_list() {
        let app = app(&["cat", "dog"]);
        let text = buffer_text(&render(&app));
        assert!(text.contains("cat"));
        assert!(text.contains("dog"));
        assert!(text.contains(" q "));
        assert!(text.contains("Progress"));
        assert!(text.contains("theme none"));
    }

    #[test]
    fn current_letter_is_underlined() {
        let mut app = app(&["cat"]);
        app.session.press('c', Instant::now());
        let buf = render(&app);

        let underlined: Vec<String> = buf
            .content()
            .iter()
            .filter(|c| c.modifier.contains(Modifier::UNDERLINED))
            .map(|c| c.symbol().to_string())
            .collect();
        assert_eq!(underlined, vec!["a".to_string()]);
    }

    #[test]
    fn add_word_prompt_shows_draft() {
        let mut app = app(&["cat"]);
        app.focus = Focus::AddWord;
        app.session.set_draft("zebra");
        let text = buffer_text(&render(&app));
        assert!(text.contains("new word: zebra"));
    }

    #[test]
    fn renders_in_tiny_area() {
        let app = app(&["cat"]);
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);
    }
}
