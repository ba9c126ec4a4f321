use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::key_listener::typed_char;
use crate::session::{Direction, Session, SessionEvent, Transition};
use crate::sound::SoundStore;

const VOLUME_STEP: f32 = 0.1;

/// Which panel receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Typing,
    WordList,
    AddWord,
    Settings,
}

impl Focus {
    /// Tab order; the new-word prompt is reached from the word list only
    fn next(self) -> Self {
        match self {
            Focus::Typing => Focus::WordList,
            Focus::WordList | Focus::AddWord => Focus::Settings,
            Focus::Settings => Focus::Typing,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub sound: SoundStore,
    pub focus: Focus,
    /// Highlighted row in the word list panel
    pub selected: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, sound: SoundStore) -> Self {
        Self {
            session,
            sound,
            focus: Focus::Typing,
            selected: 0,
            should_quit: false,
        }
    }

    pub fn from_config(config: &Config, sound: SoundStore) -> Self {
        let session = Session::new(
            config.words.iter(),
            Duration::from_millis(config.advance_delay_ms),
        );
        Self::new(session, sound)
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.dispatch(SessionEvent::Tick(now));
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if key.code == KeyCode::Tab && self.focus != Focus::AddWord {
            self.focus = self.focus.next();
            return;
        }

        match self.focus {
            Focus::Typing => self.on_typing_key(key, now),
            Focus::WordList => self.on_word_list_key(key),
            Focus::AddWord => self.on_add_word_key(key),
            Focus::Settings => self.on_settings_key(key),
        }
    }

    fn on_typing_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }
        if let Some(c) = typed_char(&key) {
            self.dispatch(SessionEvent::Key { key: c, at: now });
        }
    }

    fn on_word_list_key(&mut self, key: KeyEvent) {
        let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Esc => self.focus = Focus::Typing,
            KeyCode::Up if shifted => self.move_selected(Direction::Up),
            KeyCode::Down if shifted => self.move_selected(Direction::Down),
            KeyCode::Char('K') => self.move_selected(Direction::Up),
            KeyCode::Char('J') => self.move_selected(Direction::Down),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.session.words().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                self.dispatch(SessionEvent::RemoveWord(self.selected));
                self.clamp_selection();
            }
            KeyCode::Char('a') => self.focus = Focus::AddWord,
            _ => {}
        }
    }

    fn on_add_word_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.session.set_draft("");
                self.focus = Focus::WordList;
            }
            KeyCode::Enter => {
                let transition = self.dispatch(SessionEvent::AddWord);
                if transition.rejected.is_none() {
                    self.selected = self.session.words().len() - 1;
                    self.focus = Focus::WordList;
                }
            }
            KeyCode::Backspace => self.session.pop_draft(),
            _ => {
                if let Some(c) = typed_char(&key) {
                    self.session.push_draft(c);
                }
            }
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::Typing,
            KeyCode::Char('m') => self.sound.toggle_sound(),
            KeyCode::Char('t') => self.sound.cycle_theme(),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                self.sound.adjust_volume(VOLUME_STEP)
            }
            KeyCode::Char('-') | KeyCode::Left => self.sound.adjust_volume(-VOLUME_STEP),
            _ => {}
        }
    }

    fn move_selected(&mut self, direction: Direction) {
        let from = self.selected;
        let transition = self.dispatch(SessionEvent::MoveWord { from, direction });
        if transition.rejected.is_none() {
            self.selected = match direction {
                Direction::Up => from - 1,
                Direction::Down => from + 1,
            };
        }
    }

    fn clamp_selection(&mut self) {
        let last = self.session.words().len().saturating_sub(1);
        self.selected = self.selected.min(last);
    }

    /// Apply a session event and voice the cues it produced.
    fn dispatch(&mut self, event: SessionEvent) -> Transition {
        let transition = self.session.handle(event);
        if let Some(reason) = &transition.rejected {
            log::debug!("edit rejected: {reason}");
        }
        for cue in &transition.cues {
            self.sound.play_sound(*cue);
        }
        transition
    }
}
