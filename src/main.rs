use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keystep::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{CrosstermEventSource, FixedTicker, Runner, TutorEvent},
    sound::{AudioSink, NullSink, SoundStore, SoundTheme, ToneGenerator},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

/// terminal typing tutor with an on-screen keyboard and key sounds
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a cycling list of words letter by letter, guided by a highlighted on-screen keyboard, a progress bar, and synthesized key, word, and error tones."
)]
pub struct Cli {
    /// comma separated words to practice
    #[clap(short = 'w', long, value_delimiter = ',')]
    words: Option<Vec<String>>,

    /// sound theme
    #[clap(short = 't', long, value_enum)]
    theme: Option<SoundTheme>,

    /// playback volume between 0.0 and 1.0
    #[clap(short = 'v', long)]
    volume: Option<f32>,

    /// start with sound disabled
    #[clap(long)]
    mute: bool,

    /// pause in milliseconds after a completed word before the next one
    #[clap(long)]
    advance_delay_ms: Option<u64>,

    /// sample rate used to synthesize sounds
    #[clap(long)]
    sample_rate: Option<u32>,

    /// config file to read instead of the default location
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// file to write logs to (defaults to the user state directory)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer command line flags over file configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(words) = &self.words {
            config.words = words.clone();
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(volume) = self.volume {
            config.volume = volume;
        }
        if self.mute {
            config.sound_enabled = false;
        }
        if let Some(ms) = self.advance_delay_ms {
            config.advance_delay_ms = ms;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate = rate;
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

/// stderr belongs to the TUI, so logs go to a file or nowhere
fn init_logging(path: Option<PathBuf>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    let file = path.and_then(|p| {
        if let Some(parent) = p.parent() {
            let _ = fs::create_dir_all(parent);
        }
        OpenOptions::new().create(true).append(true).open(p).ok()
    });

    match file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

#[cfg(feature = "audio")]
fn open_sink() -> Box<dyn AudioSink> {
    match keystep::sound::output::RodioSink::open_default() {
        Ok(sink) => Box::new(sink),
        Err(e) => {
            log::warn!("{e}; sound cues will be silent");
            Box::new(NullSink)
        }
    }
}

#[cfg(not(feature = "audio"))]
fn open_sink() -> Box<dyn AudioSink> {
    log::info!("built without the `audio` feature; sound cues will be silent");
    Box::new(NullSink)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.clone().or_else(AppDirs::log_path));
    log::info!("keystep {} starting", env!("CARGO_PKG_VERSION"));

    let config = cli.apply(cli.config_store().load());
    let sound = SoundStore::new(
        config.sound_config(),
        ToneGenerator::new(config.sample_rate),
        open_sink(),
    );
    let mut app = App::from_config(&config, sound);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("session ended with error: {e}");
    }
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    terminal.draw(|f| ui(app, f))?;

    while !app.should_quit {
        match runner.step() {
            TutorEvent::Tick(now) => {
                let before = app.session.cursor();
                app.on_tick(now);
                // only a fired word advance changes what is on screen
                if app.session.cursor() != before {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            TutorEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            TutorEvent::Key(key) => {
                app.on_key(key, Instant::now());
                terminal.draw(|f| ui(app, f))?;
            }
            TutorEvent::Closed => {
                return Err("terminal input closed".into());
            }
        }
    }

    log::info!("quitting");
    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["keystep"]).unwrap();
        assert_eq!(cli.apply(Config::default()), Config::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "keystep",
            "-w",
            "cat,dog",
            "--theme",
            "typewriter",
            "--volume",
            "0.3",
            "--mute",
            "--advance-delay-ms",
            "250",
            "--sample-rate",
            "22050",
        ])
        .unwrap();

        let cfg = cli.apply(Config::default());
        assert_eq!(cfg.words, vec!["cat".to_string(), "dog".to_string()]);
        assert_eq!(cfg.theme, SoundTheme::Typewriter);
        assert_eq!(cfg.volume, 0.3);
        assert!(!cfg.sound_enabled);
        assert_eq!(cfg.advance_delay_ms, 250);
        assert_eq!(cfg.sample_rate, 22_050);
    }

    #[test]
    fn theme_none_is_accepted() {
        let cli = Cli::try_parse_from(["keystep", "-t", "none"]).unwrap();
        assert_eq!(cli.theme, Some(SoundTheme::None));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["keystep", "--theme", "piano"]).is_err());
    }

    #[test]
    fn explicit_config_path_is_used() {
        let cli = Cli::try_parse_from(["keystep", "-c", "/tmp/keystep-test.json"]).unwrap();
        assert_eq!(
            cli.config_store().path(),
            std::path::Path::new("/tmp/keystep-test.json")
        );
    }
}
