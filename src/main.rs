use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, warn};
use rand::Rng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use spelldrill::{
    app::App,
    app_dirs::AppDirs,
    audio::{
        Accent, AudioCoordinator, BellEffects, CommandSpeechEngine, NullSpeech, SilentEffects,
        SoundEffectPlayer, SpeechEngine,
    },
    config::{Config, ConfigStore, FileConfigStore},
    practice::{PracticeOptions, PracticeSession},
    progress::{JsonLinesScheduler, LogScheduler, ProgressEmitter, ReviewScheduler},
    runtime::{FixedTicker, Runner, TerminalEventSource},
    timers::SystemClock,
    visibility::DisplayMode,
    word::Word,
    word_source::{builtin_names, load_builtin, load_file},
    TICK_RATE_MS,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

/// vocabulary spelling practice in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Spell vocabulary words letter by letter with hidden-letter modes, pronunciation, and a 1/5 review score for each attempt."
)]
pub struct Cli {
    /// built-in book to practise
    #[clap(short = 'b', long, conflicts_with = "words")]
    book: Option<String>,

    /// JSON word list to practise instead of a built-in book
    #[clap(short = 'w', long)]
    words: Option<PathBuf>,

    /// how much of each word is shown
    #[clap(short = 'm', long, value_enum)]
    mode: Option<DisplayMode>,

    /// pronunciation accent
    #[clap(short = 'a', long, value_enum)]
    accent: Option<Accent>,

    /// speech rate multiplier (1.0 is normal)
    #[clap(long)]
    rate: Option<f32>,

    /// never pronounce words
    #[clap(long)]
    no_speech: bool,

    /// no success/failure sounds
    #[clap(long)]
    no_sound: bool,

    /// seed for hide-random masks
    #[clap(long)]
    seed: Option<u64>,

    /// shuffle the word order
    #[clap(long)]
    shuffle: bool,

    /// practise at most this many words
    #[clap(short = 'n', long)]
    limit: Option<usize>,

    /// append review events as JSON lines to this file
    #[clap(long)]
    review_log: Option<PathBuf>,

    /// list the built-in books and exit
    #[clap(long)]
    list_books: bool,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command-line flags win over the config file for this run.
    fn apply_to(&self, cfg: &mut Config) {
        if let Some(book) = &self.book {
            cfg.book = book.clone();
        }
        if let Some(mode) = self.mode {
            cfg.display_mode = mode;
        }
        if let Some(accent) = self.accent {
            cfg.accent = accent;
        }
        if let Some(rate) = self.rate {
            cfg.speech_rate = rate;
        }
        if self.no_speech {
            cfg.speech = false;
        }
        if self.no_sound {
            cfg.sound_effects = false;
        }
        if self.seed.is_some() {
            cfg.random_seed = self.seed;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if cli.list_books {
        for name in builtin_names() {
            let book = load_builtin(&name)?;
            println!("{:<12} {:>3} words  {}", name, book.words.len(), book.description);
        }
        return Ok(());
    }

    let store = FileConfigStore::new();
    let mut config = store.load();
    cli.apply_to(&mut config);
    if cli.save_config {
        store.save(&config)?;
        info!("saved settings to {}", store.path().display());
    }

    let mut book = match &cli.words {
        Some(path) => load_file(path)?,
        None => load_builtin(&config.book)?,
    };
    if cli.shuffle {
        book.shuffle(&mut rand::thread_rng());
    }
    if let Some(limit) = cli.limit {
        book.truncate(limit);
    }
    info!("practising {} ({} words)", book.name, book.words.len());

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let session = build_session(&config, cli.review_log.as_deref(), book.words)?;
    let mut app = App::new(session, book.name);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let stats = app.session.stats();
    println!(
        "{} attempts, {} correct ({}%)",
        stats.input_count,
        stats.correct_count,
        stats.accuracy()
    );

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        TerminalEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    while !app.should_quit {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        app.handle_event(runner.step());
    }

    Ok(())
}

fn build_session(
    config: &Config,
    review_log: Option<&Path>,
    words: Vec<Word>,
) -> Result<PracticeSession, Box<dyn Error>> {
    let speech: Box<dyn SpeechEngine> = if config.speech {
        Box::new(CommandSpeechEngine::detect())
    } else {
        Box::new(NullSpeech)
    };
    let audio = AudioCoordinator::new(
        speech,
        effect_player(config.sound_effects),
        config.accent,
        config.speech_rate,
    );
    if config.speech && !audio.speech_available() {
        warn!("no espeak-ng or espeak on PATH, words will not be pronounced");
    }

    let scheduler: Box<dyn ReviewScheduler> = match review_log {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Box::new(JsonLinesScheduler::new(file))
        }
        None => Box::new(LogScheduler),
    };

    let options = PracticeOptions {
        display_mode: config.display_mode,
        seed: config
            .random_seed
            .unwrap_or_else(|| rand::thread_rng().gen()),
        timings: config.timings(),
    };

    Ok(PracticeSession::new(
        words,
        options,
        audio,
        ProgressEmitter::new(scheduler),
        Box::new(SystemClock),
    )?)
}

fn effect_player(enabled: bool) -> Box<dyn SoundEffectPlayer> {
    if !enabled {
        return Box::new(SilentEffects);
    }

    #[cfg(feature = "chimes")]
    {
        match spelldrill::audio::ChimeEffects::new(0.2) {
            Ok(chimes) => return Box::new(chimes),
            Err(e) => warn!("chimes unavailable, using the terminal bell: {e}"),
        }
    }

    Box::new(BellEffects)
}

/// Logs go to a file so they never draw over the TUI. `RUST_LOG` picks the level.
fn init_logging() {
    let path = AppDirs::log_path();
    let file = path
        .parent()
        .map_or(Ok(()), |dir| fs::create_dir_all(dir))
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match file {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("logging disabled, cannot open {}: {e}", path.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    if builder.try_init().is_err() {
        warn!("logger was already initialised");
    }
}
