use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use vquiz::{
    app::{App, AppControl},
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    error::BankError,
    logging,
    question::{QuestionBank, QuestionKind},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, QuizEventSource, Runner, Ticker},
    settings::Difficulty,
};

/// terminal quiz runner: timed sessions, scored results and a reviewable breakdown
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Take a timed multiple-choice quiz in the terminal, then review every question with its correct answer and explanation and export the results to a text file."
)]
pub struct Cli {
    /// built-in question bank to draw from (see --list-banks)
    #[clap(long)]
    bank: Option<String>,

    /// load questions from a JSON file instead of a built-in bank
    #[clap(long, conflicts_with = "bank")]
    bank_file: Option<PathBuf>,

    /// number of questions in the quiz
    #[clap(short = 'n', long)]
    questions: Option<usize>,

    /// quiz difficulty
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// question types to include, comma separated
    #[clap(short = 't', long, value_enum, value_delimiter = ',')]
    types: Vec<QuestionKind>,

    /// time limit in seconds
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// shuffle question order
    #[clap(long)]
    shuffle: bool,

    /// open a saved results file on the results screen
    #[clap(long)]
    review: Option<PathBuf>,

    /// directory the results export is written to
    #[clap(long)]
    export_dir: Option<PathBuf>,

    /// persist the given options as the new defaults
    #[clap(long)]
    save_config: bool,

    /// print the built-in question banks and exit
    #[clap(long)]
    list_banks: bool,
}

impl Cli {
    /// Layer command line options over the stored config.
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(bank) = &self.bank {
            config.bank = bank.clone();
        }
        if let Some(n) = self.questions {
            config.question_count = n;
        }
        if let Some(d) = self.difficulty {
            config.difficulty = d;
        }
        if !self.types.is_empty() {
            config.question_types = self.types.clone();
        }
        if let Some(secs) = self.seconds {
            config.time_limit_secs = secs;
        }
        if self.shuffle {
            config.shuffle = true;
        }
        if let Some(dir) = &self.export_dir {
            config.export_dir = Some(dir.clone());
        }
        config
    }

    fn load_bank(&self, config: &Config) -> Result<QuestionBank, BankError> {
        match &self.bank_file {
            Some(path) => QuestionBank::from_path(path),
            None => QuestionBank::builtin(&config.bank),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.list_banks {
        for name in QuestionBank::builtin_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());

    if let Err(e) = config.settings().validate() {
        Cli::command().error(ErrorKind::ValueValidation, e).exit();
    }

    let bank = match cli.load_bank(&config) {
        Ok(bank) => bank,
        Err(e) => Cli::command().error(ErrorKind::InvalidValue, e).exit(),
    };

    if cli.save_config {
        store.save(&config)?;
        println!("saved defaults to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        logging::init_file_logging(&path);
    }
    tracing::info!(bank = bank.title(), "starting");

    let mut app = App::new(&config, bank);
    if let Some(path) = &cli.review {
        app.open_review_file(path);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: QuizEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let redraw = match runner.step() {
            QuizEvent::Tick => app.on_tick(Instant::now()),
            QuizEvent::Resize => true,
            QuizEvent::Key(key) => {
                if app.handle_key(key) == AppControl::Quit {
                    tracing::info!("quit");
                    return Ok(());
                }
                true
            }
        };

        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::{sync::mpsc, time::Duration};
    use vquiz::{
        routes::Route,
        runtime::TestEventSource,
    };

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["vquiz"]);
        assert_eq!(cli.bank, None);
        assert_eq!(cli.bank_file, None);
        assert_eq!(cli.questions, None);
        assert_eq!(cli.difficulty, None);
        assert!(cli.types.is_empty());
        assert_eq!(cli.seconds, None);
        assert!(!cli.shuffle);
        assert!(!cli.save_config);
        assert!(!cli.list_banks);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["vquiz", "-n", "8", "-d", "hard", "-s", "90"]);
        assert_eq!(cli.questions, Some(8));
        assert_eq!(cli.difficulty, Some(Difficulty::Hard));
        assert_eq!(cli.seconds, Some(90));
    }

    #[test]
    fn test_cli_types_comma_separated() {
        let cli = Cli::parse_from(["vquiz", "--types", "multiple-choice,true-false"]);
        assert_eq!(
            cli.types,
            vec![QuestionKind::MultipleChoice, QuestionKind::TrueFalse]
        );
    }

    #[test]
    fn test_cli_bank_and_bank_file_conflict() {
        let res = Cli::try_parse_from(["vquiz", "--bank", "x", "--bank-file", "y.json"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_apply_to_overrides_config() {
        let cli = Cli::parse_from([
            "vquiz",
            "--bank",
            "neural_networks",
            "-n",
            "3",
            "--shuffle",
            "--export-dir",
            "/tmp/out",
        ]);
        let config = cli.apply_to(Config::default());
        assert_eq!(config.bank, "neural_networks");
        assert_eq!(config.question_count, 3);
        assert!(config.shuffle);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        // untouched fields keep their stored values
        assert_eq!(config.time_limit_secs, Config::default().time_limit_secs);
    }

    #[test]
    fn test_apply_to_keeps_stored_shuffle() {
        let stored = Config {
            shuffle: true,
            ..Config::default()
        };
        let config = Cli::parse_from(["vquiz"]).apply_to(stored);
        assert!(config.shuffle);
    }

    #[test]
    fn test_load_bank_builtin_and_unknown() {
        let cli = Cli::parse_from(["vquiz"]);
        let bank = cli.load_bank(&Config::default()).unwrap();
        assert_eq!(bank.title(), "Machine Learning Quiz");

        let config = Config {
            bank: "no_such_bank".to_string(),
            ..Config::default()
        };
        assert!(cli.load_bank(&config).is_err());
    }

    #[test]
    fn test_start_tui_quits_on_q() {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        );
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(&Config::default(), QuestionBank::builtin("machine_learning").unwrap());

        tx.send(QuizEvent::Key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE)))
            .unwrap();
        tx.send(QuizEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();
        tx.send(QuizEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
            .unwrap();

        start_tui(&mut terminal, &mut app, &runner).unwrap();
        assert_eq!(app.route(), Route::Dashboard);
    }
}
