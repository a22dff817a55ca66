use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app_dirs::AppDirs;
use crate::config::Config;
use crate::error::SessionError;
use crate::handoff::{load_record_file, ResultsChannel};
use crate::question::{QuestionBank, QuestionKind};
use crate::results::ResultsRecord;
use crate::review::{export_to_dir, ReviewState};
use crate::routes::Route;
use crate::session::{QuizSession, SessionPhase, SubmitOutcome, SubmitTrigger};
use crate::settings::{Difficulty, QuizSettings, MAX_QUESTIONS, MIN_QUESTIONS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(t) | Notice::Error(t) => t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Quit,
}

/// Question types in the order of their dashboard toggle keys (1-4).
pub const TYPE_KEYS: [QuestionKind; 4] = [
    QuestionKind::MultipleChoice,
    QuestionKind::TrueFalse,
    QuestionKind::ShortAnswer,
    QuestionKind::FillBlank,
];

#[derive(Debug)]
pub struct App {
    pub settings: QuizSettings,
    source_bank: QuestionBank,
    route: Route,
    session: Option<QuizSession>,
    review: Option<ReviewState>,
    channel: ResultsChannel,
    option_cursor: usize,
    notice: Option<Notice>,
    export_dir: PathBuf,
}

impl App {
    pub fn new(config: &Config, source_bank: QuestionBank) -> Self {
        Self {
            settings: config.settings(),
            source_bank,
            route: Route::Dashboard,
            session: None,
            review: None,
            channel: ResultsChannel::new(),
            option_cursor: 0,
            notice: None,
            export_dir: config
                .export_dir
                .clone()
                .unwrap_or_else(AppDirs::default_export_dir),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn review(&self) -> Option<&ReviewState> {
        self.review.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn option_cursor(&self) -> usize {
        self.option_cursor
    }

    pub fn source_bank(&self) -> &QuestionBank {
        &self.source_bank
    }

    pub fn channel(&self) -> &ResultsChannel {
        &self.channel
    }

    pub fn set_export_dir<P: AsRef<Path>>(&mut self, dir: P) {
        self.export_dir = dir.as_ref().to_path_buf();
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(from = %self.route, to = %route, "navigate");
        self.leave_session();
        self.review = None;

        match route {
            Route::Dashboard => self.route = Route::Dashboard,
            Route::QuizTake => self.start_quiz(),
            Route::QuizResults => match self.channel.receive() {
                Ok(record) => {
                    self.review = Some(ReviewState::new(record));
                    self.route = Route::QuizResults;
                }
                Err(err) => {
                    tracing::warn!(%err, "no results to show, redirecting");
                    self.notice = Some(Notice::Error(
                        "No quiz results found. Take a quiz first.".to_string(),
                    ));
                    self.route = Route::Dashboard;
                }
            },
        }
    }

    /// Open a saved results file on the results screen.
    pub fn open_review_file<P: AsRef<Path>>(&mut self, path: P) {
        match load_record_file(path.as_ref()) {
            Ok(record) => {
                if !self.publish(&record) {
                    return;
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.as_ref().display(), %err, "cannot open results file")
            }
        }
        self.navigate(Route::QuizResults);
    }

    fn start_quiz(&mut self) {
        let picked = self
            .source_bank
            .select(&self.settings, &mut rand::thread_rng());
        match picked {
            Ok(bank) => {
                let mut session = QuizSession::new(bank, self.settings.time_limit_secs);
                session.start();
                self.session = Some(session);
                self.option_cursor = 0;
                self.notice = None;
                self.route = Route::QuizTake;
            }
            Err(err) => {
                self.notice = Some(Notice::Error(err.to_string()));
                self.route = Route::Dashboard;
            }
        }
    }

    fn leave_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if matches!(
                session.phase(),
                SessionPhase::InProgress | SessionPhase::ConfirmPending { .. }
            ) {
                session.abandon();
            }
        }
    }

    /// Store `record` for the results screen. False when it could not be stored.
    fn publish(&mut self, record: &ResultsRecord) -> bool {
        match self.channel.publish(record) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("failed to store results: {e}");
                self.notice = Some(Notice::Error(format!("Could not store results: {e}")));
                false
            }
        }
    }

    fn complete(&mut self, record: ResultsRecord) {
        if self.publish(&record) {
            self.navigate(Route::QuizResults);
            return;
        }
        // an older record may still be in the channel; never show it for this attempt
        self.channel.clear();
        self.leave_session();
        self.review = None;
        self.route = Route::Dashboard;
    }

    /// Called on every runner tick. Returns true when the screen should be redrawn.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if let Some(record) = session.advance(now) {
            self.complete(record);
        }
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppControl {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.leave_session();
            return AppControl::Quit;
        }

        match self.route {
            Route::Dashboard => self.dashboard_key(key),
            Route::QuizTake => self.quiz_key(key),
            Route::QuizResults => self.results_key(key),
        }
    }

    fn dashboard_key(&mut self, key: KeyEvent) -> AppControl {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppControl::Quit,
            KeyCode::Char('t') | KeyCode::Enter => self.navigate(Route::QuizTake),
            KeyCode::Char('r') => self.navigate(Route::QuizResults),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.settings.question_count = (self.settings.question_count + 1).min(MAX_QUESTIONS);
            }
            KeyCode::Char('-') => {
                self.settings.question_count = self
                    .settings
                    .question_count
                    .saturating_sub(1)
                    .max(MIN_QUESTIONS);
            }
            KeyCode::Char('d') => {
                self.settings.difficulty = match self.settings.difficulty {
                    Difficulty::Easy => Difficulty::Medium,
                    Difficulty::Medium => Difficulty::Hard,
                    Difficulty::Hard => Difficulty::Easy,
                };
            }
            KeyCode::Char('x') => self.settings.shuffle = !self.settings.shuffle,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.settings.toggle_type(TYPE_KEYS[idx]);
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn quiz_key(&mut self, key: KeyEvent) -> AppControl {
        let Some(phase) = self.session.as_ref().map(|s| s.phase()) else {
            self.navigate(Route::Dashboard);
            return AppControl::Continue;
        };

        if let SessionPhase::ConfirmPending { .. } = phase {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm(),
                KeyCode::Char('n') | KeyCode::Esc => {
                    if let Some(session) = self.session.as_mut() {
                        session.cancel_submit();
                    }
                }
                _ => {}
            }
            return AppControl::Continue;
        }

        match key.code {
            KeyCode::Esc => self.navigate(Route::Dashboard),
            KeyCode::Up | KeyCode::Char('k') => {
                self.option_cursor = self.option_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let options = self.current_option_count();
                if self.option_cursor + 1 < options {
                    self.option_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.select_option(self.option_cursor),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if idx < self.current_option_count() {
                    self.option_cursor = idx;
                    self.select_option(idx);
                }
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => {
                if let Some(session) = self.session.as_mut() {
                    if session.go_next() {
                        self.sync_cursor();
                    }
                }
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => {
                if let Some(session) = self.session.as_mut() {
                    if session.go_previous() {
                        self.sync_cursor();
                    }
                }
            }
            KeyCode::Char('s') => self.submit(),
            _ => {}
        }
        AppControl::Continue
    }

    fn results_key(&mut self, key: KeyEvent) -> AppControl {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppControl::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(review) = self.review.as_mut() {
                    review.select_previous();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(review) = self.review.as_mut() {
                    review.select_next();
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(review) = self.review.as_mut() {
                    review.toggle_selected();
                }
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.navigate(Route::QuizTake),
            KeyCode::Char('d') => self.navigate(Route::Dashboard),
            _ => {}
        }
        AppControl::Continue
    }

    fn current_option_count(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.current_question())
            .map_or(0, |q| q.options.len())
    }

    /// Put the option cursor on the current question's chosen option, if any.
    fn sync_cursor(&mut self) {
        self.option_cursor = self
            .session
            .as_ref()
            .and_then(|s| {
                let chosen = s.answer_for(s.current_index())?;
                s.current_question()?.options.iter().position(|o| o == chosen)
            })
            .unwrap_or(0);
    }

    fn select_option(&mut self, idx: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.select_option(idx) {
            self.on_session_error(err);
        }
    }

    /// Explicit submit, offered on the last question.
    fn submit(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_last_question() {
            self.notice = Some(Notice::Info(
                "Submit is available on the last question.".to_string(),
            ));
            return;
        }
        match session.request_submit(SubmitTrigger::User) {
            Ok(SubmitOutcome::ConfirmationRequired { .. }) => {}
            Ok(SubmitOutcome::Scored(record)) => self.complete(record),
            Err(err) => self.on_session_error(err),
        }
    }

    fn confirm(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.confirm_submit() {
            Ok(record) => self.complete(record),
            Err(err) => self.on_session_error(err),
        }
    }

    fn on_session_error(&mut self, err: SessionError) {
        match err {
            SessionError::SubmissionConflict => {
                tracing::debug!("duplicate submission ignored");
            }
            SessionError::NotInProgress => {}
            SessionError::Validation(e) => self.notice = Some(Notice::Error(e.to_string())),
        }
    }

    fn export(&mut self) {
        let Some(review) = self.review.as_ref() else {
            return;
        };
        self.notice = Some(match export_to_dir(review.record(), &self.export_dir) {
            Ok(path) => Notice::Info(format!("Results exported to {}", path.display())),
            Err(e) => {
                tracing::error!("export failed: {e}");
                Notice::Error(format!("Export failed: {e}"))
            }
        });
    }
}
