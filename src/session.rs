use std::time::Instant;

use chrono::Local;

use crate::answers::{AnswerSheet, Navigator};
use crate::error::{SessionError, ValidationError};
use crate::question::{Question, QuestionBank};
use crate::results::ResultsRecord;
use crate::scorer;
use crate::timer::{SessionTimer, TimerTick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    /// Waiting for the user to confirm submitting with unanswered questions.
    ConfirmPending { unanswered: usize },
    Submitted,
    Scored,
    /// Left without submitting. Terminal, like `Scored`.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    User,
    Timer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    ConfirmationRequired { unanswered: usize, total: usize },
    Scored(ResultsRecord),
}

/// One attempt at a quiz, from start to scored results.
#[derive(Debug)]
pub struct QuizSession {
    bank: QuestionBank,
    sheet: AnswerSheet,
    nav: Navigator,
    timer: SessionTimer,
    phase: SessionPhase,
    submitting: bool,
}

impl QuizSession {
    pub fn new(bank: QuestionBank, time_limit_secs: u64) -> Self {
        let nav = Navigator::new(bank.len());
        Self {
            bank,
            sheet: AnswerSheet::new(),
            nav,
            timer: SessionTimer::new(time_limit_secs),
            phase: SessionPhase::NotStarted,
            submitting: false,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.phase != SessionPhase::NotStarted {
            return;
        }
        self.phase = SessionPhase::InProgress;
        self.timer.start_at(now);
        tracing::info!(
            title = self.bank.title(),
            questions = self.bank.len(),
            time_limit = self.timer.duration_secs(),
            "quiz session started"
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.nav.current())
    }

    pub fn is_last_question(&self) -> bool {
        self.nav.is_last()
    }

    pub fn progress_percent(&self) -> u32 {
        self.nav.progress_percent()
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.bank.get(index).and_then(|q| self.sheet.get(q.id))
    }

    pub fn unanswered_count(&self) -> usize {
        self.sheet.unanswered_count(&self.bank)
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::Submitted | SessionPhase::Scored => Err(SessionError::SubmissionConflict),
            _ => Err(SessionError::NotInProgress),
        }
    }

    /// Record `value` as the answer to question `index`, replacing any earlier answer.
    pub fn select_answer(&mut self, index: usize, value: &str) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let question = self
            .bank
            .get(index)
            .ok_or(ValidationError::QuestionIndexOutOfRange {
                index,
                len: self.bank.len(),
            })?;
        if !question.has_option(value) {
            return Err(ValidationError::NotAnOption {
                id: question.id,
                value: value.to_string(),
            }
            .into());
        }
        self.sheet.select(question.id, value);
        Ok(())
    }

    /// Pick option `option_index` of the current question.
    pub fn select_option(&mut self, option_index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let index = self.nav.current();
        let Some(question) = self.bank.get(index) else {
            return Err(ValidationError::QuestionIndexOutOfRange {
                index,
                len: self.bank.len(),
            }
            .into());
        };
        let value = question.options.get(option_index).cloned().ok_or(
            ValidationError::OptionIndexOutOfRange {
                id: question.id,
                index: option_index,
                len: question.options.len(),
            },
        )?;
        self.select_answer(index, &value)
    }

    pub fn go_next(&mut self) -> bool {
        self.phase == SessionPhase::InProgress && self.nav.go_next()
    }

    pub fn go_previous(&mut self) -> bool {
        self.phase == SessionPhase::InProgress && self.nav.go_previous()
    }

    /// Ask to finish the session.
    ///
    /// A user request with unanswered questions needs confirmation first; a
    /// timer request never does. Only the first submission is honoured, every
    /// later attempt gets `SubmissionConflict`.
    pub fn request_submit(&mut self, trigger: SubmitTrigger) -> Result<SubmitOutcome, SessionError> {
        if self.submitting {
            return Err(SessionError::SubmissionConflict);
        }
        match self.phase {
            SessionPhase::InProgress | SessionPhase::ConfirmPending { .. } => {}
            _ => return Err(SessionError::NotInProgress),
        }

        let unanswered = self.unanswered_count();
        if trigger == SubmitTrigger::User && unanswered > 0 {
            self.phase = SessionPhase::ConfirmPending { unanswered };
            tracing::debug!(unanswered, "submit needs confirmation");
            return Ok(SubmitOutcome::ConfirmationRequired {
                unanswered,
                total: self.bank.len(),
            });
        }

        if trigger == SubmitTrigger::Timer {
            tracing::info!(unanswered, "time is up, submitting");
        }
        Ok(SubmitOutcome::Scored(self.finish()))
    }

    /// Accept the pending confirmation and score the session.
    pub fn confirm_submit(&mut self) -> Result<ResultsRecord, SessionError> {
        if self.submitting {
            return Err(SessionError::SubmissionConflict);
        }
        match self.phase {
            SessionPhase::ConfirmPending { .. } => Ok(self.finish()),
            _ => Err(SessionError::NotInProgress),
        }
    }

    /// Dismiss the confirmation and keep answering.
    pub fn cancel_submit(&mut self) {
        if let SessionPhase::ConfirmPending { .. } = self.phase {
            self.phase = SessionPhase::InProgress;
        }
    }

    /// One-second tick. Returns the results when the clock forces submission.
    pub fn on_tick(&mut self) -> Option<ResultsRecord> {
        let tick = self.timer.tick();
        self.on_timer(tick)
    }

    /// Catch the clock up to `now`. Returns the results when the clock forces submission.
    pub fn advance(&mut self, now: Instant) -> Option<ResultsRecord> {
        let tick = self.timer.advance(now);
        self.on_timer(tick)
    }

    fn on_timer(&mut self, tick: TimerTick) -> Option<ResultsRecord> {
        if tick != TimerTick::Expired {
            return None;
        }
        match self.request_submit(SubmitTrigger::Timer) {
            Ok(SubmitOutcome::Scored(record)) => Some(record),
            Ok(SubmitOutcome::ConfirmationRequired { .. }) => None,
            Err(err) => {
                tracing::debug!(%err, "forced submit ignored");
                None
            }
        }
    }

    /// Leave without submitting.
    pub fn abandon(&mut self) {
        self.timer.stop();
        self.submitting = true;
        self.phase = SessionPhase::Abandoned;
        tracing::info!(
            answered = self.sheet.answered_count(),
            "quiz session abandoned"
        );
    }

    fn finish(&mut self) -> ResultsRecord {
        self.submitting = true;
        self.timer.stop();
        self.phase = SessionPhase::Submitted;

        let sheet = std::mem::take(&mut self.sheet);
        let record = scorer::score(&self.bank, &sheet).with_completed_at(Local::now());

        self.phase = SessionPhase::Scored;
        tracing::info!(
            score = record.score,
            total = record.total_questions,
            "quiz session scored"
        );
        record
    }
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        if self.timer.is_running() {
            tracing::debug!("session dropped while its timer was running");
            self.timer.stop();
        }
    }
}
