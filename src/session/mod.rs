use std::collections::HashMap;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::bank::{BankHandle, OptionLabel, QuestionBank, QuestionRecord};
use crate::gate::{GateState, GateWindow};
use crate::ingest::{CsvIngestor, Fetcher, IngestError};
use crate::output::{Notice, SessionOutput};
use crate::sink::{ResultPayload, ResultSink};

mod countdown;
pub mod scoring;
mod settings;

pub use countdown::{Countdown, CountdownTick};
pub use settings::{Candidate, Features, SessionConfig};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionStatus {
    NotStarted,
    Active,
    Submitted,
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error("no questions are loaded")]
    NoQuestions,
    #[error("the quiz is not open yet")]
    NotOpenYet,
    #[error("the quiz has closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no active session")]
    NotActive,
    #[error("the session was already submitted")]
    AlreadySubmitted,
}

/// State of one attempt, created by `start_session` and replaced wholesale on
/// restart. The sampled questions are fixed for the attempt's duration; a
/// bank reload does not touch them.
struct SessionState {
    config: SessionConfig,
    selected: Vec<QuestionRecord>,
    current_index: usize,
    answers: HashMap<String, OptionLabel>,
    countdown: Countdown,
    status: SessionStatus,
}

/// Owns the active attempt and exposes the operations the presentation layer
/// wires its buttons to. The once-per-second `tick` is driven externally.
pub struct SessionController<O, S> {
    bank: BankHandle,
    features: Features,
    gate: GateWindow,
    state: Option<SessionState>,
    output: O,
    sink: S,
}

impl<O: SessionOutput, S: ResultSink> SessionController<O, S> {
    pub fn new(bank: BankHandle, features: Features, output: O, sink: S) -> Self {
        SessionController {
            bank,
            features,
            gate: GateWindow::default(),
            state: None,
            output,
            sink,
        }
    }

    /// Gate bounds consulted at session start, typically read from the config
    /// store by the embedding layer.
    pub fn set_gate_window(&mut self, gate: GateWindow) {
        self.gate = gate;
    }

    pub fn status(&self) -> SessionStatus {
        match &self.state {
            None => SessionStatus::NotStarted,
            Some(state) => state.status,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.state.as_ref().map(|state| state.current_index)
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.state
            .as_ref()
            .map(|state| &state.selected[state.current_index])
    }

    pub fn selected_questions(&self) -> &[QuestionRecord] {
        self.state
            .as_ref()
            .map(|state| state.selected.as_slice())
            .unwrap_or(&[])
    }

    pub fn remaining_seconds(&self) -> Option<u64> {
        self.state.as_ref().map(|state| state.countdown.remaining())
    }

    /// Replaces the bank from a CSV source. A failed load degrades to the
    /// built-in bank when the fallback switch is on, and to an explicit
    /// "no questions" notice otherwise; it never takes the widget down.
    pub fn load_questions<F: Fetcher>(
        &mut self,
        ingestor: &CsvIngestor<F>,
        locator: &str,
    ) -> Result<usize, IngestError> {
        match ingestor.load(locator) {
            Ok(bank) => {
                let count = bank.len();
                debug!("loaded {} questions from {}", count, locator);
                *self.bank.write() = bank;
                Ok(count)
            }
            Err(error) if self.features.csv_fallback_on_error => {
                warn!("falling back to built-in questions: {}", error);
                let bank = QuestionBank::demo();
                let count = bank.len();
                *self.bank.write() = bank;
                self.output.notify(Notice::FallbackBankLoaded(count));
                Ok(count)
            }
            Err(error) => {
                *self.bank.write() = QuestionBank::default();
                self.output.notify(Notice::QuestionsUnavailable);
                Err(error)
            }
        }
    }

    /// Draws the sample and arms the countdown. On any error nothing is
    /// mutated: a prior session, if one exists, keeps running.
    pub fn start_session(
        &mut self,
        config: SessionConfig,
        now: DateTime<Utc>,
    ) -> Result<(), StartError> {
        let sample = {
            let bank = self.bank.read();
            if bank.is_empty() {
                return Err(StartError::NoQuestions);
            }
            if self.features.enable_gate_window {
                match self.gate.state_at(now) {
                    GateState::BeforeOpen => return Err(StartError::NotOpenYet),
                    GateState::AfterClose => return Err(StartError::Closed),
                    GateState::Open => (),
                }
            }
            draw_sample(&bank, config.requested_count, &mut rand::thread_rng())
        };

        // Stop the old countdown before its replacement exists; a stale tick
        // must not fire a submission for a discarded attempt.
        if let Some(previous) = self.state.as_mut() {
            previous.countdown.cancel();
            debug!("discarding previous session");
        }

        let countdown = Countdown::new(config.time_limit_seconds());
        let initial_remaining = countdown.remaining();
        self.state = Some(SessionState {
            selected: sample,
            current_index: 0,
            answers: HashMap::new(),
            countdown,
            status: SessionStatus::Active,
            config,
        });

        self.notify_current_question();
        self.output.notify(Notice::TimeRemaining(initial_remaining));
        Ok(())
    }

    /// Records the choice for the question currently shown. Re-selecting
    /// overwrites the previous choice.
    pub fn select_answer(&mut self, label: OptionLabel) -> Result<(), SessionError> {
        let state = self.state.as_mut().ok_or(SessionError::NotActive)?;
        if state.status != SessionStatus::Active {
            return Err(SessionError::NotActive);
        }
        let id = state.selected[state.current_index].id.clone();
        state.answers.insert(id, label);
        Ok(())
    }

    pub fn go_to_previous(&mut self) {
        self.navigate(-1);
    }

    pub fn go_to_next(&mut self) {
        self.navigate(1);
    }

    fn navigate(&mut self, delta: isize) {
        let moved = match self.state.as_mut() {
            Some(state) if state.status == SessionStatus::Active => {
                let last = state.selected.len() - 1;
                let target = state.current_index.saturating_add_signed(delta).min(last);
                if target == state.current_index {
                    false
                } else {
                    state.current_index = target;
                    true
                }
            }
            _ => false,
        };
        if moved {
            self.notify_current_question();
        }
    }

    /// Advances the countdown by one second. Exhaustion triggers exactly one
    /// automatic submission; ticks arriving after submission or after a
    /// restart's cancellation are no-ops.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let outcome = match self.state.as_mut() {
            Some(state) if state.status == SessionStatus::Active => state.countdown.tick(),
            _ => return,
        };
        match outcome {
            CountdownTick::Running(remaining) => {
                self.output.notify(Notice::TimeRemaining(remaining));
            }
            CountdownTick::Expired => {
                debug!("time limit reached, submitting automatically");
                self.output.notify(Notice::TimeRemaining(0));
                if let Err(error) = self.finish(now) {
                    warn!("automatic submission failed: {}", error);
                }
            }
            CountdownTick::Cancelled => (),
        }
    }

    /// Explicit submission. Valid once per session; a second call reports
    /// `AlreadySubmitted` rather than rescoring.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<ResultPayload, SessionError> {
        self.finish(now)
    }

    fn finish(&mut self, now: DateTime<Utc>) -> Result<ResultPayload, SessionError> {
        let state = self.state.as_mut().ok_or(SessionError::NotActive)?;
        if state.status == SessionStatus::Submitted {
            return Err(SessionError::AlreadySubmitted);
        }

        // Cancelled before any other submission side effect, closing the
        // window where the timer and a manual submit could collide.
        state.countdown.cancel();

        let (tally, detail) = scoring::score(&state.selected, &state.answers);
        state.status = SessionStatus::Submitted;
        let payload = ResultPayload {
            timestamp: now,
            name: state.config.candidate.name.clone(),
            email: state.config.candidate.email.clone(),
            score: tally,
            total: state.selected.len(),
            answers: detail,
        };

        self.output.notify(Notice::ScoreReport {
            score: payload.score,
            total: payload.total,
        });
        if let Err(error) = self.sink.deliver(&payload) {
            warn!("could not deliver result payload: {}", error);
            self.output.notify(Notice::ResultDeliveryFailed);
        }
        Ok(payload)
    }

    fn notify_current_question(&mut self) {
        if let Some(state) = &self.state {
            let notice = Notice::QuestionShown {
                index: state.current_index,
                total: state.selected.len(),
                question: state.selected[state.current_index].clone(),
            };
            self.output.notify(notice);
        }
    }
}

/// Uniform sample without replacement: shuffle a working copy, keep the head.
/// The bank itself is never reordered.
fn draw_sample<R: Rng>(bank: &QuestionBank, requested: usize, rng: &mut R) -> Vec<QuestionRecord> {
    let mut working: Vec<QuestionRecord> = bank.questions().to_vec();
    working.shuffle(rng);
    working.truncate(requested.max(1).min(working.len()));
    working
}
