use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::bank::QuestionBank;
use quiz_core::checkpoint::{Checkpoint, Restored};
use quiz_core::config::CHECKPOINT_KEY;
use quiz_core::model::{TOPICS, Topic, TopicId};
use quiz_core::session::{Advance, QuizSession, SessionMode};
use quiz_core::timer::{Expiry, QuestionClock, SessionClock};
use storage::repository::CheckpointRepository;

use crate::Clock;

/// Session plus the two clocks that run alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizRun {
    pub session: QuizSession,
    pub session_clock: SessionClock,
    pub question_clock: QuestionClock,
}

impl QuizRun {
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> SessionMode {
        self.session.mode()
    }

    fn reset_question_clock(&mut self) {
        self.question_clock.reset();
    }

    fn stop_clocks(&mut self) {
        self.session_clock.stop();
        self.question_clock.stop();
    }

    fn disable_clocks(&mut self) {
        self.session_clock.disable();
        self.question_clock.disable();
    }
}

/// User intents and timer events the quiz loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    ToggleTopic(TopicId),
    Start,
    Choose(usize),
    Next,
    Back,
    Clear,
    Finish,
    Review,
    Restart,
    /// One second passed.
    Tick,
    /// A question countdown ran out.
    Expire(Expiry),
}

/// Checkpoint side effect of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persist {
    Nothing,
    Save(Checkpoint),
    Clear,
}

/// Drives a [`QuizRun`] and keeps its checkpoint in step.
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<QuestionBank>,
    checkpoints: Arc<dyn CheckpointRepository>,
    rng: Mutex<StdRng>,
    write_order: tokio::sync::Mutex<()>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        checkpoints: Arc<dyn CheckpointRepository>,
    ) -> Self {
        Self {
            clock,
            bank,
            checkpoints,
            rng: Mutex::new(StdRng::from_os_rng()),
            write_order: tokio::sync::Mutex::new(()),
        }
    }

    /// Makes shuffling reproducible.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    /// Topics offered for selection, with whether the bank has questions for each.
    #[must_use]
    pub fn topics_available(&self) -> Vec<(&'static Topic, bool)> {
        TOPICS
            .iter()
            .map(|topic| (topic, !self.bank.questions(&topic.topic_id()).is_empty()))
            .collect()
    }

    /// Applies `command` to `run` and reports what should happen to the
    /// stored checkpoint. Commands that do not apply in the current mode
    /// change nothing and return `Persist::Nothing`.
    pub fn dispatch(&self, run: &mut QuizRun, command: QuizCommand) -> Persist {
        match command {
            QuizCommand::ToggleTopic(id) => {
                if run.session.toggle_topic(id) {
                    self.save(run)
                } else {
                    Persist::Nothing
                }
            }
            QuizCommand::Start => {
                let started = {
                    let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                    run.session.start(&self.bank, &mut *rng)
                };
                if !started {
                    return Persist::Nothing;
                }
                run.session_clock.start();
                run.reset_question_clock();
                self.save(run)
            }
            QuizCommand::Choose(index) => {
                if run.session.record_answer(Some(index)) {
                    self.save(run)
                } else {
                    Persist::Nothing
                }
            }
            QuizCommand::Clear => {
                if !run.session.clear_current() {
                    return Persist::Nothing;
                }
                run.reset_question_clock();
                self.save(run)
            }
            QuizCommand::Next => match run.mode() {
                SessionMode::Active => self.advance(run),
                SessionMode::Reviewing => {
                    if !run.session.review_next() {
                        run.session.leave_review();
                    }
                    Persist::Nothing
                }
                SessionMode::Idle | SessionMode::Finished => Persist::Nothing,
            },
            QuizCommand::Back => {
                if !run.session.retreat() {
                    return Persist::Nothing;
                }
                if run.mode() == SessionMode::Reviewing {
                    return Persist::Nothing;
                }
                run.reset_question_clock();
                self.save(run)
            }
            QuizCommand::Finish => {
                if !run.session.finish() {
                    return Persist::Nothing;
                }
                run.stop_clocks();
                Persist::Clear
            }
            QuizCommand::Review => {
                if run.session.enter_review() {
                    run.disable_clocks();
                }
                Persist::Nothing
            }
            QuizCommand::Restart => {
                run.session.reset();
                run.disable_clocks();
                Persist::Clear
            }
            QuizCommand::Tick => {
                run.session_clock.tick();
                match run.question_clock.tick() {
                    Some(expiry) => self.dispatch(run, QuizCommand::Expire(expiry)),
                    None => Persist::Nothing,
                }
            }
            QuizCommand::Expire(expiry) => {
                if !run.question_clock.is_current(expiry) || run.mode() != SessionMode::Active {
                    return Persist::Nothing;
                }
                log::debug!("question {} timed out", run.session.position() + 1);
                self.advance(run)
            }
        }
    }

    /// The current answer is already recorded, so moving on is all a submit does.
    fn advance(&self, run: &mut QuizRun) -> Persist {
        match run.session.advance() {
            Advance::Moved => {
                run.reset_question_clock();
                self.save(run)
            }
            Advance::Finished => {
                run.stop_clocks();
                Persist::Clear
            }
            Advance::Ignored => Persist::Nothing,
        }
    }

    fn save(&self, run: &QuizRun) -> Persist {
        Persist::Save(Checkpoint::capture(&run.session, &self.clock))
    }

    /// Carries out a checkpoint side effect. Storage failures are logged and
    /// otherwise ignored; the quiz keeps running without persistence.
    ///
    /// Concurrent calls are applied in the order they started.
    pub async fn persist(&self, persist: Persist) {
        let _order = self.write_order.lock().await;
        match persist {
            Persist::Nothing => {}
            Persist::Save(checkpoint) => {
                let payload = match checkpoint.to_json() {
                    Ok(payload) => payload,
                    Err(err) => {
                        log::warn!("failed to encode checkpoint: {err}");
                        return;
                    }
                };
                if let Err(err) = self
                    .checkpoints
                    .save_checkpoint(CHECKPOINT_KEY, &payload)
                    .await
                {
                    log::warn!("failed to save checkpoint: {err}");
                }
            }
            Persist::Clear => {
                if let Err(err) = self.checkpoints.clear_checkpoint(CHECKPOINT_KEY).await {
                    log::warn!("failed to clear checkpoint: {err}");
                }
            }
        }
    }

    /// Rebuilds a run from the stored checkpoint.
    ///
    /// A stored session comes back active with fresh clocks; a stored topic
    /// choice comes back idle. Anything missing or unusable yields `None`.
    pub async fn restore(&self) -> Option<QuizRun> {
        let raw = match self.checkpoints.load_checkpoint(CHECKPOINT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("failed to read checkpoint: {err}");
                return None;
            }
        };

        let restored = match Checkpoint::from_json(&raw).and_then(Checkpoint::restore) {
            Ok(restored) => restored,
            Err(err) => {
                log::warn!("ignoring malformed checkpoint: {err}");
                return None;
            }
        };

        match restored {
            Restored::Session(session) => {
                log::info!(
                    "restored quiz at question {} of {}",
                    session.position() + 1,
                    session.len()
                );
                let mut run = QuizRun {
                    session,
                    ..QuizRun::default()
                };
                run.session_clock.start();
                run.reset_question_clock();
                Some(run)
            }
            Restored::Selection(selection) if !selection.is_empty() => Some(QuizRun {
                session: QuizSession::with_selection(selection),
                ..QuizRun::default()
            }),
            Restored::Selection(_) => None,
        }
    }
}
