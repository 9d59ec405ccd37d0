use quiz_core::resume::{AcceptedResume, ResumeError, ResumeFile, validate_resume};
use quiz_core::session::SessionMode;
use services::{Persist, QuizCommand, QuizLoopService, QuizRun};

/// Which top-level panel the quiz shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Question,
    Results,
}

/// State of the resume picker on the results screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ResumeUpload {
    #[default]
    Waiting,
    Rejected(ResumeError),
    Accepted(AcceptedResume),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizVm {
    run: QuizRun,
    resume: ResumeUpload,
}

impl QuizVm {
    #[must_use]
    pub fn new(run: QuizRun) -> Self {
        Self {
            run,
            resume: ResumeUpload::Waiting,
        }
    }

    #[must_use]
    pub fn run(&self) -> &QuizRun {
        &self.run
    }

    #[must_use]
    pub fn resume(&self) -> &ResumeUpload {
        &self.resume
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        match self.run.mode() {
            SessionMode::Idle => Screen::Landing,
            SessionMode::Active | SessionMode::Reviewing => Screen::Question,
            SessionMode::Finished => Screen::Results,
        }
    }

    #[must_use]
    pub fn can_start(&self) -> bool {
        self.run.mode() == SessionMode::Idle && !self.run.session.selected().is_empty()
    }

    /// Whether the ticker has anything to advance.
    #[must_use]
    pub fn clocks_running(&self) -> bool {
        self.run.session_clock.is_running() || self.run.question_clock.is_running()
    }

    /// Runs `command` through the quiz loop. Leaving the results screen for a
    /// new session forgets any resume choice.
    pub fn apply(&mut self, quiz_loop: &QuizLoopService, command: QuizCommand) -> Persist {
        let persist = quiz_loop.dispatch(&mut self.run, command);
        if matches!(self.run.mode(), SessionMode::Idle | SessionMode::Active) {
            self.resume = ResumeUpload::Waiting;
        }
        persist
    }

    /// Validates a picked resume. Only a passing, finished session accepts one,
    /// and an accepted resume is final.
    pub fn choose_resume(&mut self, file: &ResumeFile) {
        let passed = self
            .run
            .session
            .report()
            .is_some_and(|report| report.score.passed());
        if self.run.mode() != SessionMode::Finished || !passed {
            return;
        }
        if matches!(self.resume, ResumeUpload::Accepted(_)) {
            return;
        }
        self.resume = match validate_resume(file) {
            Ok(accepted) => {
                log::info!("resume accepted: {} ({} bytes)", accepted.name, accepted.size_bytes);
                ResumeUpload::Accepted(accepted)
            }
            Err(err) => ResumeUpload::Rejected(err),
        };
    }
}
