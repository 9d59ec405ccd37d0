use std::sync::Arc;

use services::{BankOrigin, QuizLoopService};

/// What the composition root hands to the UI.
pub trait UiApp: Send + Sync {
    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn bank_origin(&self) -> BankOrigin;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_loop: Arc<QuizLoopService>,
    bank_origin: BankOrigin,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_loop: app.quiz_loop(),
            bank_origin: app.bank_origin(),
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    /// True when the configured question source could not be used.
    #[must_use]
    pub fn using_fallback_bank(&self) -> bool {
        self.bank_origin == BankOrigin::Fallback
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
