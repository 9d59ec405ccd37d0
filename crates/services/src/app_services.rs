use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::bank_loader::{BankLoader, BankOrigin, BankSource};
use crate::error::AppServicesError;
use crate::quiz_loop::QuizLoopService;

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    quiz_loop: Arc<QuizLoopService>,
    bank_origin: BankOrigin,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// The question source is loaded here; if it is unusable the built-in
    /// bank is used instead and startup continues.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        source: BankSource,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(storage, source, clock).await)
    }

    /// Build services on top of an already opened `Storage`.
    pub async fn from_storage(storage: Storage, source: BankSource, clock: Clock) -> Self {
        let loaded = BankLoader::new(source).load().await;
        let quiz_loop = Arc::new(QuizLoopService::new(
            clock,
            Arc::new(loaded.bank),
            Arc::clone(&storage.checkpoints),
        ));
        Self {
            quiz_loop,
            bank_origin: loaded.origin,
        }
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn bank_origin(&self) -> BankOrigin {
        self.bank_origin
    }
}
