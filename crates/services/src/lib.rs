#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_loader;
pub mod error;
pub mod quiz_loop;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use bank_loader::{BankLoader, BankOrigin, BankSource, LoadedBank};
pub use error::{AppServicesError, BankLoadError};
pub use quiz_loop::{Persist, QuizCommand, QuizLoopService, QuizRun};
