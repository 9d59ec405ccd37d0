use thiserror::Error;

use crate::bank::BankError;
use crate::checkpoint::CheckpointError;
use crate::model::QuestionError;
use crate::resume::ResumeError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error(transparent)]
    Resume(#[from] ResumeError),
}
