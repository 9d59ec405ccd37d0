//! Fixed quiz constants.

/// Seconds allowed per question before it is auto-submitted.
pub const QUESTION_TIME_SECS: u32 = 60;

/// Minimum percentage (inclusive) for a passing result.
pub const PASS_THRESHOLD_PERCENT: u32 = 50;

/// Key under which the in-progress session checkpoint is stored.
pub const CHECKPOINT_KEY: &str = "candidate_quiz_state_v1";

/// Largest accepted resume upload, in bytes (2 MiB).
pub const RESUME_MAX_BYTES: u64 = 2 * 1024 * 1024;
