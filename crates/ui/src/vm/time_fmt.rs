use quiz_core::session::SessionMode;
use quiz_core::timer::{QuestionClock, SessionClock};

/// Header clock, hidden outside a running or finished session.
#[must_use]
pub fn session_timer_label(clock: &SessionClock) -> Option<String> {
    clock.is_visible().then(|| clock.format())
}

/// Countdown label for the question clock.
#[must_use]
pub fn question_timer_label(clock: &QuestionClock, mode: SessionMode) -> Option<String> {
    match mode {
        SessionMode::Finished => Some("Finished ✅".to_string()),
        SessionMode::Active if clock.is_visible() => Some(clock.label()),
        _ => None,
    }
}

#[must_use]
pub fn results_time_label(clock: &SessionClock) -> String {
    format!("Time: {}", clock.format())
}
