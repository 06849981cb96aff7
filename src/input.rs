//! Deadline-driven input handling.
//!
//! Nothing here owns a timer. Every transition takes the caller's `now`, and
//! due work is picked up by polling, so the behavior is the same under an
//! event loop, a terminal prompt, or a test that moves time by hand.
//!
//! - [`NumericField`]: a clamped integer text field that commits typed
//!   input after a quiet period, on blur, or on a ±1 step.
//! - [`Debouncer`]: one re-armable deadline, used to coalesce redraws.

use std::time::{Duration, Instant};

/// Typing pause before a numeric field commits.
pub const INPUT_COMMIT_DELAY: Duration = Duration::from_millis(600);
/// Quiet period before a requested redraw runs.
pub const REDRAW_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldState {
    Committed,
    /// Text is being typed. `pending` is `None` while the text is empty,
    /// and an empty field has no deadline.
    Editing {
        text: String,
        pending: Option<i64>,
        deadline: Option<Instant>,
    },
}

/// Integer input clamped to `[min, max]` with delayed commit.
#[derive(Debug, Clone)]
pub struct NumericField {
    committed: i64,
    min: i64,
    max: i64,
    delay: Duration,
    state: FieldState,
}

impl NumericField {
    pub fn new(value: i64, min: i64, max: i64) -> Self {
        Self::with_delay(value, min, max, INPUT_COMMIT_DELAY)
    }

    pub fn with_delay(value: i64, min: i64, max: i64, delay: Duration) -> Self {
        Self {
            committed: value.clamp(min, max),
            min,
            max,
            delay,
            state: FieldState::Committed,
        }
    }

    /// Last committed value.
    pub fn value(&self) -> i64 {
        self.committed
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, FieldState::Editing { .. })
    }

    /// Text to show in the field.
    pub fn display(&self) -> String {
        match &self.state {
            FieldState::Committed => self.committed.to_string(),
            FieldState::Editing { text, .. } => text.clone(),
        }
    }

    /// Apply a keystroke's worth of new text.
    ///
    /// Numeric text (re)arms the commit deadline. Empty text waits without a
    /// deadline. Anything else is discarded and the field shows the last
    /// committed value again.
    pub fn input(&mut self, text: &str, now: Instant) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.state = FieldState::Editing {
                text: String::new(),
                pending: None,
                deadline: None,
            };
            return;
        }
        match trimmed.parse::<i64>() {
            Ok(v) => {
                self.state = FieldState::Editing {
                    text: trimmed.to_string(),
                    pending: Some(v),
                    deadline: Some(now + self.delay),
                }
            }
            Err(_) => self.state = FieldState::Committed,
        }
    }

    /// Commit a pending value whose deadline has passed.
    ///
    /// Returns the committed value when a commit happened.
    pub fn poll(&mut self, now: Instant) -> Option<i64> {
        match self.state {
            FieldState::Editing {
                pending: Some(v),
                deadline: Some(deadline),
                ..
            } if now >= deadline => Some(self.commit(v)),
            _ => None,
        }
    }

    /// Focus left the field: commit now, or fall back to the last valid value.
    pub fn blur(&mut self) -> Option<i64> {
        match std::mem::replace(&mut self.state, FieldState::Committed) {
            FieldState::Editing {
                pending: Some(v), ..
            } => Some(self.commit(v)),
            _ => None,
        }
    }

    /// Increment or decrement the committed value, discarding any pending text.
    pub fn step(&mut self, delta: i64) -> i64 {
        let next = self.committed.saturating_add(delta);
        self.commit(next)
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            FieldState::Editing { deadline, .. } => deadline,
            FieldState::Committed => None,
        }
    }

    fn commit(&mut self, value: i64) -> i64 {
        self.committed = value.clamp(self.min, self.max);
        self.state = FieldState::Committed;
        self.committed
    }
}

/// A single deadline; scheduling again pushes it back.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(REDRAW_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// `true` once when the deadline has passed; the deadline is cleared.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
