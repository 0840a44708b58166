//! The UI state machine as a pure function over an explicit state value.

use std::time::Duration;

use clap::ValueEnum;

use crate::executor::Strategy;
use crate::validate::validate_input;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Processing,
    Downloading,
    Ready { filename: String },
    Error { message: String },
}

impl UiState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Click, Enter, or a pasted URL.
    Trigger { input: String },
    /// The API returned a usable link.
    Resolved,
    /// The executor finished with the given file.
    Finished { filename: String },
    Failed { message: String },
    /// A display delay ran out.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Input never left the machine; show this and stay idle.
    Reject(String),
    Submit(String),
    Execute,
    ResetAfter(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub state: UiState,
    pub effect: Effect,
}

impl Step {
    fn stay(state: &UiState) -> Self {
        Self {
            state: state.clone(),
            effect: Effect::None,
        }
    }
}

/// How long terminal displays stay up before returning to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub error: Duration,
    pub ready: Duration,
}

impl Timing {
    pub const IMMEDIATE: Timing = Timing {
        error: Duration::ZERO,
        ready: Duration::ZERO,
    };
}

/// Presentation profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Flavor {
    /// Error shown inline for 3s; link handed off after a HEAD check.
    #[default]
    Inline,
    /// Status line held for 5s; file streamed to disk with progress.
    StatusLine,
}

impl Flavor {
    pub fn timing(&self) -> Timing {
        match self {
            Self::Inline => Timing {
                error: Duration::from_secs(3),
                ready: Duration::ZERO,
            },
            Self::StatusLine => Timing {
                error: Duration::from_secs(5),
                ready: Duration::from_secs(5),
            },
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            Self::Inline => Strategy::Redirect,
            Self::StatusLine => Strategy::Stream,
        }
    }
}

pub fn transition(state: &UiState, event: Event, timing: &Timing) -> Step {
    match (state, event) {
        (UiState::Idle, Event::Trigger { input }) => match validate_input(&input) {
            Ok(url) => Step {
                state: UiState::Processing,
                effect: Effect::Submit(url.to_string()),
            },
            Err(e) => Step {
                state: UiState::Idle,
                effect: Effect::Reject(e.to_string()),
            },
        },
        (UiState::Processing, Event::Resolved) => Step {
            state: UiState::Downloading,
            effect: Effect::Execute,
        },
        (UiState::Processing | UiState::Downloading, Event::Failed { message }) => Step {
            state: UiState::Error { message },
            effect: Effect::ResetAfter(timing.error),
        },
        (UiState::Downloading, Event::Finished { filename }) => Step {
            state: UiState::Ready { filename },
            effect: Effect::ResetAfter(timing.ready),
        },
        (UiState::Ready { .. } | UiState::Error { .. }, Event::Expired) => Step {
            state: UiState::Idle,
            effect: Effect::None,
        },
        (state, _) => Step::stay(state),
    }
}
