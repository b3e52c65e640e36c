use std::fmt;

/// Where an invocation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    NotStarted,
    Running { index: usize },
    Completed,
    Failed { index: usize },
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainState::NotStarted => write!(f, "not started"),
            ChainState::Running { index } => write!(f, "running step {index}"),
            ChainState::Completed => write!(f, "completed"),
            ChainState::Failed { index } => write!(f, "failed at step {index}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub invocation: u64,
    pub state: ChainState,
}

/// Notified of every state an invocation enters, starting with
/// [`ChainState::NotStarted`] as soon as the invocation is assigned its id.
#[cfg_attr(test, mockall::automock)]
pub trait ChainObserver {
    fn on_transition(&self, chain: &str, transition: Transition);
}

/// Logs transitions at `debug`, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ChainObserver for TracingObserver {
    fn on_transition(&self, chain: &str, transition: Transition) {
        let Transition { invocation, state } = transition;

        match state {
            ChainState::Failed { .. } => tracing::warn!(%chain, invocation, %state),
            _ => tracing::debug!(%chain, invocation, %state),
        }
    }
}
