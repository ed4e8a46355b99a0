use thiserror::Error;

use crate::StackError;

/// Errors that stop [`run`](super::run) before it reaches a status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("stack update failed")]
    Stack(#[from] StackError),
}
