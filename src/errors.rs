use thiserror::Error;

/// Error depicting errors that stop a run before it has started
///
#[derive(Debug, Error)]
#[error("error while running weather snapshot: {0}")]
pub struct RunError(pub String);
