use thiserror::Error;

/// Faults raised by an execution context.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContextError {
    #[error("command `{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("invalid macro arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },
    #[error("context already released")]
    Released,
}

/// Errors surfaced to the operator by debug session operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DebugError {
    #[error("not currently debugging")]
    NotDebugging,
    #[error("no suspended execution context")]
    NoActiveContext,
    #[error("the current context has no macro variables")]
    NotMacroContext,
    #[error("variable not found: {0}")]
    VariableNotFound(String),
    #[error("no active scope to run the command in")]
    NoActiveScope,
    #[error("step failed: {0}")]
    InternalStepFailure(ContextError),
    #[error("command failed: {0}")]
    Execution(ContextError),
    #[error("{0}")]
    Command(String),
}

pub type Result<T> = std::result::Result<T, DebugError>;
