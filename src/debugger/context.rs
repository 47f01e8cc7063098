use super::error::ContextError;
use super::stepping::StepBudget;
use serde_json::Value;

/// A bound variable as seen by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBinding {
    pub value: Value,
    /// True when the binding is a macro-style input of the running function.
    pub is_macro: bool,
}

/// Why a variable lookup produced nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableError {
    NotFound,
    /// The context has no structured variables at all.
    NotApplicable,
}

/// How a `run` call stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    /// Reached a breakpoint in `source`; everything after it is still pending.
    Breakpoint { source: String },
}

/// One suspended, resumable unit of execution.
///
/// Implemented once per kind of deferred work. The debugger never looks at
/// what the work is.
pub trait ExecutionContext {
    /// Short description used in logs.
    fn describe(&self) -> String {
        String::from("<context>")
    }

    /// Advance until the budget runs out or no work remains.
    ///
    /// Every executed command spends one unit of `budget`, except commands the
    /// budget says to run through (step-over of deeper calls).
    fn advance_one_step(&mut self, budget: &mut StepBudget) -> Result<(), ContextError>;

    /// Whether trailing work remains after the current step boundary.
    fn has_pending_action(&self) -> Result<bool, ContextError>;

    fn lookup_variable(&self, _key: &str) -> Result<VariableBinding, VariableError> {
        Err(VariableError::NotApplicable)
    }

    fn dump_variables(&self) -> Option<Value> {
        None
    }

    /// Execute remaining work, ignoring step boundaries, up to the next breakpoint.
    ///
    /// Calling `run` again after a breakpoint resumes right after it.
    fn run(&mut self) -> Result<RunOutcome, ContextError>;

    /// Free anything the context still holds.
    fn release(&mut self);
}
