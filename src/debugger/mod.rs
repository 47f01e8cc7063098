mod breakpoints;
mod context;
mod error;
mod queue;
mod scope;
mod session;
mod stepping;

pub use breakpoints::HostScheduler;
pub use context::{ExecutionContext, RunOutcome, VariableBinding, VariableError};
pub use error::{ContextError, DebugError, Result};
pub use queue::{DeferredExecutionQueue, PendingContext};
pub use scope::{CommandExecutor, DebugScope, ScopeManager, SharedScopes};
pub use session::{DebugSession, DebuggerState, DrainSummary, StepOutcome};
pub use stepping::StepBudget;
