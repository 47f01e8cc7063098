use super::breakpoints::HostScheduler;
use super::context::{ExecutionContext, RunOutcome, VariableBinding, VariableError};
use super::error::{DebugError, Result};
use super::queue::DeferredExecutionQueue;
use super::scope::{CommandExecutor, DebugScope, ScopeManager, SharedScopes};
use super::stepping::StepBudget;
use serde_json::Value;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Session-scoped debugger flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggerState {
    pub(super) is_debugging: bool,
    /// Set for the duration of a `step` or `continue` call. Every operation
    /// takes `&mut self`, so callers cannot re-enter one while it is set; the
    /// flag is exposed for hosts that inspect the session between calls.
    pub(super) is_debug_command: bool,
    pub(super) debug_mode: bool,
    pub(super) budget: StepBudget,
}

impl Default for DebuggerState {
    fn default() -> Self {
        Self {
            is_debugging: false,
            is_debug_command: false,
            debug_mode: true,
            budget: StepBudget::default(),
        }
    }
}

impl DebuggerState {
    pub fn is_debugging(&self) -> bool {
        self.is_debugging
    }

    /// True only while a step or continue call is in flight.
    pub fn is_debug_command(&self) -> bool {
        self.is_debug_command
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn move_steps(&self) -> u32 {
        self.budget.remaining()
    }

    pub fn is_step_over(&self) -> bool {
        self.budget.is_step_over()
    }

    pub fn step_over_depth(&self) -> Option<usize> {
        self.budget.step_over_depth()
    }
}

/// How a `step` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Budget spent; `queued` contexts are still waiting.
    Paused { queued: usize },
    /// The queue ran dry before the budget did, so execution was continued.
    RanOffEnd(DrainSummary),
}

/// Result of draining the queue on `continue`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub completed: usize,
    pub failed: usize,
    /// A context reached another breakpoint; it stays at the head of the queue.
    pub paused: bool,
}

/// One debugging session: flags, suspended work and the call stack.
pub struct DebugSession<H: HostScheduler> {
    pub(super) state: DebuggerState,
    pub(super) queue: DeferredExecutionQueue,
    pub(super) scopes: SharedScopes,
    pub(super) host: H,
}

impl<H: HostScheduler> DebugSession<H> {
    pub fn new(host: H) -> Self {
        Self::with_scopes(host, ScopeManager::shared())
    }

    pub fn with_scopes(host: H, scopes: SharedScopes) -> Self {
        Self {
            state: DebuggerState::default(),
            queue: DeferredExecutionQueue::new(),
            scopes,
            host,
        }
    }

    pub fn state(&self) -> &DebuggerState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scopes(&self) -> SharedScopes {
        Rc::clone(&self.scopes)
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn enqueue_context(&mut self, context: Box<dyn ExecutionContext>) {
        debug!(context = %context.describe(), queued = self.queue.len() + 1, "context suspended");
        self.queue.push(context);
    }

    pub fn push_scope(&mut self, function: &str, executor: Rc<dyn CommandExecutor>) {
        self.scopes.borrow_mut().push(function, executor);
    }

    pub fn pop_scope(&mut self) -> Option<DebugScope> {
        self.scopes.borrow_mut().pop()
    }

    /// Call stack snapshot, innermost frame first.
    pub fn stack(&self) -> Vec<DebugScope> {
        self.scopes.borrow().all_scopes()
    }

    pub fn current_scope(&self) -> Option<DebugScope> {
        self.scopes.borrow().current_scope().cloned()
    }

    /// Run an ad-hoc command as the innermost frame.
    pub fn run_in_scope(&self, command: &str) -> Result<String> {
        let scope = self.current_scope().ok_or(DebugError::NoActiveScope)?;
        debug!(function = scope.function(), command, "running command in paused frame");
        scope
            .executor()
            .execute(command)
            .map_err(DebugError::Execution)
    }

    pub fn step(&mut self, steps: u32) -> Result<StepOutcome> {
        if !self.state.is_debugging {
            return Err(DebugError::NotDebugging);
        }
        self.state.is_debug_command = true;
        self.state.budget.set_steps(steps);
        info!(steps, step_over = self.state.budget.is_step_over(), "stepping");

        let outcome = self.drive_steps();

        self.state.is_debug_command = false;
        self.state.budget.set_steps(0);
        self.state.budget.disarm_step_over();
        outcome
    }

    /// Step, running through any call deeper than the current scope depth.
    pub fn step_over(&mut self, steps: u32) -> Result<StepOutcome> {
        if !self.state.is_debugging {
            return Err(DebugError::NotDebugging);
        }
        let depth = self.scopes.borrow().depth();
        self.state.budget.arm_step_over(depth);
        self.step(steps)
    }

    fn drive_steps(&mut self) -> Result<StepOutcome> {
        while !self.state.budget.is_exhausted() {
            let Some(head) = self.queue.head_mut() else {
                info!(
                    remaining = self.state.budget.remaining(),
                    "stepped past the buffered work, continuing"
                );
                return self.continue_exec().map(StepOutcome::RanOffEnd);
            };

            let budget = &mut self.state.budget;
            let advanced = head
                .context_mut()
                .advance_one_step(budget)
                .and_then(|()| {
                    if budget.is_exhausted() {
                        head.context().has_pending_action().map(Some)
                    } else {
                        Ok(None)
                    }
                });

            match advanced {
                // Budget left over: the head ran out of work.
                Ok(None) => {
                    self.queue.release_head();
                }
                Ok(Some(true)) => break,
                Ok(Some(false)) => {
                    self.queue.release_head();
                    break;
                }
                Err(e) => {
                    error!(error = %e, "step failed, abandoning remaining steps");
                    self.queue.release_head();
                    return Err(DebugError::InternalStepFailure(e));
                }
            }
        }
        Ok(StepOutcome::Paused {
            queued: self.queue.len(),
        })
    }

    pub fn continue_exec(&mut self) -> Result<DrainSummary> {
        if !self.state.is_debugging {
            return Err(DebugError::NotDebugging);
        }
        let nested = self.state.is_debug_command;
        self.state.is_debug_command = true;
        self.host.set_frozen(false);
        self.host.resumed();
        self.state.is_debugging = false;
        self.state.budget.set_steps(0);

        let summary = self.drain();

        if !nested {
            self.state.is_debug_command = false;
        }
        info!(
            completed = summary.completed,
            failed = summary.failed,
            paused = summary.paused,
            "execution continued"
        );
        Ok(summary)
    }

    /// Run queued contexts front to back until the queue is empty or one of
    /// them stops at a breakpoint that re-arms the session.
    fn drain(&mut self) -> DrainSummary {
        let mut summary = DrainSummary::default();
        while let Some(head) = self.queue.head_mut() {
            let outcome = head.context_mut().run();
            match outcome {
                Ok(RunOutcome::Finished) => {
                    summary.completed += 1;
                    self.queue.release_head();
                }
                Ok(RunOutcome::Breakpoint { source }) => {
                    if self.trigger(&source) {
                        summary.paused = true;
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "deferred context failed");
                    summary.failed += 1;
                    self.queue.release_head();
                }
            }
        }
        summary
    }

    /// Hard reset. Pending contexts are released without being run.
    pub fn clear(&mut self) {
        self.state.is_debug_command = false;
        self.state.is_debugging = false;
        self.state.debug_mode = true;
        self.state.budget.reset();
        let discarded = self.queue.discard_all();
        self.host.set_frozen(false);
        info!(discarded, "debugger cleared");
    }

    pub fn lookup_variable(&self, key: &str) -> Result<VariableBinding> {
        let head = self.queue.head().ok_or(DebugError::NoActiveContext)?;
        match head.context().lookup_variable(key) {
            Ok(binding) if binding.is_macro => Ok(binding),
            Ok(_) | Err(VariableError::NotApplicable) => Err(DebugError::NotMacroContext),
            Err(VariableError::NotFound) => Err(DebugError::VariableNotFound(key.to_string())),
        }
    }

    pub fn dump_variables(&self) -> Result<Value> {
        let head = self.queue.head().ok_or(DebugError::NoActiveContext)?;
        head.context()
            .dump_variables()
            .ok_or(DebugError::NotMacroContext)
    }
}
