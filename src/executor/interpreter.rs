use super::script_context::ScriptContext;
use crate::debugger::{
    CommandExecutor, ContextError, DebugSession, ExecutionContext, HostScheduler, RunOutcome,
    SharedScopes,
};
use crate::parser::FunctionLibrary;
use serde_json::{Map, Value};
use std::rc::Rc;
use tracing::{debug, info};

/// What happened to one function invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Completed,
    /// Hit a breakpoint; the remainder is queued in the session.
    Suspended,
    /// The session was already paused, so the whole invocation was queued.
    Deferred,
}

/// Host interpreter: runs script functions and hands suspended work to the debugger.
pub struct Interpreter {
    library: Rc<FunctionLibrary>,
    scopes: SharedScopes,
    executor: Rc<dyn CommandExecutor>,
}

impl Interpreter {
    pub fn new(
        library: FunctionLibrary,
        scopes: SharedScopes,
        executor: Rc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            library: Rc::new(library),
            scopes,
            executor,
        }
    }

    pub fn library(&self) -> &FunctionLibrary {
        &self.library
    }

    pub fn invoke<H: HostScheduler>(
        &self,
        session: &mut DebugSession<H>,
        function: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<Invocation, ContextError> {
        let mut context = ScriptContext::invocation(
            function,
            arguments,
            Rc::clone(&self.library),
            Rc::clone(&self.scopes),
            Rc::clone(&self.executor),
        )?;

        if session.state().is_debugging() {
            debug!(function, "session paused, deferring invocation");
            session.enqueue_context(Box::new(context));
            return Ok(Invocation::Deferred);
        }

        loop {
            match context.run() {
                Ok(RunOutcome::Finished) => {
                    context.release();
                    return Ok(Invocation::Completed);
                }
                Ok(RunOutcome::Breakpoint { source }) => {
                    if session.trigger(&source) {
                        info!(function = %source, "suspended at breakpoint");
                        session.enqueue_context(Box::new(context));
                        return Ok(Invocation::Suspended);
                    }
                }
                Err(e) => {
                    context.release();
                    return Err(e);
                }
            }
        }
    }
}
