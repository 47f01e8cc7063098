use crate::debugger::{
    CommandExecutor, ContextError, ExecutionContext, RunOutcome, SharedScopes, StepBudget,
    VariableBinding, VariableError,
};
use crate::parser::{expand_macro, parse_arguments, FunctionLibrary, ScriptLine};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::debug;

type Variables = Map<String, Value>;

enum Op {
    Enter {
        function: String,
        variables: Option<Variables>,
    },
    Line(ScriptLine),
    Leave,
}

/// Executor handle stored in a scope: expands `$` lines with the frame's
/// macro variables before delegating.
struct FrameExecutor {
    inner: Rc<dyn CommandExecutor>,
    variables: Option<Variables>,
}

impl CommandExecutor for FrameExecutor {
    fn execute(&self, command: &str) -> Result<String, ContextError> {
        let Some(template) = command.trim().strip_prefix('$') else {
            return self.inner.execute(command);
        };
        let variables = self.variables.as_ref().ok_or_else(|| ContextError::CommandFailed {
            command: command.to_string(),
            reason: "macro line outside a macro function".to_string(),
        })?;
        let expanded = expand_macro(template.trim(), variables).map_err(|reason| {
            ContextError::CommandFailed {
                command: command.to_string(),
                reason,
            }
        })?;
        self.inner.execute(&expanded)
    }
}

/// The remainder of one function invocation, resumable line by line.
///
/// Calls are expanded lazily when reached. Every frame the context enters is
/// pushed onto the shared scope stack and popped again on leave or release.
pub struct ScriptContext {
    label: String,
    ops: VecDeque<Op>,
    frames: Vec<Option<Variables>>,
    library: Rc<FunctionLibrary>,
    scopes: SharedScopes,
    executor: Rc<dyn CommandExecutor>,
    released: bool,
}

impl ScriptContext {
    pub fn invocation(
        function: &str,
        arguments: Option<Variables>,
        library: Rc<FunctionLibrary>,
        scopes: SharedScopes,
        executor: Rc<dyn CommandExecutor>,
    ) -> Result<Self, ContextError> {
        if !library.contains(function) {
            return Err(ContextError::UnknownFunction(function.to_string()));
        }
        let mut ops = VecDeque::new();
        ops.push_back(Op::Enter {
            function: function.to_lowercase(),
            variables: arguments,
        });
        Ok(Self {
            label: function.to_lowercase(),
            ops,
            frames: Vec::new(),
            library,
            scopes,
            executor,
            released: false,
        })
    }

    /// Name of the innermost function this context is executing.
    pub fn current_function(&self) -> String {
        if self.frames.is_empty() {
            return self.label.clone();
        }
        self.scopes
            .borrow()
            .current_scope()
            .map(|s| s.function().to_string())
            .unwrap_or_else(|| self.label.clone())
    }

    fn ensure_live(&self) -> Result<(), ContextError> {
        if self.released {
            return Err(ContextError::Released);
        }
        Ok(())
    }

    fn apply_structural(&mut self, op: Op) -> Result<(), ContextError> {
        match op {
            Op::Enter {
                function,
                variables,
            } => {
                let body = self
                    .library
                    .get(&function)
                    .ok_or_else(|| ContextError::UnknownFunction(function.clone()))?;
                let handle = Rc::new(FrameExecutor {
                    inner: Rc::clone(&self.executor),
                    variables: variables.clone(),
                });
                self.scopes.borrow_mut().push(function.as_str(), handle);
                self.frames.push(variables);
                debug!(function, depth = self.scopes.borrow().depth(), "entered function");

                self.ops.push_front(Op::Leave);
                for line in body.iter().rev() {
                    self.ops.push_front(Op::Line(line.clone()));
                }
            }
            Op::Leave => self.leave_frame(),
            Op::Line(_) => {}
        }
        Ok(())
    }

    fn leave_frame(&mut self) {
        if self.frames.pop().is_some() {
            self.scopes.borrow_mut().pop();
        }
    }

    fn execute_line(&mut self, line: ScriptLine) -> Result<(), ContextError> {
        match line {
            ScriptLine::Command(command) => {
                let output = self.executor.execute(&command)?;
                debug!(command, output, "executed");
            }
            ScriptLine::Macro(template) => {
                let variables = self.frames.last().and_then(Option::as_ref).ok_or_else(|| {
                    ContextError::CommandFailed {
                        command: format!("${}", template),
                        reason: "macro line outside a macro function".to_string(),
                    }
                })?;
                let command = expand_macro(&template, variables).map_err(|reason| {
                    ContextError::CommandFailed {
                        command: format!("${}", template),
                        reason,
                    }
                })?;
                let output = self.executor.execute(&command)?;
                debug!(command, output, "executed macro line");
            }
            ScriptLine::Call {
                function,
                arguments,
            } => {
                if !self.library.contains(&function) {
                    return Err(ContextError::UnknownFunction(function));
                }
                let variables = arguments
                    .as_deref()
                    .map(parse_arguments)
                    .transpose()
                    .map_err(|reason| ContextError::InvalidArguments {
                        function: function.clone(),
                        reason,
                    })?;
                self.ops.push_front(Op::Enter {
                    function: function.to_lowercase(),
                    variables,
                });
            }
            // Reached while stepping, which is already paused.
            ScriptLine::Breakpoint => debug!("breakpoint passed while stepping"),
        }
        Ok(())
    }

    /// Run a just-expanded call up to and including its matching leave.
    fn run_call_through(&mut self) -> Result<(), ContextError> {
        let base = self.frames.len();
        while let Some(op) = self.ops.pop_front() {
            match op {
                Op::Line(line) => self.execute_line(line)?,
                structural => self.apply_structural(structural)?,
            }
            if self.frames.len() == base {
                break;
            }
        }
        Ok(())
    }

    /// Leave frames whose bodies are finished so the stack is accurate while paused.
    fn settle(&mut self) {
        while matches!(self.ops.front(), Some(Op::Leave)) {
            self.ops.pop_front();
            self.leave_frame();
        }
    }

    fn visible_variables(&self) -> Option<&Variables> {
        match self.frames.last() {
            Some(frame) => frame.as_ref(),
            None => match self.ops.front() {
                Some(Op::Enter { variables, .. }) => variables.as_ref(),
                _ => None,
            },
        }
    }
}

impl ExecutionContext for ScriptContext {
    fn describe(&self) -> String {
        format!("{} ({} pending)", self.label, self.ops.len())
    }

    fn advance_one_step(&mut self, budget: &mut StepBudget) -> Result<(), ContextError> {
        self.ensure_live()?;
        while let Some(op) = self.ops.pop_front() {
            let line = match op {
                Op::Line(line) => line,
                structural => {
                    self.apply_structural(structural)?;
                    continue;
                }
            };
            let depth = self.scopes.borrow().depth();
            let is_call = matches!(line, ScriptLine::Call { .. });
            self.execute_line(line)?;
            if is_call && budget.runs_through(depth + 1) {
                self.run_call_through()?;
            }
            if !budget.runs_through(depth) {
                budget.consume();
                if budget.is_exhausted() {
                    self.settle();
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn has_pending_action(&self) -> Result<bool, ContextError> {
        self.ensure_live()?;
        Ok(!self.ops.is_empty())
    }

    fn lookup_variable(&self, key: &str) -> Result<VariableBinding, VariableError> {
        let variables = self.visible_variables().ok_or(VariableError::NotApplicable)?;
        variables
            .get(key)
            .map(|value| VariableBinding {
                value: value.clone(),
                is_macro: true,
            })
            .ok_or(VariableError::NotFound)
    }

    fn dump_variables(&self) -> Option<Value> {
        self.visible_variables()
            .map(|variables| Value::Object(variables.clone()))
    }

    fn run(&mut self) -> Result<RunOutcome, ContextError> {
        self.ensure_live()?;
        while let Some(op) = self.ops.pop_front() {
            match op {
                Op::Line(ScriptLine::Breakpoint) => {
                    return Ok(RunOutcome::Breakpoint {
                        source: self.current_function(),
                    })
                }
                Op::Line(line) => self.execute_line(line)?,
                structural => self.apply_structural(structural)?,
            }
        }
        Ok(RunOutcome::Finished)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.ops.clear();
        let mut scopes = self.scopes.borrow_mut();
        for _ in self.frames.drain(..) {
            scopes.pop();
        }
    }
}
