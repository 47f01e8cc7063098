use super::error::ContextError;
use std::cell::RefCell;
use std::rc::Rc;

/// Runs an ad-hoc command as if issued from a particular frame.
pub trait CommandExecutor {
    fn execute(&self, command: &str) -> Result<String, ContextError>;
}

/// One call-stack frame.
#[derive(Clone)]
pub struct DebugScope {
    function: String,
    executor: Rc<dyn CommandExecutor>,
}

impl DebugScope {
    pub fn new(function: impl Into<String>, executor: Rc<dyn CommandExecutor>) -> Self {
        Self {
            function: function.into(),
            executor,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn executor(&self) -> Rc<dyn CommandExecutor> {
        Rc::clone(&self.executor)
    }
}

impl std::fmt::Debug for DebugScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugScope")
            .field("function", &self.function)
            .finish_non_exhaustive()
    }
}

/// Call stack maintained by the interpreter as functions are entered and left.
#[derive(Debug, Default)]
pub struct ScopeManager {
    frames: Vec<DebugScope>,
}

/// The interpreter and the session both hold the stack; everything runs on
/// the interpreter thread.
pub type SharedScopes = Rc<RefCell<ScopeManager>>;

impl ScopeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedScopes {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn push(&mut self, function: impl Into<String>, executor: Rc<dyn CommandExecutor>) {
        self.frames.push(DebugScope::new(function, executor));
    }

    pub fn pop(&mut self) -> Option<DebugScope> {
        self.frames.pop()
    }

    pub fn current_scope(&self) -> Option<&DebugScope> {
        self.frames.last()
    }

    /// Snapshot of the stack, innermost frame first.
    pub fn all_scopes(&self) -> Vec<DebugScope> {
        self.frames.iter().rev().cloned().collect()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;

    impl CommandExecutor for Nop {
        fn execute(&self, command: &str) -> Result<String, ContextError> {
            Ok(command.to_string())
        }
    }

    #[test]
    fn test_all_scopes_is_innermost_first() {
        let mut scopes = ScopeManager::new();
        scopes.push("main", Rc::new(Nop));
        scopes.push("helper", Rc::new(Nop));
        scopes.push("leaf", Rc::new(Nop));

        let names: Vec<_> = scopes
            .all_scopes()
            .iter()
            .map(|s| s.function().to_string())
            .collect();
        assert_eq!(names, vec!["leaf", "helper", "main"]);

        scopes.pop();
        assert_eq!(scopes.all_scopes()[0].function(), "helper");
        assert_eq!(scopes.depth(), 2);
    }

    #[test]
    fn test_empty_stack() {
        let mut scopes = ScopeManager::new();
        assert!(scopes.current_scope().is_none());
        assert!(scopes.pop().is_none());
        assert!(scopes.all_scopes().is_empty());
    }
}
