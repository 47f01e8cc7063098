use crate::debugger::{CommandExecutor, ContextError, HostScheduler};
use std::cell::RefCell;
use tracing::info;

/// Minimal command set for scripts: `say <text>` and `fail [reason]`.
#[derive(Debug, Default)]
pub struct ConsoleExecutor {
    echo: bool,
    history: RefCell<Vec<String>>,
}

impl ConsoleExecutor {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            history: RefCell::new(Vec::new()),
        }
    }

    /// Everything `say` has printed so far.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl CommandExecutor for ConsoleExecutor {
    fn execute(&self, command: &str) -> Result<String, ContextError> {
        let command = command.trim();
        let (head, rest) = command
            .split_once(char::is_whitespace)
            .map(|(h, r)| (h, r.trim()))
            .unwrap_or((command, ""));

        match head.to_lowercase().as_str() {
            "say" => {
                if self.echo {
                    println!("{}", rest);
                }
                self.history.borrow_mut().push(rest.to_string());
                Ok(rest.to_string())
            }
            "fail" => Err(ContextError::CommandFailed {
                command: command.to_string(),
                reason: if rest.is_empty() {
                    "failed on request".to_string()
                } else {
                    rest.to_string()
                },
            }),
            _ => Err(ContextError::CommandFailed {
                command: command.to_string(),
                reason: "unknown command".to_string(),
            }),
        }
    }
}

/// Tick clock that stops while the debugger holds it frozen.
#[derive(Debug, Default)]
pub struct TickScheduler {
    tick: u64,
    frozen: bool,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Advance one tick. Returns false, leaving the clock untouched, while frozen.
    pub fn advance(&mut self) -> bool {
        if self.frozen {
            return false;
        }
        self.tick += 1;
        true
    }
}

impl HostScheduler for TickScheduler {
    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    fn breakpoint_hit(&mut self, source: &str) {
        info!(tick = self.tick, source, "tick clock frozen at breakpoint");
    }

    fn resumed(&mut self) {
        info!(tick = self.tick, "tick clock resumed");
    }
}
