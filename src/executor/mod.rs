mod console;
mod interpreter;
mod script_context;

pub use console::{ConsoleExecutor, TickScheduler};
pub use interpreter::{Interpreter, Invocation};
pub use script_context::ScriptContext;
