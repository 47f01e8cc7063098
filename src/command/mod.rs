mod dispatch;
mod parse;

pub use dispatch::execute;
pub use parse::{parse_command, DebugCommand};

use crate::debugger::{DebugSession, HostScheduler, Result};

/// Parse and execute one operator line.
pub fn handle_line<H: HostScheduler>(
    session: &mut DebugSession<H>,
    line: &str,
    default_steps: u32,
) -> Result<String> {
    let command = parse_command(line)?;
    execute(session, command, default_steps)
}
