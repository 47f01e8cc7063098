use super::parse::DebugCommand;
use crate::debugger::{DebugSession, HostScheduler, Result, StepOutcome};
use serde_json::Value;

/// Apply one operator command to the session and return the feedback line(s).
pub fn execute<H: HostScheduler>(
    session: &mut DebugSession<H>,
    command: DebugCommand,
    default_steps: u32,
) -> Result<String> {
    match command {
        DebugCommand::Breakpoint => Ok(if session.trigger("operator") {
            "Breakpoint set".to_string()
        } else {
            "Debug mode is off, breakpoint ignored".to_string()
        }),
        DebugCommand::Step(n) => session
            .step(n.unwrap_or(default_steps))
            .map(describe_step),
        DebugCommand::StepOver(n) => session
            .step_over(n.unwrap_or(default_steps))
            .map(describe_step),
        DebugCommand::Continue => session.continue_exec().map(|summary| {
            format!(
                "Continuing: {} context(s) ran, {} failed{}",
                summary.completed,
                summary.failed,
                if summary.paused {
                    ", paused again at a breakpoint"
                } else {
                    ""
                }
            )
        }),
        DebugCommand::Get(Some(key)) => {
            let binding = session.lookup_variable(&key)?;
            Ok(format!("{} = {}", key, pretty(&binding.value)))
        }
        DebugCommand::Get(None) => session.dump_variables().map(|all| pretty(&all)),
        DebugCommand::Stack => Ok(render_stack(session)),
        DebugCommand::Run(line) => session.run_in_scope(&line),
        DebugCommand::Clear => {
            session.clear();
            Ok("Debugger cleared".to_string())
        }
        DebugCommand::On => {
            session.set_debug_mode(true);
            Ok("Debug mode on".to_string())
        }
        DebugCommand::Off => {
            session.set_debug_mode(false);
            Ok("Debug mode off".to_string())
        }
    }
}

fn describe_step(outcome: StepOutcome) -> String {
    match outcome {
        StepOutcome::Paused { queued } => format!("Paused, {} context(s) waiting", queued),
        StepOutcome::RanOffEnd(summary) => format!(
            "Stepped past the end of buffered work, continuing: {} ran, {} failed",
            summary.completed, summary.failed
        ),
    }
}

/// Innermost frame first, marked with `>`.
fn render_stack<H: HostScheduler>(session: &DebugSession<H>) -> String {
    let frames = session.stack();
    if frames.is_empty() {
        return "<empty stack>".to_string();
    }
    frames
        .iter()
        .enumerate()
        .map(|(i, scope)| {
            let marker = if i == 0 { ">" } else { " " };
            format!("{} {}", marker, scope.function())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
