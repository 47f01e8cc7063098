use crate::debugger::DebugError;

/// One operator command of the `breakpoint` family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugCommand {
    /// Bare `breakpoint`: pause right here.
    Breakpoint,
    Step(Option<u32>),
    StepOver(Option<u32>),
    Continue,
    Get(Option<String>),
    Stack,
    Run(String),
    Clear,
    On,
    Off,
}

/// Parse an operator line. The leading `breakpoint` word is optional for subcommands.
pub fn parse_command(line: &str) -> Result<DebugCommand, DebugError> {
    let mut rest = line.trim();
    let mut explicit_root = false;
    if let Some((head, tail)) = split_word(rest) {
        if head.eq_ignore_ascii_case("breakpoint") {
            explicit_root = true;
            rest = tail;
        }
    }

    // `run` takes the remainder verbatim so macro lines survive untouched.
    if let Some((head, tail)) = split_word(rest) {
        if head.eq_ignore_ascii_case("run") {
            if tail.is_empty() {
                return Err(DebugError::Command("usage: run <command...>".to_string()));
            }
            return Ok(DebugCommand::Run(tail.to_string()));
        }
    }

    let tokens = shlex::split(rest)
        .ok_or_else(|| DebugError::Command(format!("unbalanced quotes in `{}`", line)))?;
    let words: Vec<&str> = tokens.iter().map(String::as_str).collect();

    match words.as_slice() {
        [] if explicit_root => Ok(DebugCommand::Breakpoint),
        [] => Err(DebugError::Command("empty command".to_string())),
        ["step"] => Ok(DebugCommand::Step(None)),
        ["step", n] => parse_count(n).map(|n| DebugCommand::Step(Some(n))),
        ["step_over"] => Ok(DebugCommand::StepOver(None)),
        ["step_over", n] => parse_count(n).map(|n| DebugCommand::StepOver(Some(n))),
        ["continue"] => Ok(DebugCommand::Continue),
        ["get"] => Ok(DebugCommand::Get(None)),
        ["get", key] => Ok(DebugCommand::Get(Some(key.to_string()))),
        ["stack"] => Ok(DebugCommand::Stack),
        ["clear"] => Ok(DebugCommand::Clear),
        ["on"] => Ok(DebugCommand::On),
        ["off"] => Ok(DebugCommand::Off),
        [other, ..] => Err(DebugError::Command(format!("unknown command: {}", other))),
    }
}

fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    match text.split_once(char::is_whitespace) {
        Some((head, tail)) => Some((head, tail.trim())),
        None => Some((text, "")),
    }
}

fn parse_count(raw: &str) -> Result<u32, DebugError> {
    raw.parse::<u32>()
        .map_err(|_| DebugError::Command(format!("invalid step count: {}", raw)))
}
