use super::types::ScriptLine;
use serde_json::{Map, Value};

/// Check if line is a comment or blank
pub fn is_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Normalize whitespace in command
pub fn normalize_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classify a body line. Comments and blank lines yield `None`.
pub fn classify_line(line: &str) -> Option<ScriptLine> {
    if is_comment(line) {
        return None;
    }
    let line = line.trim();

    if let Some(rest) = line.strip_prefix('$') {
        return Some(ScriptLine::Macro(rest.trim().to_string()));
    }

    if line.eq_ignore_ascii_case("breakpoint") {
        return Some(ScriptLine::Breakpoint);
    }

    let mut words = line.splitn(2, char::is_whitespace);
    let head = words.next().unwrap_or_default();
    if head.eq_ignore_ascii_case("function") {
        let rest = words.next().unwrap_or_default().trim();
        let (function, arguments) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) if !args.trim().is_empty() => {
                (name.to_string(), Some(args.trim().to_string()))
            }
            _ => (rest.to_string(), None),
        };
        return Some(ScriptLine::Call {
            function,
            arguments,
        });
    }

    Some(ScriptLine::Command(normalize_whitespace(line)))
}

/// Parse the JSON object given to a macro call.
pub fn parse_arguments(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {}", other)),
        Err(e) => Err(e.to_string()),
    }
}

/// Replace `$(key)` references. Strings are inserted bare, other values as JSON.
pub fn expand_macro(text: &str, variables: &Map<String, Value>) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("$(") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find(')') else {
            return Err(format!("unterminated macro reference in `{}`", text));
        };
        let key = &after[..end];
        match variables.get(key) {
            Some(Value::String(s)) => out.push_str(s),
            Some(other) => out.push_str(&other.to_string()),
            None => return Err(format!("missing macro variable `{}`", key)),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
