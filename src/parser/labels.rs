use super::commands::classify_line;
use super::types::FunctionLibrary;
use tracing::warn;

/// Scan `:name` labels (case-insensitive); each owns the lines up to the next label.
pub fn build_function_library(lines: &[&str]) -> FunctionLibrary {
    let mut library = FunctionLibrary::new();
    let mut current: Option<(String, Vec<_>)> = None;

    for (i, line) in lines.iter().enumerate() {
        let t = line.trim();
        if t.starts_with(':') && t.len() > 1 {
            if let Some((name, body)) = current.take() {
                library.insert(&name, body);
            }
            let label_text = &t[1..];
            let label_name = label_text.split_whitespace().next().unwrap_or(label_text);
            current = Some((label_name.trim().to_lowercase(), Vec::new()));
            continue;
        }

        match (&mut current, classify_line(line)) {
            (Some((_, body)), Some(parsed)) => body.push(parsed),
            (None, Some(_)) => warn!(line = i + 1, "line outside any function ignored"),
            (_, None) => {}
        }
    }

    if let Some((name, body)) = current {
        library.insert(&name, body);
    }
    library
}
