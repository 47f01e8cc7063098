mod commands;
mod labels;
mod types;

pub use commands::{classify_line, expand_macro, is_comment, normalize_whitespace, parse_arguments};
pub use labels::build_function_library;
pub use types::{FunctionLibrary, ScriptLine};
