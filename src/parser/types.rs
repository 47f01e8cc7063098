use std::collections::HashMap;
use std::rc::Rc;

/// One classified line of a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptLine {
    /// Plain command handed to the executor as written.
    Command(String),
    /// `$`-prefixed line whose `$(key)` references are filled from macro variables.
    Macro(String),
    /// `function <name> [json-object]`
    Call {
        function: String,
        arguments: Option<String>,
    },
    Breakpoint,
}

/// All functions defined in a script, keyed by lowercase name.
#[derive(Debug, Default, Clone)]
pub struct FunctionLibrary {
    functions: HashMap<String, Rc<[ScriptLine]>>,
}

impl FunctionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, body: Vec<ScriptLine>) {
        self.functions.insert(name.to_lowercase(), body.into());
    }

    pub fn get(&self, name: &str) -> Option<Rc<[ScriptLine]>> {
        self.functions.get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
