// tests/interactive_simulation.rs
// Drives scripted sessions end to end: interpreter, breakpoints and operator commands

use macro_debugger::command::handle_line;
use macro_debugger::debugger::{DebugError, DebugSession, ScopeManager};
use macro_debugger::executor::{ConsoleExecutor, Interpreter, Invocation, TickScheduler};
use macro_debugger::parser::build_function_library;
use serde_json::{json, Value};
use std::rc::Rc;

const GREETING: &str = r#"
:main
say start
function greet {"name": "Alex", "level": 3}
say end

:greet
say hi
breakpoint
$say hello $(name)
function leaf
say bye

:leaf
say in leaf
say leaf done
"#;

const TWO_STOPS: &str = r#"
:main
say a
breakpoint
say b
breakpoint
say c

:tail
say tail
"#;

const REPEATED: &str = r#"
:main
function show {"n": 1}
function show {"n": 2}

:show
breakpoint
$say n is $(n)
"#;

struct Harness {
    interpreter: Interpreter,
    session: DebugSession<TickScheduler>,
    console: Rc<ConsoleExecutor>,
}

impl Harness {
    fn new(script: &str) -> Self {
        let lines: Vec<&str> = script.lines().collect();
        let library = build_function_library(&lines);
        let scopes = ScopeManager::shared();
        let console = Rc::new(ConsoleExecutor::new(false));
        let interpreter = Interpreter::new(library, Rc::clone(&scopes), console.clone());
        let session = DebugSession::with_scopes(TickScheduler::new(), scopes);
        Self {
            interpreter,
            session,
            console,
        }
    }

    fn invoke(&mut self, function: &str) -> Invocation {
        self.interpreter
            .invoke(&mut self.session, function, None)
            .expect("invocation failed")
    }

    fn cmd(&mut self, line: &str) -> Result<String, DebugError> {
        handle_line(&mut self.session, line, 1)
    }

    fn stack(&self) -> Vec<String> {
        self.session
            .stack()
            .iter()
            .map(|s| s.function().to_string())
            .collect()
    }

    fn said(&self) -> Vec<String> {
        self.console.history()
    }
}

#[cfg(test)]
mod interactive_tests {
    use super::*;

    #[test]
    fn test_pause_at_breakpoint() {
        let mut h = Harness::new(GREETING);

        assert_eq!(h.invoke("main"), Invocation::Suspended);
        assert_eq!(h.said(), vec!["start", "hi"]);
        assert!(h.session.state().is_debugging());
        assert!(h.session.host().is_frozen());
        assert_eq!(h.stack(), vec!["greet", "main"]);
        assert_eq!(h.cmd("stack").unwrap(), "> greet\n  main");

        // Frozen clock does not tick
        assert!(!h.session.host_mut().advance());
    }

    #[test]
    fn test_inspect_macro_variables() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        assert_eq!(h.cmd("get name").unwrap(), "name = \"Alex\"");
        let all: Value = serde_json::from_str(&h.cmd("get").unwrap()).unwrap();
        assert_eq!(all, json!({ "name": "Alex", "level": 3 }));
        assert_eq!(
            h.cmd("get missing"),
            Err(DebugError::VariableNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_step_over_runs_nested_call() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        h.cmd("step").unwrap();
        assert_eq!(h.said().last().unwrap(), "hello Alex");

        let feedback = h.cmd("step_over").unwrap();
        assert_eq!(feedback, "Paused, 1 context(s) waiting");
        assert_eq!(
            h.said(),
            vec!["start", "hi", "hello Alex", "in leaf", "leaf done"],
            "the whole call ran as one step"
        );
        assert_eq!(h.stack(), vec!["greet", "main"]);

        h.cmd("step").unwrap();
        assert_eq!(h.said().last().unwrap(), "bye");
        assert_eq!(h.stack(), vec!["main"], "finished frames are left while paused");

        // main has no macro arguments
        assert_eq!(h.cmd("get name"), Err(DebugError::NotMacroContext));

        h.cmd("continue").unwrap();
        assert_eq!(h.said().last().unwrap(), "end");
        assert!(h.stack().is_empty());
        assert!(!h.session.state().is_debugging());
        assert!(!h.session.host().is_frozen());
    }

    #[test]
    fn test_step_enters_nested_call() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        h.cmd("step").unwrap(); // macro line
        h.cmd("step").unwrap(); // the call itself
        assert_eq!(h.stack(), vec!["greet", "main"]);

        h.cmd("step").unwrap();
        assert_eq!(h.stack(), vec!["leaf", "greet", "main"]);
        assert_eq!(h.said().last().unwrap(), "in leaf");
    }

    #[test]
    fn test_multi_step_runs_off_the_end() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        let feedback = h.cmd("breakpoint step 50").unwrap();
        assert!(feedback.starts_with("Stepped past the end"), "{}", feedback);
        assert_eq!(h.said().last().unwrap(), "end");
        assert!(!h.session.state().is_debugging());
        assert!(h.stack().is_empty());
    }

    #[test]
    fn test_clear_discards_pending_work() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        h.cmd("clear").unwrap();

        assert_eq!(h.said(), vec!["start", "hi"], "nothing after the breakpoint ran");
        assert!(h.stack().is_empty(), "released contexts leave their frames");
        assert_eq!(h.session.queued(), 0);
        assert!(!h.session.host().is_frozen());
        assert_eq!(h.cmd("step"), Err(DebugError::NotDebugging));
    }

    #[test]
    fn test_invocations_while_paused_are_deferred() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        assert_eq!(h.invoke("leaf"), Invocation::Deferred);
        assert_eq!(h.session.queued(), 2);
        assert_eq!(h.said(), vec!["start", "hi"], "deferred work has not run");

        let feedback = h.cmd("continue").unwrap();
        assert_eq!(feedback, "Continuing: 2 context(s) ran, 0 failed");
        assert_eq!(
            h.said(),
            vec!["start", "hi", "hello Alex", "in leaf", "leaf done", "bye", "end", "in leaf", "leaf done"],
            "contexts drain in suspension order"
        );
    }

    #[test]
    fn test_continue_pauses_at_later_breakpoint() {
        let mut h = Harness::new(TWO_STOPS);
        assert_eq!(h.invoke("main"), Invocation::Suspended);
        assert_eq!(h.said(), vec!["a"]);

        let feedback = h.cmd("continue").unwrap();
        assert_eq!(
            feedback,
            "Continuing: 0 context(s) ran, 0 failed, paused again at a breakpoint"
        );
        assert_eq!(h.said(), vec!["a", "b"]);
        assert!(h.session.state().is_debugging());
        assert!(h.session.host().is_frozen());
        assert_eq!(h.session.queued(), 1);
        assert_eq!(h.stack(), vec!["main"]);

        let feedback = h.cmd("continue").unwrap();
        assert_eq!(feedback, "Continuing: 1 context(s) ran, 0 failed");
        assert_eq!(h.said(), vec!["a", "b", "c"]);
        assert!(!h.session.state().is_debugging());
        assert!(!h.session.host().is_frozen());
        assert!(h.stack().is_empty());
    }

    #[test]
    fn test_step_after_second_breakpoint() {
        let mut h = Harness::new(TWO_STOPS);
        h.invoke("main");
        h.cmd("continue").unwrap();

        assert_eq!(h.cmd("step").unwrap(), "Paused, 0 context(s) waiting");
        assert_eq!(h.said(), vec!["a", "b", "c"]);
        assert!(h.session.state().is_debugging());
    }

    #[test]
    fn test_same_breakpoint_pauses_each_call() {
        let mut h = Harness::new(REPEATED);
        assert_eq!(h.invoke("main"), Invocation::Suspended);
        assert_eq!(h.stack(), vec!["show", "main"]);
        assert_eq!(h.cmd("get n").unwrap(), "n = 1");

        h.cmd("continue").unwrap();
        assert_eq!(h.said(), vec!["n is 1"]);
        assert_eq!(h.stack(), vec!["show", "main"]);
        assert_eq!(h.cmd("get n").unwrap(), "n = 2");

        h.cmd("continue").unwrap();
        assert_eq!(h.said(), vec!["n is 1", "n is 2"]);
        assert!(!h.session.state().is_debugging());
    }

    #[test]
    fn test_deferred_work_waits_behind_repaused_context() {
        let mut h = Harness::new(TWO_STOPS);
        h.invoke("main");
        assert_eq!(h.invoke("tail"), Invocation::Deferred);

        h.cmd("continue").unwrap();
        assert_eq!(h.said(), vec!["a", "b"], "tail has not run");
        assert_eq!(h.session.queued(), 2);

        let feedback = h.cmd("continue").unwrap();
        assert_eq!(feedback, "Continuing: 2 context(s) ran, 0 failed");
        assert_eq!(h.said(), vec!["a", "b", "c", "tail"]);
    }

    #[test]
    fn test_debug_mode_off_while_paused_runs_through() {
        let mut h = Harness::new(TWO_STOPS);
        h.invoke("main");
        h.cmd("off").unwrap();

        let feedback = h.cmd("continue").unwrap();
        assert_eq!(feedback, "Continuing: 1 context(s) ran, 0 failed");
        assert_eq!(h.said(), vec!["a", "b", "c"]);
        assert!(!h.session.state().is_debugging());
    }

    #[test]
    fn test_debug_mode_off_skips_breakpoints() {
        let mut h = Harness::new(GREETING);
        h.cmd("off").unwrap();

        assert_eq!(h.invoke("main"), Invocation::Completed);
        assert_eq!(h.said().len(), 7);
        assert!(!h.session.state().is_debugging());

        h.cmd("on").unwrap();
        assert_eq!(h.invoke("main"), Invocation::Suspended);
    }

    #[test]
    fn test_run_command_in_paused_frame() {
        let mut h = Harness::new(GREETING);
        h.invoke("main");

        assert_eq!(h.cmd("run $say hey $(name)").unwrap(), "hey Alex");
        assert_eq!(h.cmd("run say plain").unwrap(), "plain");
        assert!(matches!(h.cmd("run dance"), Err(DebugError::Execution(_))));
    }

    #[test]
    fn test_failing_step_releases_frames() {
        let script = r#"
:main
breakpoint
fail on purpose
say unreachable
"#;
        let mut h = Harness::new(script);
        assert_eq!(h.invoke("main"), Invocation::Suspended);
        assert_eq!(h.stack(), vec!["main"]);

        assert!(matches!(h.cmd("step"), Err(DebugError::InternalStepFailure(_))));
        assert!(h.stack().is_empty());
        assert_eq!(h.session.queued(), 0);
        assert!(h.session.state().is_debugging(), "needs continue or clear");

        h.cmd("continue").unwrap();
        assert!(h.said().is_empty());
        assert!(!h.session.host().is_frozen());
    }

    #[test]
    fn test_unknown_function() {
        let mut h = Harness::new(GREETING);
        assert!(h.interpreter.invoke(&mut h.session, "nope", None).is_err());
        assert!(h.interpreter.library().contains("leaf"));
    }
}
