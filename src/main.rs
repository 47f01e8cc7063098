use macro_debugger::command;
use macro_debugger::config::DebuggerConfig;
use macro_debugger::debugger::{DebugSession, ScopeManager};
use macro_debugger::executor::{ConsoleExecutor, Interpreter, Invocation, TickScheduler};
use macro_debugger::parser;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

struct Options {
    script: PathBuf,
    config: Option<PathBuf>,
    entry: Option<String>,
    ticks: Option<u64>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut script = None;
    let mut config = None;
    let mut entry = None;
    let mut ticks = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => config = iter.next().map(PathBuf::from),
            "--entry" => entry = iter.next().cloned(),
            "--ticks" => {
                let raw = iter.next().ok_or("--ticks needs a value")?;
                ticks = Some(raw.parse().map_err(|_| format!("invalid tick count: {}", raw))?);
            }
            other if script.is_none() => script = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument: {}", other)),
        }
    }

    Ok(Options {
        script: script.unwrap_or_else(|| PathBuf::from("main.script")),
        config,
        entry,
        ticks,
    })
}

fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;

    let mut config = match &options.config {
        Some(path) => DebuggerConfig::load(path)?,
        None => DebuggerConfig::default(),
    };
    if let Some(entry) = options.entry {
        config.entry = entry;
    }
    if let Some(ticks) = options.ticks {
        config.ticks = ticks;
    }

    init_logging(&config.log_filter);

    let contents = fs::read_to_string(&options.script)?;
    let physical_lines: Vec<&str> = contents.lines().collect();
    let library = parser::build_function_library(&physical_lines);
    info!(
        script = %options.script.display(),
        functions = library.len(),
        "script loaded"
    );

    let scopes = ScopeManager::shared();
    let interpreter = Interpreter::new(
        library,
        Rc::clone(&scopes),
        Rc::new(ConsoleExecutor::new(true)),
    );
    let mut session = DebugSession::with_scopes(TickScheduler::new(), scopes);
    session.set_debug_mode(config.debug_mode);

    run_interactive_mode(&interpreter, &mut session, &config)?;

    if session.state().is_debugging() {
        session.clear();
    }
    info!(ticks = session.host().tick(), "simulation finished");
    Ok(())
}

fn run_interactive_mode(
    interpreter: &Interpreter,
    session: &mut DebugSession<TickScheduler>,
    config: &DebuggerConfig,
) -> io::Result<()> {
    let mut ticks_run = 0;

    while ticks_run < config.ticks {
        if !session.host_mut().advance() {
            if !prompt(session, config)? {
                return Ok(());
            }
            continue;
        }
        ticks_run += 1;

        match interpreter.invoke(session, &config.entry, None) {
            Ok(Invocation::Suspended) => {
                eprintln!("\n⏸  Paused at a breakpoint (tick {})", session.host().tick());
            }
            Ok(outcome) => debug!(tick = session.host().tick(), ?outcome, "tick done"),
            Err(e) => error!(error = %e, "tick failed"),
        }
    }

    while session.state().is_debugging() {
        if !prompt(session, config)? {
            break;
        }
    }
    Ok(())
}

/// Read and apply one operator command. Returns false when the operator quits.
fn prompt(session: &mut DebugSession<TickScheduler>, config: &DebuggerConfig) -> io::Result<bool> {
    eprintln!("\nCommands: step [n], step_over [n], continue, get [key], stack, run <cmd>, clear, on, off, quit");
    eprint!("> ");
    io::stderr().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(false);
    }
    let line = input.trim();

    match line {
        "q" | "quit" => Ok(false),
        "" => Ok(true),
        _ => {
            match command::handle_line(session, line, config.default_steps) {
                Ok(feedback) => eprintln!("{}", feedback),
                Err(e) => eprintln!("❌ {}", e),
            }
            Ok(true)
        }
    }
}
