//! CLI command implementations.

use std::fs;
use std::io::{self, BufWriter, IsTerminal};
use std::path::Path;

use stackvm_common::Program;
use stackvm_vm::{Machine, VmConfig};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

/// Options accepted by `run`.
#[derive(Debug, PartialEq, Eq)]
struct RunOptions {
    input: String,
    config: VmConfig,
    trace: bool,
}

/// Load and execute an integer bytecode file.
pub fn run(args: &[String]) -> Result<(), i32> {
    let opts = parse_run_args(args)?;
    init_logging(opts.trace);

    let program = read_bytecode(&opts.input)?;
    debug!(path = %opts.input, instructions = program.len(), "loaded program");

    let stdout = BufWriter::new(io::stdout().lock());
    let mut machine = Machine::with_config(&program, opts.config, stdout);
    match machine.run() {
        Ok(summary) => {
            debug!(steps = summary.steps, "program finished");
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Assemble a mnemonic text file to integer bytecode.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    const USAGE: &str = "Usage: stackvm assemble <input.svm> [-o output.bc]";
    let (input, output) = match args {
        [input] => (input, Path::new(input).with_extension("bc")),
        [input, flag, output] if flag == "-o" => (input, output.into()),
        [] => {
            eprintln!("error: assemble requires an input file");
            eprintln!("{USAGE}");
            return Err(1);
        }
        _ => {
            eprintln!("error: unexpected arguments to assemble");
            eprintln!("{USAGE}");
            return Err(1);
        }
    };
    init_logging(false);

    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let program = stackvm_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    fs::write(&output, program.encode()).map_err(|e| {
        eprintln!("error: cannot write '{}': {e}", output.display());
        1
    })?;

    eprintln!(
        "assembled {} instructions -> {}",
        program.len(),
        output.display()
    );
    Ok(())
}

/// Print an integer bytecode file as mnemonic text.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    let [input] = args else {
        eprintln!("error: disassemble requires exactly one input file");
        eprintln!("Usage: stackvm disassemble <file>");
        return Err(1);
    };
    init_logging(false);

    let program = read_bytecode(input)?;
    print!("{}", stackvm_assembler::disassemble(&program));
    Ok(())
}

/// Parse `<file> [--stack-size N] [--trace]` in any order.
fn parse_run_args(args: &[String]) -> Result<RunOptions, i32> {
    const USAGE: &str = "Usage: stackvm run <file> [--stack-size N] [--trace]";
    let mut input = None;
    let mut config = VmConfig::default();
    let mut trace = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--trace" => trace = true,
            "--stack-size" => {
                let value = iter.next().ok_or_else(|| {
                    eprintln!("error: --stack-size requires a value");
                    1
                })?;
                let capacity = value.parse::<usize>().map_err(|_| {
                    eprintln!("error: invalid stack size '{value}'");
                    1
                })?;
                config = VmConfig::with_stack_capacity(capacity);
            }
            flag if flag.starts_with('-') => {
                eprintln!("error: unknown option '{flag}'");
                eprintln!("{USAGE}");
                return Err(1);
            }
            path if input.is_none() => input = Some(path.to_string()),
            extra => {
                eprintln!("error: unexpected argument '{extra}'");
                eprintln!("{USAGE}");
                return Err(1);
            }
        }
    }

    let Some(input) = input else {
        eprintln!("error: run requires an input file");
        eprintln!("{USAGE}");
        return Err(1);
    };
    Ok(RunOptions {
        input,
        config,
        trace,
    })
}

/// Install the stderr subscriber. `RUST_LOG` overrides the `warn` default;
/// `trace` additionally enables per-instruction events from the engine.
fn init_logging(trace: bool) {
    let mut directives =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| "warn".to_string());
    if trace {
        directives.push_str(",stackvm_vm=trace");
    }

    let _ = fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

fn read_bytecode(path: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })?;

    Program::decode(&text).map_err(|e| {
        eprintln!("error: invalid bytecode: {e}");
        1
    })
}
