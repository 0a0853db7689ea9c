//! Stack VM CLI: run, assemble and disassemble bytecode.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, I/O, load or assembly error
//! - 3: Runtime error

mod commands;

use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => commands::run(&args[2..]),
        "assemble" => commands::assemble(&args[2..]),
        "disassemble" => commands::disassemble(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        flag if flag.starts_with('-') => {
            eprintln!("error: unknown option '{flag}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
        // `stackvm <file>` is shorthand for `stackvm run <file>`.
        _ => commands::run(&args[1..]),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: stackvm <file>");
    eprintln!("       stackvm <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file> [--stack-size N] [--trace]   Execute integer bytecode");
    eprintln!("  assemble <input.svm> [-o output.bc]     Assemble mnemonic text to bytecode");
    eprintln!("  disassemble <file>                      Print bytecode as mnemonic text");
    eprintln!();
    eprintln!("Logging goes to stderr and is controlled by RUST_LOG (default: warn).");
}
