use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use anyhow::Context;
use colored::Colorize;

use mano::Compilation;
use mano_source::Severity;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    if let Some(path) = env::args().nth(1) {
        let source =
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
        let compilation = mano::compile(&source);
        report(&compilation);
        if !compilation.succeeded() {
            process::exit(1);
        }
        return Ok(());
    }

    // no file argument: read-eval-print loop over stdin
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            return Ok(());
        }

        let compilation = mano::compile(&input);
        if let Some(program) = &compilation.program {
            println!("{:#?}", program);
        }
        report(&compilation);
    }
}

/// Prints the diagnostics in source order, severity colored, the stable
/// diagnostic text untouched.
fn report(compilation: &Compilation) {
    for diagnostic in compilation.diagnostics() {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        eprintln!("{}: {}", severity, diagnostic);
    }
}
