use alg_engine::{simplify_with_steps, SearchLimits};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read, Write}, process};

/// Default budgets: deep enough to finish the common reductions, shallow enough to return
/// promptly when nothing shrinks.
const DEFAULT_LIMITS: SearchLimits = SearchLimits {
    max_operations: 32,
    max_iterations: 256,
};

struct Options {
    limits: SearchLimits,
    file: Option<String>,
}

fn parse_args() -> Options {
    let mut options = Options { limits: DEFAULT_LIMITS, file: None };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-ops" => options.limits.max_operations = numeric_flag_value(&arg, args.next()),
            "--max-iters" => options.limits.max_iterations = numeric_flag_value(&arg, args.next()),
            _ if arg.starts_with("--") => {
                eprintln!("unknown flag: {}", arg);
                eprintln!("usage: alg [--max-ops N] [--max-iters N] [file]");
                process::exit(2);
            },
            _ => options.file = Some(arg),
        }
    }

    options
}

fn numeric_flag_value(flag: &str, value: Option<String>) -> usize {
    value
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| {
            eprintln!("{} expects a number", flag);
            process::exit(2);
        })
}

/// Parses and simplifies one line of input, printing the derivation from the input expression to
/// the smallest one found, one `(<op count>) <expression>` line per step.
fn simplify_line(input: &str, limits: SearchLimits) {
    match alg_engine::parse(input) {
        Ok(expr) => {
            let (_, steps) = simplify_with_steps(&expr, limits);
            for step in &steps {
                println!("({}) {}", step.op_count(), step);
            }
        },
        Err(err) => err.report_to_stderr(input),
    }
}

/// Simplifies every non-blank line of the given source.
fn simplify_lines(input: &str, limits: SearchLimits) {
    for line in input.lines() {
        if !line.trim().is_empty() {
            simplify_line(line, limits);
        }
    }
}

fn main() {
    env_logger::init();
    let options = parse_args();

    if let Some(filename) = &options.file {
        // run expressions from a file, one per line
        let mut file = BufReader::new(File::open(filename).unwrap_or_else(|err| {
            eprintln!("cannot open {}: {}", filename, err);
            process::exit(1);
        }));
        let mut input = String::new();
        file.read_to_string(&mut input).unwrap();

        simplify_lines(&input, options.limits);
    } else if !io::stdin().is_terminal() {
        // read expressions from piped stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();

        simplify_lines(&input, options.limits);
    } else {
        // run the repl / interactive mode; an empty line exits
        loop {
            print!("> ");
            io::stdout().flush().unwrap();
            let mut input = String::new();
            if io::stdin().read_line(&mut input).unwrap() == 0 || input.trim().is_empty() {
                break;
            }

            simplify_line(&input, options.limits);
        }
    }
}
