//! Command-line front end for the tree flattener.
//!
//! Reads a flat-text decision tree, writes one strategy per line, and
//! prints a one-line run summary to stderr. All fatal errors (parse
//! failures, bad references, unknown root) stop the run with a non-zero
//! exit code before any further output.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process;

use tree_flattener_core::{parse, validate_tree, Flattener, Strategy};

struct Args {
    /// Input path; None reads stdin
    input: Option<String>,
    /// Output path; None writes stdout
    output: Option<String>,
    /// Root node identifier
    root: String,
    /// Emit one JSON object per strategy instead of text
    json: bool,
    /// Run eager whole-tree validation before flattening
    check: bool,
}

fn usage() -> ! {
    eprintln!(
        "Usage: flatten-tree [--input PATH] [--output PATH] [--root ID] [--json] [--check]\n\
         \n\
         Flattens a decision tree file into one strategy per line.\n\
         --input PATH    tree file to read (default: stdin)\n\
         --output PATH   strategies file to write (default: stdout)\n\
         --root ID       root node identifier (default: 0)\n\
         --json          emit strategies as JSON objects, one per line\n\
         --check         validate the whole tree before flattening"
    );
    process::exit(2);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn parse_args() -> Args {
    let argv: Vec<String> = env::args().collect();
    let mut args = Args {
        input: None,
        output: None,
        root: "0".to_string(),
        json: false,
        check: false,
    };

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--input" => {
                i += 1;
                match argv.get(i) {
                    Some(path) => args.input = Some(path.clone()),
                    None => usage(),
                }
            }
            "--output" => {
                i += 1;
                match argv.get(i) {
                    Some(path) => args.output = Some(path.clone()),
                    None => usage(),
                }
            }
            "--root" => {
                i += 1;
                match argv.get(i) {
                    Some(id) => args.root = id.clone(),
                    None => usage(),
                }
            }
            "--json" => args.json = true,
            "--check" => args.check = true,
            "--help" | "-h" => usage(),
            other => {
                eprintln!("unknown argument: {}", other);
                usage();
            }
        }
        i += 1;
    }
    args
}

fn open_input(path: &Option<String>) -> Box<dyn BufRead> {
    match path {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => fail(format!("cannot open '{}': {}", path, e)),
        },
        None => Box::new(BufReader::new(io::stdin())),
    }
}

fn open_output(path: &Option<String>) -> Box<dyn Write> {
    match path {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => fail(format!("cannot create '{}': {}", path, e)),
        },
        None => Box::new(BufWriter::new(io::stdout())),
    }
}

fn write_strategy(out: &mut dyn Write, strategy: &Strategy, json: bool) -> io::Result<()> {
    if json {
        let line = serde_json::to_string(strategy)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(out, "{}", line)
    } else {
        writeln!(out, "{}", strategy)
    }
}

fn main() {
    let args = parse_args();

    let store = match parse(open_input(&args.input)) {
        Ok(store) => store,
        Err(e) => fail(e),
    };

    if args.check {
        if let Err(errors) = validate_tree(&store, &args.root) {
            for error in &errors {
                eprintln!("error: {}", error);
            }
            process::exit(1);
        }
    }

    let flattener = Flattener::new(&store);
    let mut strategies = match flattener.flatten(&args.root) {
        Ok(iter) => iter,
        Err(e) => fail(e),
    };

    let mut out = open_output(&args.output);
    while let Some(item) = strategies.next() {
        match item {
            Ok(strategy) => {
                if let Err(e) = write_strategy(out.as_mut(), &strategy, args.json) {
                    fail(format!("cannot write output: {}", e));
                }
            }
            Err(e) => fail(e),
        }
    }
    if let Err(e) = out.flush() {
        fail(format!("cannot write output: {}", e));
    }

    let stats = strategies.stats();
    eprintln!(
        "{} nodes parsed, {} visited, {} strategies, {} branches pruned",
        store.len(),
        stats.nodes_visited,
        stats.strategies_emitted,
        stats.branches_pruned
    );
}
