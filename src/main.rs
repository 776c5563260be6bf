use clap::Parser;
use serde_json::Value;
use structural_equivalency::{
    check_equivalent, EquivalencyError, EquivalencyOptions, TextComparison,
};

/// Checks whether two JSON documents are structurally equivalent.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Actual JSON document (string).
    subject: String,
    /// Expected JSON document (string).
    expectation: String,
    /// Collections must match in order
    #[arg(long)]
    strict_order: bool,
    /// Compare text case-insensitively
    #[arg(long)]
    ignore_case: bool,
    /// Compare nested collection items with plain equality
    #[arg(long)]
    no_recursion: bool,
    /// Options as JSON, applied before the flags above
    #[arg(long)]
    options: Option<String>,
    /// Log step decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_json(label: &str, text: &str) -> Value {
    match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid {label} JSON: {e}");
            std::process::exit(2);
        }
    }
}

fn main() {
    // Parse CLI arguments.
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let subject = parse_json("subject", &args.subject);
    let expectation = parse_json("expectation", &args.expectation);

    // Build options.
    let mut opts = match args.options.as_deref().map(EquivalencyOptions::from_json) {
        None => EquivalencyOptions::default(),
        Some(Ok(opts)) => opts,
        Some(Err(e)) => {
            eprintln!("Invalid options: {e}");
            std::process::exit(2);
        }
    };
    if args.strict_order { opts = opts.with_strict_ordering(); }
    if args.ignore_case {
        opts = opts.with_text_comparison(TextComparison::CurrentCultureIgnoreCase);
    }
    if args.no_recursion { opts = opts.excluding_nested_objects(); }

    match check_equivalent(&subject, &expectation, &opts) {
        Ok(()) => println!("equivalent"),
        Err(EquivalencyError::AssertionFailed(failures)) => {
            println!("{failures}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    }
}
