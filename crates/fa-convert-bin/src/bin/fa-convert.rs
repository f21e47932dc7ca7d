use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::builder::{NonEmptyStringValueParser, RangedU64ValueParser};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use fa_convert::{
    dfa_to_nfa, nfa_to_dfa, AcceptList, AutomatonError, ConvertOptions, ConvertRequest, DeadState,
    RawDfa, RawNfa, StateOrder, Validation, DEFAULT_SEPARATOR,
};

/// Converts finite automata between NFA and DFA form.
///
/// The request is a JSON body read from FILE, or from stdin when FILE is
/// omitted. The converted automaton is printed to stdout as JSON, as a
/// Graphviz digraph or as a transition table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Subset construction: reads `{"nfa": ...}` and prints an equivalent DFA
    ToDfa { file: Option<PathBuf> },
    /// Reads `{"dfa": ...}` and prints the same automaton as an NFA
    ToNfa { file: Option<PathBuf> },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// The wire shape the request came in
    Json,
    /// Graphviz digraph, e.g. for `dot -Tsvg`
    Dot,
    /// One row per state, one column per symbol
    Table,
}

#[derive(Args, Debug)]
struct OptionArgs {
    /// Emit DFA states sorted instead of in discovery order
    #[arg(long, global = true)]
    sorted: bool,

    /// Leave out the empty dead state and the transitions into it
    #[arg(long, global = true)]
    omit_dead_state: bool,

    /// List an accepting state once per transition into it, for older consumers
    #[arg(long, global = true)]
    duplicate_accepts: bool,

    /// Require every referenced state to be declared in `states`
    #[arg(long, global = true)]
    strict: bool,

    /// Joins NFA state names inside a DFA state name
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_SEPARATOR,
        value_parser = NonEmptyStringValueParser::new()
    )]
    separator: String,

    /// Give up once subset construction has produced this many states,
    /// counting the start state
    #[arg(long, global = true, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_states: Option<usize>,
}

fn main() {
    env_logger::init();
    let ts = Instant::now();
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        log::error!("Error: {:#}", err);
        eprintln!("error: {:#}", err);
        exit(1);
    }

    log::info!("Done ({}ms).", ts.elapsed().as_millis());
}

fn run(cli: &Cli) -> Result<()> {
    let options = convert_options(&cli.options);

    let output = match &cli.command {
        Command::ToDfa { file } => {
            let nfa = read_request(file.as_deref())?.into_nfa()?;
            let dfa = nfa_to_dfa(nfa, &options)?;
            match cli.format {
                Format::Json => render_json(&RawDfa::from(&dfa), cli.pretty)?,
                Format::Dot => dfa.dot("DFA").to_string(),
                Format::Table => dfa.table().to_string(),
            }
        }
        Command::ToNfa { file } => {
            let dfa = read_request(file.as_deref())?.into_dfa()?;
            let nfa = dfa_to_nfa(dfa, &options)?;
            match cli.format {
                Format::Json => render_json(&RawNfa::from(&nfa), cli.pretty)?,
                Format::Dot => nfa.dot("NFA").to_string(),
                Format::Table => nfa.table().to_string(),
            }
        }
    };

    println!("{}", output);
    Ok(())
}

fn convert_options(args: &OptionArgs) -> ConvertOptions {
    let mut opts = ConvertOptions::default().with_separator(args.separator.as_str());
    if args.sorted {
        opts = opts.with_state_order(StateOrder::Sorted);
    }
    if args.omit_dead_state {
        opts = opts.with_dead_state(DeadState::Omit);
    }
    if args.duplicate_accepts {
        opts = opts.with_accept_list(AcceptList::PerTransition);
    }
    if args.strict {
        opts = opts.with_validation(Validation::Strict);
    }
    if let Some(limit) = args.max_states {
        opts = opts.with_max_dfa_states(limit);
    }
    opts
}

fn read_request(path: Option<&Path>) -> Result<ConvertRequest> {
    let body = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("failed to read request from stdin")?;
            body
        }
    };

    // a body that doesn't even decode is reported the same way as a missing field
    serde_json::from_str(&body)
        .map_err(|err| anyhow::Error::from(AutomatonError::MalformedAutomaton(err.to_string())))
}

fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    output.context("failed to encode result as JSON")
}
