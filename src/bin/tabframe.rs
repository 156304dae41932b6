/// TabFrame command line
///
/// Loads a delimited text file and prints it, optionally after relabelling,
/// label selection and filtering, or prints statistics for one column.
///
/// Usage:
///   tabframe people.csv --infer-numeric --set-index Nom --where "Age > 20" --head 5
///   tabframe people.csv --infer-numeric --stats Age --json

use clap::Parser;
use std::path::PathBuf;

use tabframe::{CsvOptions, FrameError, RowSelection, Table};

#[derive(Parser, Debug)]
#[command(name = "tabframe")]
#[command(about = "Inspect delimited text files as labelled tables")]
#[command(version)]
struct Args {
    /// File to load; the first non-blank line is the header
    path: PathBuf,

    /// Field separator
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Convert columns whose values all parse as numbers
    #[arg(short = 'n', long)]
    infer_numeric: bool,

    /// Column whose values become the row labels
    #[arg(long, value_name = "COL")]
    set_index: Option<String>,

    /// Keep only rows with these labels
    #[arg(long, value_name = "LABEL", num_args = 1..)]
    loc: Vec<String>,

    /// Filter expression, e.g. "Age >= 18 AND Ville == 'Lyon'"
    #[arg(short, long = "where", value_name = "EXPR")]
    filter: Option<String>,

    /// Print only the first N rows
    #[arg(long, value_name = "N", conflicts_with = "tail")]
    head: Option<usize>,

    /// Print only the last N rows
    #[arg(long, value_name = "N")]
    tail: Option<usize>,

    /// Print statistics for a numeric column instead of the table
    #[arg(long, value_name = "COL")]
    stats: Option<String>,

    /// Print statistics as JSON
    #[arg(long, requires = "stats")]
    json: bool,
}

fn run(args: Args) -> Result<String, FrameError> {
    let options = CsvOptions {
        delimiter: args.delimiter,
        infer_numeric: args.infer_numeric,
    };
    let mut table = Table::from_csv_path(&args.path, &options)?;
    log::info!(
        "loaded {} rows and {} columns from {}",
        table.len(),
        table.column_count(),
        args.path.display()
    );

    if let Some(column) = &args.set_index {
        table.set_index(column)?;
    }
    if !args.loc.is_empty() {
        table = table.loc(&args.loc)?;
    }
    if let Some(expression) = &args.filter {
        table = table.filter_expr(expression)?;
    }

    if let Some(column) = &args.stats {
        let report = table.statistics(column)?;
        return if args.json {
            report.to_json().map(|json| json + "\n")
        } else {
            Ok(report.to_string())
        };
    }

    let selection = match (args.head, args.tail) {
        (Some(n), _) => RowSelection::Head(n),
        (None, Some(n)) => RowSelection::Tail(n),
        (None, None) => RowSelection::All,
    };
    Ok(table.render(selection))
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let args = Args::parse();

    match run(args) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("tabframe: {}", e);
            std::process::exit(1);
        }
    }
}
