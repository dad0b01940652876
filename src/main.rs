mod logging;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use panelgraph::{enumerate, runtime, DataTable, VisualSettings};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "panelgraph")]
#[command(about = "Turn a grouped measure table into a multi-panel chart specification", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the chart specification and print it as JSON
    Build {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List editable property instances for one settings object
    Enumerate {
        /// Object name (legend, axis, tooltip, dataPoint, staticPanel, panel, xAxis, series)
        object: String,

        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Table file; read from stdin when omitted
    #[arg(long)]
    table: Option<PathBuf>,

    /// Table encoding
    #[arg(long, value_enum, default_value_t = InputFormat::Json)]
    input: InputFormat,

    /// Settings JSON file; defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum InputFormat {
    Json,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Build { input, pretty } => {
            let (table, settings) = load_inputs(&input)?;
            let spec = runtime::build_chart(&table, &settings).context("Failed to build chart")?;

            // Nothing to render still prints valid JSON
            let json = match (spec, pretty) {
                (Some(spec), true) => serde_json::to_string_pretty(&spec)?,
                (Some(spec), false) => serde_json::to_string(&spec)?,
                (None, _) => "null".to_string(),
            };
            write_stdout(&json)
        }
        Command::Enumerate { object, input } => {
            let (table, settings) = load_inputs(&input)?;
            let instances = enumerate::enumerate_objects(&object, &settings, &table)
                .context("Failed to enumerate objects")?;
            write_stdout(&serde_json::to_string_pretty(&instances)?)
        }
    }
}

fn load_inputs(args: &InputArgs) -> Result<(DataTable, VisualSettings)> {
    let reader: Box<dyn Read> = match &args.table {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open table {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let table = match args.input {
        InputFormat::Json => DataTable::from_json_reader(reader),
        InputFormat::Csv => DataTable::from_csv_reader(reader),
    }
    .context("Failed to read table")?;

    let settings = match &args.settings {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open settings {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file)).context("Failed to parse settings")?
        }
        None => VisualSettings::default(),
    };

    Ok((table, settings))
}

fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    handle.write_all(b"\n").context("Failed to write to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
