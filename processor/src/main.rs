//! sbir-proc CLI - Filter the SBIR.gov award data CSV
//!
//! # Commands
//!
//! ```bash
//! sbir-proc process                         # Prompt for file and ZIP range
//! sbir-proc process awards.csv --min-zip 92021 --max-zip 92129
//! sbir-proc inspect awards.csv              # Show what the loader sees
//! ```
//!
//! Values not given as flags are read from `SBIR_*` environment variables
//! (a `.env` file is honoured) and otherwise prompted for on the console.

use clap::{Args, Parser, Subcommand};
use sbir_proc::config::{
    DEFAULT_PROGRAM, DEFAULT_STATE, ENV_INPUT, ENV_MAX_ZIP, ENV_MIN_ZIP, ENV_OUTPUT,
};
use sbir_proc::logs::{self, log_error, log_info, log_success, LogFormat};
use sbir_proc::transform::pipeline::format_delimiter;
use sbir_proc::{
    load_file, missing_columns, run_pipeline, FilterCriteria, PipelineOptions, ZipRange,
    DEFAULT_OUTPUT,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sbir-proc")]
#[command(about = "Filter SBIR.gov award data by program, state and ZIP range", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prune, filter and export the award data
    Process(ProcessArgs),

    /// Load a CSV and report encoding, delimiter and columns
    Inspect {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,
    },
}

#[derive(Args)]
struct ProcessArgs {
    /// Award data CSV (prompted for if omitted)
    #[arg(env = ENV_INPUT)]
    input: Option<PathBuf>,

    /// Lowest ZIP code to keep (prompted for if omitted)
    #[arg(long, env = ENV_MIN_ZIP)]
    min_zip: Option<String>,

    /// Highest ZIP code to keep (prompted for if omitted)
    #[arg(long, env = ENV_MAX_ZIP)]
    max_zip: Option<String>,

    /// Output file, overwritten if it exists
    #[arg(short, long, env = ENV_OUTPUT, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Program to keep
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    program: String,

    /// State to keep
    #[arg(long, default_value = DEFAULT_STATE)]
    state: String,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logs::init(cli.log_format);

    let result = match cli.command {
        Commands::Process(args) => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            cmd_process(args, &mut stdin.lock(), &mut stdout.lock())
        }

        Commands::Inspect { input, delimiter } => cmd_inspect(&input, delimiter),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

/// Run the pipeline, prompting on `console` for whatever `args` leaves out.
/// Prompts and the completion notice go to `out`.
fn cmd_process<R: BufRead, W: Write>(
    args: ProcessArgs,
    console: &mut R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match args.input {
        Some(p) => p,
        None => PathBuf::from(clean_path(&prompt(
            console,
            out,
            "Provide the local filepath to the award_data_no_abstract.csv file : ",
        )?)),
    };
    let min_zip = match args.min_zip {
        Some(z) => z,
        None => prompt(console, out, "Enter the minimum ZIP code to include : ")?,
    };
    let max_zip = match args.max_zip {
        Some(z) => z,
        None => prompt(console, out, "Enter the maximum ZIP code to include : ")?,
    };

    let options = PipelineOptions {
        input,
        output: args.output,
        criteria: FilterCriteria {
            program: args.program,
            state: args.state,
            zip_range: ZipRange::new(min_zip, max_zip),
        },
        delimiter: args.delimiter,
    };

    let report = run_pipeline(&options)?;

    log_info(format!(
        "📊 {} → {} ({}) → {} ({}) → {} (ZIP)",
        report.stats.input_rows,
        report.stats.after_program,
        options.criteria.program,
        report.stats.after_state,
        options.criteria.state,
        report.stats.after_zip,
    ));
    log_success(format!("Output written to: {}", report.output.display()));

    writeln!(out)?;
    writeln!(out, "Output file has been exported")?;
    out.flush()?;
    Ok(())
}

fn cmd_inspect(input: &Path, delimiter: Option<char>) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Inspecting: {}", input.display()));

    let loaded = load_file(input, delimiter)?;

    println!("Encoding: {}", loaded.encoding);
    println!(
        "Delimiter: '{}'{}",
        format_delimiter(loaded.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    println!("Rows: {}", loaded.table.len());
    println!("Columns ({}):", loaded.table.columns().len());
    for (i, col) in loaded.table.columns().iter().enumerate() {
        println!("  [{:2}] {}", i + 1, col);
    }

    let required = PipelineOptions::new(input, ZipRange::new("", "")).required_columns();
    let missing = missing_columns(loaded.table.columns(), &required);
    if missing.is_empty() {
        println!("✅ All required columns present");
    } else {
        println!("❌ Missing required columns: {}", missing.join(", "));
    }

    Ok(())
}

/// Write `message` to `out` and read one line from `console`.
fn prompt<R: BufRead, W: Write>(
    console: &mut R,
    out: &mut W,
    message: &str,
) -> io::Result<String> {
    write!(out, "{}", message)?;
    out.flush()?;

    let mut line = String::new();
    if console.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no console input available",
        ));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Strip whitespace and the quotes Windows adds with "Copy as path".
fn clean_path(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args_without_prompts_answered(output: PathBuf) -> ProcessArgs {
        ProcessArgs {
            input: None,
            min_zip: None,
            max_zip: None,
            output,
            program: DEFAULT_PROGRAM.to_string(),
            state: DEFAULT_STATE.to_string(),
            delimiter: None,
        }
    }

    #[test]
    fn test_clean_path_strips_quotes() {
        assert_eq!(
            clean_path("  \"C:\\Users\\me\\award_data_no_abstract.csv\"\r\n"),
            "C:\\Users\\me\\award_data_no_abstract.csv"
        );
        assert_eq!(clean_path("/tmp/awards.csv"), "/tmp/awards.csv");
    }

    #[test]
    fn test_prompt_reads_one_line() {
        let mut console = io::Cursor::new("92021\r\n92129\n");
        let mut out = Vec::new();
        assert_eq!(prompt(&mut console, &mut out, "Min: ").unwrap(), "92021");
        assert_eq!(prompt(&mut console, &mut out, "Max: ").unwrap(), "92129");
        assert!(prompt(&mut console, &mut out, "").is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "Min: Max: ");
    }

    #[test]
    fn test_process_from_console_answers() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("award_data_no_abstract.csv");
        fs::write(
            &input,
            "Company,Program,Duns,HUBZone Owned,Socially and Economically Disadvantaged,Women Owned,State,Zip\n\
             Acme,SBIR,X,N,N,Y,CA,92128-1234\n\
             Beta,SBIR,Y,N,N,N,CA,92300\n",
        )
        .unwrap();
        let output = dir.path().join("processed.csv");

        let mut console = io::Cursor::new(format!("\"{}\"\n92000\n92200\n", input.display()));
        let mut out = Vec::new();
        let args = args_without_prompts_answered(output.clone());
        cmd_process(args, &mut console, &mut out).unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown
            .starts_with("Provide the local filepath to the award_data_no_abstract.csv file : "));
        assert!(shown.contains("Enter the minimum ZIP code to include : "));
        assert!(shown.contains("Enter the maximum ZIP code to include : "));
        assert!(shown.ends_with("\nOutput file has been exported\n"));

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            ",Company,Program,State,Zip,Zip1,Zip2\n0,Acme,SBIR,CA,92128-1234,92128,1234\n"
        );
    }

    #[test]
    fn test_process_without_console_input_fails() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("processed.csv");
        let mut console = io::Cursor::new("");
        let mut out = Vec::new();

        let args = args_without_prompts_answered(output.clone());
        let result = cmd_process(args, &mut console, &mut out);

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_cli_parses_process_flags() {
        let cli = Cli::try_parse_from([
            "sbir-proc",
            "process",
            "awards.csv",
            "--min-zip",
            "92021",
            "--max-zip",
            "92129",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.input, Some(PathBuf::from("awards.csv")));
                assert_eq!(args.min_zip.as_deref(), Some("92021"));
                assert_eq!(args.program, "SBIR");
                assert_eq!(args.state, "CA");
            }
            Commands::Inspect { .. } => panic!("expected process"),
        }
    }
}
