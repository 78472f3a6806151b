//! Command-line interface for the wrangler tools.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::checks::{
    check_postcodes, count_street_names, find_non_latin, find_numbered_streets,
    substitute_field_file,
};
use crate::config::{
    DataDir, BAD_POSTCODE, DATABASE_FILE, FIXED_POSTCODE, NON_LATIN_THRESHOLD, ODD_STREET_NAMES,
    OSM_INPUT, OSM_OUTPUT, SIMC_CSV, SIMC_XML, WAYS_TAGS_CORRECTED_CSV, WAYS_TAGS_CSV,
};
use crate::corrections::CorrectionTable;
use crate::db::load_database;
use crate::error::{Result, WranglerError};
use crate::files::open_input;
use crate::osm::{correct_streets_file, verify_streets_file};
use crate::simc::{convert_registry, MissingFieldPolicy};

/// Batch tools for wrangling Warsaw OpenStreetMap data and the SIMC registry.
#[derive(Parser)]
#[command(name = "mapdata-wrangler")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the data files (default: $MAPDATA_DIR or .)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert the SIMC registry XML into a CSV table.
    Registry {
        /// Registry XML (default: SIMC.xml)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// CSV output (default: simc.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit missing fields as empty values instead of failing
        #[arg(long)]
        allow_missing: bool,
    },

    /// Correct known-bad street names in an OSM file.
    Correct {
        /// OSM input (default: w.osm)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// OSM output (default: new_w.osm)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML mapping of stale to corrected names (default: built-in table)
        #[arg(short, long)]
        corrections: Option<PathBuf>,
    },

    /// Check that no stale street names remain in an OSM file.
    Verify {
        /// OSM file (default: new_w.osm)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// YAML mapping of stale to corrected names (default: built-in table)
        #[arg(short, long)]
        corrections: Option<PathBuf>,
    },

    /// List street names that contain digits.
    StreetNumbers {
        /// Tag table (default: ways_tags.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List postcodes outside the Warsaw range or format.
    Postcodes {
        /// Tag table (default: ways_tags.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Replace one postcode value throughout a CSV file.
    FixPostcode {
        /// CSV input (default: ways_tags.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// CSV output (default: ways_tags_corrected.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Value to replace
        #[arg(long, default_value = BAD_POSTCODE)]
        from: String,

        /// Replacement value
        #[arg(long, default_value = FIXED_POSTCODE)]
        to: String,
    },

    /// List frequent values written in non-Latin scripts.
    Scripts {
        /// Tag table (default: ways_tags.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Report values seen more than this many times
        #[arg(short, long, default_value_t = NON_LATIN_THRESHOLD)]
        threshold: u64,
    },

    /// Count occurrences of selected street names.
    CountNames {
        /// Tag table (default: ways_tags.csv)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Street name to count (repeatable; default: the known odd names)
        #[arg(short, long = "name")]
        names: Vec<String>,
    },

    /// Load the CSV extracts into an SQLite database.
    Load {
        /// Database file (default: mydb.db)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let data = DataDir::resolve(cli.data_dir.as_deref());

    match cli.command {
        Commands::Registry {
            input,
            output,
            allow_missing,
        } => registry_command(
            &data.pick(input, SIMC_XML),
            &data.pick(output, SIMC_CSV),
            allow_missing,
        ),
        Commands::Correct {
            input,
            output,
            corrections,
        } => correct_command(
            &data.pick(input, OSM_INPUT),
            &data.pick(output, OSM_OUTPUT),
            corrections.as_deref(),
        ),
        Commands::Verify { input, corrections } => {
            verify_command(&data.pick(input, OSM_OUTPUT), corrections.as_deref())
        }
        Commands::StreetNumbers { input } => {
            street_numbers_command(&data.pick(input, WAYS_TAGS_CSV))
        }
        Commands::Postcodes { input } => postcodes_command(&data.pick(input, WAYS_TAGS_CSV)),
        Commands::FixPostcode {
            input,
            output,
            from,
            to,
        } => fix_postcode_command(
            &data.pick(input, WAYS_TAGS_CSV),
            &data.pick(output, WAYS_TAGS_CORRECTED_CSV),
            &from,
            &to,
        ),
        Commands::Scripts { input, threshold } => {
            scripts_command(&data.pick(input, WAYS_TAGS_CSV), threshold)
        }
        Commands::CountNames { input, names } => {
            count_names_command(&data.pick(input, WAYS_TAGS_CSV), &names)
        }
        Commands::Load { database } => load_command(&data, &data.pick(database, DATABASE_FILE)),
    }
}

/// Steady spinner for passes over large files.
fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run `work` under a spinner, clearing it whatever the outcome.
fn with_spinner<T>(message: String, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let pb = spinner(message);
    let result = work();
    pb.finish_and_clear();
    result
}

fn load_corrections(path: Option<&Path>) -> Result<CorrectionTable> {
    match path {
        Some(path) => CorrectionTable::from_yaml_file(path),
        None => Ok(CorrectionTable::default()),
    }
}

fn registry_command(input: &Path, output: &Path, allow_missing: bool) -> Result<()> {
    let policy = if allow_missing {
        MissingFieldPolicy::Empty
    } else {
        MissingFieldPolicy::Reject
    };

    let rows = with_spinner(format!("Converting {}...", input.display()), || {
        convert_registry(input, output, policy)
    })?;

    println!(
        "{} {} rows to {}",
        style("Wrote").green().bold(),
        style(rows).cyan(),
        output.display()
    );
    Ok(())
}

fn correct_command(input: &Path, output: &Path, corrections: Option<&Path>) -> Result<()> {
    let table = load_corrections(corrections)?;

    let report = with_spinner(format!("Correcting {}...", input.display()), || {
        correct_streets_file(input, output, &table)
    })?;

    for correction in &report.corrections {
        println!(
            "  {} {} {} {}",
            style(&correction.feature).dim(),
            correction.from,
            style("==>").yellow(),
            style(&correction.to).green()
        );
    }
    println!();
    println!("  Features: {}", report.features);
    println!("  Street tags: {}", report.street_tags);
    println!(
        "  Corrections: {}",
        style(report.corrections.len()).cyan().bold()
    );
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output.display()
    );
    Ok(())
}

fn verify_command(input: &Path, corrections: Option<&Path>) -> Result<()> {
    let table = load_corrections(corrections)?;

    let report = with_spinner(format!("Verifying {}...", input.display()), || {
        verify_streets_file(input, &table)
    })?;

    if report.is_clean() {
        println!(
            "{} no stale street names among {} street tags",
            style("OK:").green().bold(),
            report.street_tags
        );
        return Ok(());
    }

    for stale in &report.stale {
        println!("  {} {}", style(&stale.feature).dim(), style(&stale.value).red());
    }
    Err(WranglerError::StaleStreetNames(report.stale.len()))
}

fn street_numbers_command(input: &Path) -> Result<()> {
    let streets = find_numbered_streets(open_input(input)?)?;

    for street in &streets {
        println!("{street}");
    }
    eprintln!(
        "{} street names with digits",
        style(streets.len()).cyan().bold()
    );
    Ok(())
}

fn postcodes_command(input: &Path) -> Result<()> {
    let report = check_postcodes(open_input(input)?)?;

    println!("{}", style("Not starting with 0:").bold());
    for code in &report.deviant_prefix {
        println!("  {code}");
    }
    println!("{}", style("Not in NN-NNN format:").bold());
    for code in &report.malformed {
        println!("  {code}");
    }
    Ok(())
}

fn fix_postcode_command(input: &Path, output: &Path, from: &str, to: &str) -> Result<()> {
    let replaced = substitute_field_file(input, output, from, to)?;

    println!(
        "{} {} occurrence(s) of {} with {}",
        style("Replaced").green().bold(),
        style(replaced).cyan(),
        from,
        to
    );
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        output.display()
    );
    Ok(())
}

fn scripts_command(input: &Path, threshold: u64) -> Result<()> {
    let report = find_non_latin(open_input(input)?, threshold)?;

    for (value, count) in &report.frequent {
        println!("{value}: {count}");
    }
    eprintln!(
        "{} distinct non-Latin values, {} seen more than {threshold} times",
        style(report.distinct).cyan(),
        style(report.frequent.len()).cyan().bold()
    );
    Ok(())
}

fn count_names_command(input: &Path, names: &[String]) -> Result<()> {
    let counts = if names.is_empty() {
        count_street_names(open_input(input)?, ODD_STREET_NAMES)?
    } else {
        count_street_names(open_input(input)?, names)?
    };

    for (name, count) in &counts.counts {
        println!("{name}: {count}");
    }
    Ok(())
}

fn load_command(data: &DataDir, database: &Path) -> Result<()> {
    let report = with_spinner(format!("Loading {}...", database.display()), || {
        load_database(database, data)
    })?;

    for (table, rows) in &report.tables {
        println!("  {}: {}", style(table).bold(), rows);
    }
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        database.display()
    );
    Ok(())
}
