//! RO-Crate / LDAC Validation CLI
//!
//! Command-line tool for validating RO-Crate documents against the LDAC
//! profile and exporting them with an HTML preview.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ldac_validate::structure::graph_of;
use ldac_validate::{
    export_crate, load_document, write_crate, AliasResolver, CrateSource, LanguageTracker,
    ProfileIndex, ValidateError, ValidationResult, Validator, ValidatorOptions,
};

#[derive(Parser)]
#[command(name = "ldac-validate")]
#[command(about = "Validate RO-Crate metadata against RO-Crate 1.2 and the LDAC profile")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a crate and print its errors and warnings
    Validate(ValidateArgs),
    /// Validate a crate, then write its metadata and preview into a directory
    Export(ExportArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Path to ro-crate-metadata.json, an RO-Crate directory, a zip archive, or URL
    source: String,

    /// Profile document to validate against (default: embedded LDAC profile)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Path to ro-crate-metadata.json, an RO-Crate directory, a zip archive, or URL
    source: String,

    /// Project directory to write into
    #[arg(short, long)]
    out: PathBuf,

    /// Profile document to validate against (default: embedded LDAC profile)
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Write even if validation fails
    #[arg(long)]
    force: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_validator(profile: Option<&Path>) -> Result<Validator, ValidateError> {
    let Some(path) = profile else {
        return Validator::ldac();
    };
    let content = fs::read_to_string(path).map_err(|e| ValidateError::LoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let resolver = Arc::new(AliasResolver::new());
    let index = Arc::new(ProfileIndex::from_json(&content, &resolver)?);
    eprintln!(
        "Loaded profile {} ({} classes)",
        path.display(),
        index.class_names().len()
    );
    Ok(Validator::new(resolver, index, ValidatorOptions::default()))
}

fn load(source: &str) -> Result<serde_json::Value, ValidateError> {
    let source = CrateSource::detect(source)?;
    if let CrateSource::Url(url) = &source {
        eprintln!("Loading from URL: {}", url);
    }
    load_document(&source)
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{} ({}):", title, items.len());
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }
}

fn print_report(result: &ValidationResult) {
    print_list("Errors", &result.errors);
    print_list("Warnings", &result.warnings);
    if result.is_valid {
        println!("RO-Crate is valid");
    } else {
        println!("RO-Crate is invalid");
    }
}

fn run_validate(args: ValidateArgs) -> Result<bool, ValidateError> {
    let validator = build_validator(args.profile.as_deref())?;
    let document = load(&args.source)?;
    let result = validator.validate(&document);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result);
    }
    Ok(result.is_valid)
}

fn run_export(args: ExportArgs) -> Result<bool, ValidateError> {
    let validator = build_validator(args.profile.as_deref())?;
    let document = load(&args.source)?;
    let tracker =
        LanguageTracker::from_graph(graph_of(&document).unwrap_or(&[]), validator.resolver());

    if args.force {
        let result = validator.validate_with_tracker(&document, &tracker);
        print_report(&result);
        if !result.is_valid {
            eprintln!("Writing despite {} validation errors", result.errors.len());
        }
        let written = write_crate(&args.out, &document)?;
        eprintln!("Wrote {}", written.metadata.display());
        return Ok(result.is_valid);
    }

    let written = export_crate(&args.out, &document, &validator, &tracker)?;
    eprintln!(
        "Wrote {} and {}",
        written.metadata.display(),
        written.preview.display()
    );
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Export(args) => run_export(args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
