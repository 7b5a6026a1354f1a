use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use gacetas_lib::config::{self, ElasticConfig};
use gacetas_lib::pipeline::export::BatchSummary;
use gacetas_lib::pipeline::extraction::{
    ChainConverter, CleaningProfile, DocumentConverter, OcrArtifactCleaner,
};
use gacetas_lib::pipeline::import::parse_gazette_filename;
use gacetas_lib::pipeline::indexing::{load_records, DocumentIndex, ElasticsearchClient};
use gacetas_lib::pipeline::processor::build_processor;

#[derive(Parser)]
#[command(author, version, about = "Gaceta del Congreso text pipeline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identity encoded in gazette filenames
    Parse {
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// Print the cleaned text of one document
    Clean {
        file: PathBuf,
        #[arg(long, help = "JSON cleaning profile (defaults to the built-in gazette table)")]
        profile: Option<PathBuf>,
    },
    /// Convert a folder (or one file) to JSON records plus a batch summary
    Process {
        input: PathBuf,
        #[arg(short, long, help = "Output folder (defaults to the input folder)")]
        output: Option<PathBuf>,
        #[arg(long, help = "Remove OCR artifacts and boilerplate before export")]
        clean: bool,
        #[arg(long, requires = "clean")]
        profile: Option<PathBuf>,
    },
    /// Bulk-load exported records into the search index
    Index {
        dir: PathBuf,
        #[arg(short, long, help = "Target index (defaults to ELASTIC_INDEX_DEFAULT)")]
        index: Option<String>,
    },
}

fn main() {
    gacetas_lib::init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Parse { filenames } => {
            parse_names(filenames);
            Ok(())
        }
        Commands::Clean { file, profile } => clean_file(file, profile.as_deref()),
        Commands::Process {
            input,
            output,
            clean,
            profile,
        } => process_input(input, output.as_deref(), *clean, profile.as_deref()),
        Commands::Index { dir, index } => index_records(dir, index.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn parse_names(filenames: &[String]) {
    for name in filenames {
        match parse_gazette_filename(name) {
            Some(identity) => match serde_json::to_string(&identity) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::warn!(file = %name, error = %e, "Identity not printable"),
            },
            None => tracing::warn!(file = %name, "Filename does not follow the naming scheme"),
        }
    }
}

fn clean_file(file: &Path, profile: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let profile = match profile {
        Some(path) => CleaningProfile::load(path)?,
        None => CleaningProfile::gazette(),
    };
    let cleaner = OcrArtifactCleaner::new(profile)?;
    let converted = ChainConverter::standard().convert(file)?;
    println!("{}", cleaner.clean(&converted.text));
    Ok(())
}

fn process_input(
    input: &Path,
    output: Option<&Path>,
    clean: bool,
    profile: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let processor = build_processor(clean, profile)?;

    if input.is_file() {
        let output_dir = output
            .or_else(|| input.parent())
            .unwrap_or_else(|| Path::new("."));
        match processor.process_file(input, output_dir) {
            Ok(done) => println!("{}", done.json_path.display()),
            Err(e) => tracing::warn!(file = %input.display(), error = %e, "Gazette failed"),
        }
        return Ok(());
    }

    let summary = processor.process_folder(input, output)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!("Exitosos: {}/{}", summary.succeeded, summary.total_files);
    println!("Con errores: {}/{}", summary.failed, summary.total_files);
    let summary_path = Path::new(&summary.output_dir).join(config::SUMMARY_FILE_NAME);
    println!("Resumen: {}", summary_path.display());
}

fn index_records(dir: &Path, index: Option<&str>) -> Result<(), Box<dyn Error>> {
    let settings = ElasticConfig::from_env()?;
    let index = index.unwrap_or(settings.default_index.as_str()).to_string();
    let client = ElasticsearchClient::new(&settings)?;

    let loaded = load_records(dir)?;
    tracing::info!(
        records = loaded.records.len(),
        skipped = loaded.skipped.len(),
        index = %index,
        "Records loaded"
    );

    let outcome = client.index_bulk(&index, &loaded.records)?;
    client.refresh(&index)?;

    for error in &outcome.errors {
        tracing::warn!(error = %error, "Document rejected");
    }
    println!("Indexados: {}", outcome.indexed);
    println!("Fallidos: {}", outcome.failed + loaded.skipped.len());
    Ok(())
}
