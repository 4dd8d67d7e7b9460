//! pdfharvest CLI - extract PDF page text and images

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfharvest::{ConvertOptions, DocumentConverter, ErrorMode, PageSelection, SourceDocument};

#[derive(Parser, Debug)]
#[command(name = "pdfharvest")]
#[command(version)]
#[command(about = "Extract PDF page text and images into a JSON manifest", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    output: PathBuf,

    /// Page range (e.g., "1-10", "1,3,5-7")
    #[arg(long)]
    pages: Option<String>,

    /// Abort when a page's text or images cannot be read
    #[arg(long)]
    strict: bool,

    /// Write the manifest for completed pages if the run fails
    #[arg(long)]
    partial: bool,

    /// No progress bar or summary
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Info { input }) => cmd_info(input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => match &cli.input {
            Some(input) => cmd_convert(input, &cli),
            None => {
                println!("{}", "Usage: pdfharvest [OPTIONS] <FILE>".yellow());
                println!("       pdfharvest --help for more information");
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(cli: &Cli) -> pdfharvest::Result<ConvertOptions> {
    let pages = match cli.pages.as_deref() {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    };

    let error_mode = if cli.strict {
        ErrorMode::Strict
    } else {
        ErrorMode::Lenient
    };
    Ok(ConvertOptions::new()
        .with_pages(pages)
        .with_error_mode(error_mode)
        .with_partial_manifest(cli.partial))
}

fn cmd_convert(input: &Path, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli)?;
    let mut converter = DocumentConverter::with_options(options);

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("Opening PDF...");
        pb
    };

    let result = converter.convert_with_progress(input, &cli.output, |progress| {
        pb.set_length(progress.total as u64);
        pb.set_position(progress.done as u64);
        pb.set_message(format!("page {}", progress.page));
    });

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };
    pb.finish_with_message("Done!");

    if cli.quiet {
        return Ok(());
    }

    println!("\n{}", "Output files:".green().bold());
    println!(
        "  {} {} ({} pages)",
        "├─".dimmed(),
        report.manifest_path.display(),
        report.manifest.len()
    );
    println!(
        "  {} {} images in {}",
        "└─".dimmed(),
        report.images_written,
        cli.output.display()
    );

    if !report.failures.is_empty() {
        println!(
            "\n{} {} images skipped",
            "Warning:".yellow().bold(),
            report.failures.len()
        );
        for failure in &report.failures {
            println!("  {} {}", "-".dimmed(), failure);
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = SourceDocument::open(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), doc.version());
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if doc.is_encrypted() { "Yes" } else { "No" }
    );
    println!("{}: {}", "Images".bold(), doc.image_count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfharvest".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF text and image extraction tool");
}
