use anyhow::{Context, Result};
use cli::{Cli, Commands, RenderArgs};
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use source::Source;
use std::path::Path;
use std::process::ExitCode;

mod cli;
mod config;
mod sinks {
    mod pdf;
    pub use pdf::{RenderStats, PDF};
}
mod source;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        println!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Config(args) => config::run(args),
        Commands::Render(args) => render(args),
    }
}

fn render(args: &RenderArgs) -> Result<()> {
    println!("Loading configuration...");
    let config = Configuration::resolve(args)?;

    let source = Source::discover(&config.directory_path)
        .with_context(|| "Failed to discover reports")?;
    if source.is_empty() {
        log::warn!("No .txt reports found in {}", source.root.display());
    } else {
        log::debug!(
            "Found {} reports in {}",
            source.len(),
            source.root.display()
        );
    }

    let progress = ProgressBar::new(source.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .with_context(|| "Failed to parse progress style")?
            .progress_chars("#>-"),
    );
    progress.set_message("Rendering PDF...");

    let stats = config
        .pdf
        .render(
            &source,
            &config.output_pdf,
            config.add_line_numbers,
            &progress,
        )
        .with_context(|| "Failed to render PDF")?;

    println!();
    print_summary(&config.output_pdf, &stats);

    Ok(())
}

fn print_summary(outfile: &Path, stats: &sinks::RenderStats) {
    let size = std::fs::metadata(outfile)
        .ok()
        .and_then(|metadata| byte_unit::Byte::from_u128(metadata.len() as u128))
        .map(|size| {
            size.get_appropriate_unit(byte_unit::UnitType::Binary)
                .to_string()
        });

    match size {
        Some(size) => println!("PDF successfully created: {} ({size})", outfile.display()),
        None => println!("PDF successfully created: {}", outfile.display()),
    }
    println!("  Pages:            {}", stats.page_count);
    println!("  Combined files:   {}", stats.file_count);
    if stats.unreadable_files > 0 {
        println!(
            "  {}",
            console::style(format!(
                "Unreadable files: {} (rendered as error lines)",
                stats.unreadable_files
            ))
            .yellow()
        );
    }
    println!(
        "Bookmarks added for each file ({} outline entries)",
        stats.bookmark_count
    );
}
