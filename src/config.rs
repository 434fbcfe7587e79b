//! Configuration for a report-book run.
//!
//! Settings come from an optional `report-book.toml` and are then overridden by
//! whatever was given on the command line. Every key in the file is optional.

use crate::cli::{ConfigArgs, RenderArgs};
use crate::sinks::PDF;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "report-book.toml";

/// Complete configuration for a report-book run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Configuration {
    /// Directory whose `.txt` files are combined
    #[serde(default = "default_directory_path")]
    pub directory_path: PathBuf,
    /// Where the finished PDF is written
    #[serde(default = "default_output_pdf")]
    pub output_pdf: PathBuf,
    /// Prefix every printed line with its line number
    #[serde(default)]
    pub add_line_numbers: bool,
    #[serde(default)]
    pub pdf: PDF,
}

fn default_directory_path() -> PathBuf {
    PathBuf::from(".")
}
fn default_output_pdf() -> PathBuf {
    PathBuf::from("team3_m5_coverage_reports.pdf")
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            directory_path: default_directory_path(),
            output_pdf: default_output_pdf(),
            add_line_numbers: false,
            pdf: PDF::default(),
        }
    }
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))
    }

    /// Build the configuration for `render`: the explicit config file if one was
    /// given, else `report-book.toml` if it exists, else defaults; then apply the
    /// command line on top.
    pub fn resolve(args: &RenderArgs) -> Result<Configuration> {
        let mut config = match &args.config {
            Some(path) => Configuration::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Configuration::load(DEFAULT_CONFIG_FILE)?
            }
            None => Configuration::default(),
        };
        config.apply(args);
        Ok(config)
    }

    /// Override settings with those given on the command line.
    pub fn apply(&mut self, args: &RenderArgs) {
        if let Some(directory) = &args.directory {
            self.directory_path = directory.clone();
        }
        if let Some(output) = &args.output {
            self.output_pdf = output.clone();
        }
        if args.line_numbers {
            self.add_line_numbers = true;
        }
    }
}

/// Write a default configuration file.
pub fn run(args: &ConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists, pass --force to overwrite it",
            args.path.display()
        ));
    }

    let contents = toml::to_string_pretty(&Configuration::default())
        .with_context(|| "Failed to serialize configuration")?;
    std::fs::write(&args.path, contents)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;
    println!("Wrote {}", args.path.display());

    Ok(())
}
