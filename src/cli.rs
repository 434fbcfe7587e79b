use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a report-book.toml config file with the default settings
    Config(ConfigArgs),
    /// Combines the text reports in a directory into a single bookmarked PDF
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Where to write the config file
    #[clap(long, default_value = DEFAULT_CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite the config file if it already exists
    #[clap(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory containing the .txt reports [default: current directory]
    pub directory: Option<PathBuf>,

    /// Output PDF path
    #[clap(short, long, env = "REPORT_BOOK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Prefix every printed line with its line number
    #[clap(short = 'n', long)]
    pub line_numbers: bool,

    /// Config file to load instead of ./report-book.toml
    #[clap(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log what is being done in more detail
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_flags() {
        let cli = Cli::try_parse_from([
            "report-book",
            "-v",
            "render",
            "reports",
            "-n",
            "-o",
            "out.pdf",
        ])
        .expect("can parse render");
        assert!(cli.verbose);
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.directory, Some(PathBuf::from("reports")));
                assert_eq!(args.output, Some(PathBuf::from("out.pdf")));
                assert!(args.line_numbers);
                assert!(args.config.is_none());
            }
            other => panic!("expected render, got {other:?}"),
        }
    }
}
