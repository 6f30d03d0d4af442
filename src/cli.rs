use anyhow::anyhow;
use chrono::Datelike;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = env!("VERGEN_GIT_DESCRIBE");
    if git_describe.is_empty() || git_describe == "VERGEN_IDEMPOTENT_OUTPUT" {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug)]
#[command(name="snpx",
          version=&**FULL_VERSION,
          about="SNP evidence extraction from variant call files",
          long_about = None,
          after_help = format!("Copyright (C) {}
          This program comes with ABSOLUTELY NO WARRANTY; it is intended for
          Research Use Only and not for use in diagnostic procedures.", chrono::Utc::now().year()),
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Extract(ExtractArgs),
    Info(InfoArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Extract(_) => "extract",
            Command::Info(_) => "info",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct ExtractArgs {
    /// Variant call file (VCF or BCF) to extract SNPs from
    #[arg(
        long = "vcf",
        value_name = "VCF",
        value_parser = check_file_exists
    )]
    pub vcf: PathBuf,

    /// Sample to extract [default: first sample in the header]
    #[arg(short = 's', long = "sample", value_name = "SAMPLE")]
    pub sample: Option<String>,

    /// Process only the specified chromosomes (comma-separated list), e.g., (chr1,chr2,chrX); requires an indexed file
    #[arg(
        long = "chrom",
        value_name = "CHROM",
        value_delimiter = ',',
        help_heading = "Advanced"
    )]
    pub chromosomes: Option<Vec<String>>,

    /// Write output to a file [default: standard output]; a .gz suffix enables compression
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<String>,
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct InfoArgs {
    /// Variant call file (VCF or BCF) to inspect
    #[arg(
        long = "vcf",
        value_name = "VCF",
        value_parser = check_file_exists
    )]
    pub vcf: PathBuf,
}

/// Initializes the verbosity level for logging based on the command-line arguments.
pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

/// Checks if the provided file path exists.
fn check_file_exists(s: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn check_prefix_path(s: &str) -> anyhow::Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(anyhow!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}
