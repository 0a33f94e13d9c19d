//! CLI interface for the ATS matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-match")]
#[command(version)]
#[command(about = "LLM-powered ATS analysis of a resume against a job description")]
#[command(long_about = "Send a resume and job description to an LLM, parse the reply into scores, matches and \
recommendations, and render the analysis and an improved resume")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume against a job description
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file, or "-" for stdin
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Model id (see `ats-match models`)
        #[arg(short, long)]
        llm: Option<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Parse a saved LLM reply without calling a model
    Parse {
        /// File holding the analysis (or the whole reply)
        #[arg(short, long)]
        analysis: PathBuf,

        /// File holding the improved resume; when absent the reply is split
        #[arg(short, long)]
        improved: Option<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// List selectable models
    Models,

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown, html",
            format
        )),
    }
}

pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if allowed_extensions.contains(&ext.to_lowercase().as_str()) => Ok(()),
        Some(ext) => Err(format!(
            "Unsupported file extension: .{}. Allowed: {}",
            ext,
            allowed_extensions.join(", ")
        )),
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_requires_a_job() {
        assert!(Cli::try_parse_from(["ats-match", "analyze", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from(["ats-match", "analyze", "-r", "cv.pdf", "--job-text", "Backend"]).is_ok());
        assert!(Cli::try_parse_from([
            "ats-match", "analyze", "-r", "cv.pdf", "-j", "job.txt", "--job-text", "Backend"
        ])
        .is_err());
    }

    #[test]
    fn test_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());

        let resume_types = crate::input::FileType::supported_extensions();
        assert!(validate_file_extension(Path::new("cv.docx"), resume_types).is_ok());
        assert!(validate_file_extension(Path::new("cv.doc"), resume_types).is_err());
    }
}
