//! ats-match: LLM-powered ATS analysis of a resume against a job description

use ats_match::cli::{self, Cli, Commands, ConfigAction};
use ats_match::config::{Config, OutputFormat};
use ats_match::error::{AtsMatchError, Result};
use ats_match::input::{FileType, InputManager};
use ats_match::llm::{AtsAnalyzer, MatchRequest, ModelCatalog};
use ats_match::output::{save_report_to_file, suggest_filename, AnalysisReport, ReportGenerator, ReportMetadata};
use ats_match::session::AnalysisOutcome;
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            llm,
            output,
            save,
        } => {
            cli::validate_file_extension(&resume, FileType::supported_extensions())
                .map_err(|e| AtsMatchError::InvalidInput(format!("Resume file: {}", e)))?;
            let format = resolve_format(output.as_deref(), &config)?;

            let job_description = match (job_text, job) {
                (Some(text), _) => text,
                (None, Some(path)) => read_job_description(&path).await?,
                (None, None) => String::new(),
            };

            let catalog = ModelCatalog::new();
            let model_name = match &llm {
                Some(id) => catalog.require(id)?.display_name.clone(),
                None => catalog.resolve(&config.llm.default_model).display_name.clone(),
            };
            let model = llm.unwrap_or_else(|| config.llm.default_model.clone());
            let request = MatchRequest::new(resume.clone(), job_description, model);

            info!("Analyzing {} with {}", resume.display(), model_name);
            let mut analyzer = AtsAnalyzer::new(&config)?;
            let outcome = analyzer.analyze(&request).await?;

            let metadata = ReportMetadata::new(Some(resume.display().to_string()), Some(model_name));
            let resume_name = resume.to_string_lossy().into_owned();
            emit(&outcome, metadata, &config, &format, save.as_deref(), &resume_name)
        }

        Commands::Parse {
            analysis,
            improved,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let reply = tokio::fs::read_to_string(&analysis).await?;

            let outcome = match improved {
                Some(path) => {
                    let resume_text = tokio::fs::read_to_string(&path).await?;
                    AnalysisOutcome::from_parts(&reply, &resume_text)
                }
                None => AnalysisOutcome::from_reply(&reply),
            };

            let metadata = ReportMetadata::new(None, None);
            let name = analysis.to_string_lossy().into_owned();
            emit(&outcome, metadata, &config, &format, save.as_deref(), &name)
        }

        Commands::Models => {
            let catalog = ModelCatalog::new();
            println!("Available models (default: {}):", config.llm.default_model);
            for model in catalog.list() {
                println!("  {:<24} {:<26} {}", model.id, model.display_name, model.slug);
            }
            Ok(())
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config)
                        .map_err(|e| AtsMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;
                    println!("{}", content);
                }
                ConfigAction::Reset => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset: {}", path.display());
                }
                ConfigAction::Path => println!("{}", path.display()),
            }
            Ok(())
        }
    }
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(AtsMatchError::InvalidInput),
        None => Ok(config.output.format),
    }
}

async fn read_job_description(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    cli::validate_file_extension(path, FileType::supported_extensions())
        .map_err(|e| AtsMatchError::InvalidInput(format!("Job description file: {}", e)))?;
    InputManager::new().extract_text(path).await
}

fn emit(
    outcome: &AnalysisOutcome,
    metadata: ReportMetadata,
    config: &Config,
    format: &OutputFormat,
    save: Option<&Path>,
    source_name: &str,
) -> Result<()> {
    let report = AnalysisReport::from_outcome(outcome, metadata);
    let content = ReportGenerator::from_config(&config.output).generate_report(&report, format)?;

    match save {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(suggest_filename(format, source_name, true))
            } else {
                path.to_path_buf()
            };
            save_report_to_file(&content, &target)?;
            println!("Report saved to {}", target.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
