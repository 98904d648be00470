//! CLI module for Autodiag
//!
//! - `serve`: start the HTTP server (default)
//! - `diagnose`: run a single diagnosis and print the response envelope

use crate::api::{run_diagnosis, DiagnoseResponse, DiagnoseState};
use crate::server::config::Pipeline;
use anyhow::Context;
use autodiag_core::DiagnosticRequest;
use clap::{Args, Parser, Subcommand};

/// Autodiag CLI
#[derive(Parser, Debug)]
#[command(name = "autodiag")]
#[command(about = "Vehicle diagnostic assistant")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Serve,
    /// Run one diagnosis and print the JSON response
    Diagnose(DiagnoseArgs),
}

#[derive(Args, Debug, Default)]
pub struct DiagnoseArgs {
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub part: Option<String>,
    /// OBD-II trouble code
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// openai | anthropic
    #[arg(long)]
    pub provider: Option<String>,
    /// Provider model name
    #[arg(long)]
    pub model_name: Option<String>,
    /// Use the plain-text pipeline with parts and video links
    #[arg(long)]
    pub enrich: bool,
}

impl From<DiagnoseArgs> for DiagnosticRequest {
    fn from(args: DiagnoseArgs) -> Self {
        Self {
            year: args.year,
            make: args.make,
            model: args.model,
            part: args.part,
            code: args.code,
            notes: args.notes,
            provider: args.provider,
            model_name: args.model_name,
        }
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Serve) | None => crate::server::run().await,
        Some(Commands::Diagnose(args)) => diagnose(args).await,
    }
}

async fn diagnose(args: DiagnoseArgs) -> anyhow::Result<()> {
    let mut config = crate::server::load_config().context("Failed to load configuration")?;
    if args.enrich {
        config.pipeline = Pipeline::Enriched;
    }

    let state = DiagnoseState::from_config(&config)?;
    let request = DiagnosticRequest::from(args);

    let (response, failed) = match run_diagnosis(&state, &request).await {
        Ok(diagnosis) => (DiagnoseResponse::success(diagnosis), false),
        Err(e) => (DiagnoseResponse::error(e.to_string()), true),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);

    if failed {
        anyhow::bail!("diagnosis failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diagnose_args() {
        let cli = Cli::try_parse_from([
            "autodiag",
            "diagnose",
            "--year",
            "2012",
            "--code",
            "P0301",
            "--model-name",
            "gpt-4o",
            "--enrich",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Diagnose(args)) => {
                assert!(args.enrich);
                let request = DiagnosticRequest::from(args);
                assert_eq!(request.year.as_deref(), Some("2012"));
                assert_eq!(request.code.as_deref(), Some("P0301"));
                assert_eq!(request.model_name(), Some("gpt-4o"));
                assert!(request.make.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["autodiag"]).unwrap();
        assert!(cli.command.is_none());
    }
}
