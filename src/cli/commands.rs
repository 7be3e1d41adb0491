// file: src/cli/commands.rs
// version: 2.0.0
// guid: g7h8i9j0-k1l2-3456-7890-123456ghijkl

//! Command implementations for the CLI

use crate::{
    cli::args::Commands,
    config::{
        resolve_cluster_config, ClusterConfig, ConfigLoader, InternalClusterConfig, Prompter,
        ResolveOptions, StaticAccountLookup, TerminalPrompter,
    },
    error::ClusterConfigError,
    Result, VERSION,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Dispatch a parsed command
pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Defaults { json } => defaults_command(json),
        Commands::Validate { config } => validate_command(&config),
        Commands::Configure {
            config,
            skip_populated_fields,
            no_prompt_instance_type,
            aws_account_id,
            api_version,
            operator_in_cluster,
            output,
            yes,
        } => configure_command(ConfigureRequest {
            config,
            skip_populated_fields,
            prompt_instance_type: !no_prompt_instance_type,
            aws_account_id,
            api_version,
            operator_in_cluster,
            output,
            confirm: !yes,
        }),
    }
}

/// Print file defaults
pub fn defaults_command(json: bool) -> Result<()> {
    let config = ClusterConfig::file_defaults(VERSION)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(())
}

/// Validate a cluster config file
pub fn validate_command(config_path: &Path) -> Result<()> {
    info!("Validating cluster config: {}", config_path.display());

    let loader = ConfigLoader::new();
    let config = loader.load_cluster_config(Some(config_path), VERSION)?;

    info!(
        "Cluster config is valid (cluster {}, region {})",
        config.cluster_name, config.region
    );
    Ok(())
}

/// Options for an interactive configure run
#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    pub config: Option<PathBuf>,
    pub skip_populated_fields: bool,
    pub prompt_instance_type: bool,
    pub aws_account_id: Option<String>,
    pub api_version: String,
    pub operator_in_cluster: bool,
    pub output: Option<PathBuf>,
    pub confirm: bool,
}

/// Resolve a cluster configuration against the terminal
pub fn configure_command(request: ConfigureRequest) -> Result<()> {
    let loader = ConfigLoader::new();
    let document = loader.load_document(request.config.as_ref())?;
    let credentials = loader.resolve_credentials(&document)?;

    let lookup = match request.aws_account_id {
        Some(account_id) => StaticAccountLookup::new(account_id),
        None => StaticAccountLookup::unavailable(),
    };
    let options = ResolveOptions {
        version: VERSION.to_string(),
        skip_populated_fields: request.skip_populated_fields,
        prompt_instance_type: request.prompt_instance_type,
        prompt_defaults: None,
    };

    let mut prompter = TerminalPrompter::stdio();
    let resolved = resolve_cluster_config(&document, &credentials, &options, &mut prompter, &lookup)?;
    let internal = InternalClusterConfig::new(resolved, request.api_version, request.operator_in_cluster);

    println!("\n{}\n", internal);

    if request.confirm {
        confirm(&mut prompter)?;
    }

    if let Some(output) = request.output {
        write_internal_config(&internal, &output)?;
        info!("Wrote cluster configuration to {}", output.display());
    }

    Ok(())
}

fn confirm<P: Prompter + ?Sized>(prompter: &mut P) -> Result<()> {
    let answer = prompter.ask("Is the configuration above correct? (y/n)", Some("y"))?;
    match answer.to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Ok(()),
        _ => Err(ClusterConfigError::config("Configuration rejected by operator")),
    }
}

/// Write an internal config as YAML
pub fn write_internal_config(internal: &InternalClusterConfig, path: &Path) -> Result<()> {
    std::fs::write(path, serde_yaml::to_string(internal)?)?;
    Ok(())
}
