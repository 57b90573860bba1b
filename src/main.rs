use std::path::{Path, PathBuf};
use txtsift::cli::{Cli, Commands, ConfigAction};
use txtsift::config::Config;
use txtsift::coordinator::{self, ProcessingCoordinator};
use txtsift::error::{Result, TxtsiftError};
use txtsift::filtering::{FilterPipeline, Stage};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Process {
            input,
            output,
            stages,
            preset,
            format,
            health_threshold,
            completeness_threshold,
            quality_threshold,
            no_statistics,
        } => {
            let mut config = load_config(cli.config, preset)?;
            if let Some(v) = health_threshold {
                config.filters.health_threshold = v;
            }
            if let Some(v) = completeness_threshold {
                config.filters.completeness_threshold = v;
            }
            if let Some(v) = quality_threshold {
                config.filters.quality_threshold = v;
            }
            if let Some(format) = format {
                config.output.format = format.parse()?;
            }
            if no_statistics {
                config.output.include_statistics = false;
            }
            let stages = stages.map(|s| Stage::parse_list(&s)).transpose()?;

            cmd_process(&config, &input, output.as_deref(), stages)?;
        }
        Commands::Stages => {
            cmd_stages();
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "txtsift=debug" } else { "txtsift=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_process(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    stages: Option<Vec<Stage>>,
) -> Result<()> {
    let mut coordinator = ProcessingCoordinator::from_config(config)?;
    if let Some(stages) = stages {
        coordinator = coordinator.with_stages(stages);
    }

    let report = coordinator.pipeline().validate_configuration();
    for warning in &report.warnings {
        tracing::debug!("{}: {}", warning.path, warning.message);
    }
    if !report.is_valid() {
        return Err(TxtsiftError::ConfigValidation {
            errors: report.errors,
        });
    }

    let format = config.output.format;
    let include_statistics = config.output.include_statistics;
    if let Some(path) = output.filter(|p| !format.accepts_extension(p)) {
        tracing::warn!(
            "Output file {:?} does not have a .{} extension for {} output",
            path,
            format.extension(),
            format
        );
    }

    let rendered = if input.is_dir() {
        let report = coordinator.process_directory(input)?;
        if !report.failures.is_empty() {
            eprintln!("⚠ {} file(s) could not be processed", report.failures.len());
        }
        coordinator::render_directory(&report, format, include_statistics)?
    } else {
        let report = coordinator.process_file(input)?;
        coordinator::render(&report, format, include_statistics)?
    };

    coordinator::write_output(&rendered, output)?;

    let stats = coordinator.stats();
    if output.is_some() {
        println!(
            "✓ Kept {} of {} sentences",
            stats.total_output_sentences, stats.total_input_sentences
        );
    }

    Ok(())
}

fn cmd_stages() {
    println!("Filtering stages (run in this order):\n");
    for (stage, description) in FilterPipeline::stage_descriptions() {
        println!("  {}. {:<13} {}", stage.number(), stage.name(), description);
    }
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, None)?;
            let content = toml::to_string_pretty(&config)?;
            println!("{}", content);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);

            // Same pipeline `process` would run, lexicon and language model included
            let coordinator = ProcessingCoordinator::from_config(&config)?;
            let report = coordinator.pipeline().validate_configuration();
            for warning in &report.warnings {
                println!("  ⚠ {}: {}", warning.path, warning.message);
            }
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            let config = Config::default();
            config.save(&path)?;

            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let mut config = Config::load_or_default(config_path.as_deref())?;

    if let Some(profile) = profile {
        config.apply_profile(&profile)?;
    }
    Ok(config)
}
