use clap::{Parser, Subcommand};
use histoframe::{
    logger::{self, LogLevel, LoggerConfig},
    validate_image_file, GeneratorConfig, ImageGenerator, ImageSize, Scenario, SourceImage,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "histoframe", about = "Generate historical portrait composites with Doubao SeedDream")]
struct Cli {
    /// Simulate the remote service instead of calling it.
    #[arg(long, global = true)]
    mock: bool,

    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Generate {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "default")]
        scenario: String,
        #[arg(long)]
        size: Option<ImageSize>,
        #[arg(long)]
        no_watermark: bool,
    },
    Status,
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    Lookup {
        result_id: String,
    },
    Models,
    Presets,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Info };
    logger::init_with_config(LoggerConfig::new().with_level(level))?;

    if dotenv_loaded {
        log::info!(".env file loaded");
    } else {
        log::warn!("No .env file found, using process environment");
    }

    let mut config = GeneratorConfig::from_env();
    if cli.mock {
        config = config.with_mock_mode(true);
    }
    logger::log_config_summary(&config);

    match cli.command {
        Command::Models => {
            println!("{}", serde_json::to_string_pretty(&ImageGenerator::supported_models())?);
            println!("{}", serde_json::to_string_pretty(&ImageGenerator::supported_sizes())?);
            return Ok(());
        }
        Command::Presets => {
            for scenario in Scenario::ALL {
                println!(
                    "{:<13} {}",
                    scenario.as_str(),
                    serde_json::to_string(&scenario.options())?
                );
            }
            return Ok(());
        }
        _ => {}
    }

    let generator = ImageGenerator::new(&config)?;
    let retry = generator.retry_policy();
    log::debug!(
        "Retry hints for callers: {} attempts, {}ms apart",
        retry.max_retries,
        retry.retry_delay.as_millis()
    );

    match cli.command {
        Command::Generate {
            image,
            prompt,
            scenario,
            size,
            no_watermark,
        } => {
            let source = SourceImage::from_path(&image).await?;
            let validation = validate_image_file(&source);
            if !validation.valid {
                for error in &validation.errors {
                    log::error!("{}: {}", image.display(), error);
                }
                return Err(format!("{} failed validation", image.display()).into());
            }

            let mut options = generator.recommended_params(&scenario);
            if let Some(size) = size {
                options = options.with_size(size);
            }
            if no_watermark {
                options = options.with_watermark(false);
            }

            let result = generator.generate(&source, &prompt, options).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Status => {
            let status = generator.check_status().await;
            println!("{}", serde_json::to_string_pretty(&status)?);
            if !status.is_ok() {
                return Err(format!("{} is unavailable: {}", status.provider, status.message).into());
            }
        }
        Command::History { limit } => {
            let records = generator.history(limit).await;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Lookup { result_id } => match generator.result_by_id(&result_id).await {
            Some(url) => println!("{}", url),
            None => println!("not found"),
        },
        Command::Models | Command::Presets => {}
    }

    Ok(())
}
