use clap::Parser;
use pollinate::logger::{self, LogLevel, LoggerConfig};
use pollinate::{
    parse_dimension, ClientConfig, GenerationController, GenerationParameters, ImageModel,
    LogNotifier, PollinationsClient, SubmitOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "pollinate", version, about = "Generate an image with Pollinations and save it locally")]
struct Cli {
    /// Text description of the image
    #[arg(default_value = "")]
    prompt: String,

    #[arg(short, long, value_enum, default_value_t = ImageModel::Flux)]
    model: ImageModel,

    /// Width in pixels (256-2048, step 64)
    #[arg(long, default_value = "1024")]
    width: String,

    /// Height in pixels (256-2048, step 64)
    #[arg(long, default_value = "1024")]
    height: String,

    /// Let the service rewrite the prompt
    #[arg(long)]
    enhance: bool,

    /// Transparent background (gptimage only)
    #[arg(long)]
    transparent: bool,

    /// API key, overrides POLLINATIONS_API_KEY
    #[arg(long)]
    key: Option<String>,

    /// Directory the image is saved to, overrides POLLINATIONS_OUTPUT_DIR
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the request URL and exit
    #[arg(long)]
    dry_run: bool,

    #[arg(long)]
    list_models: bool,

    #[arg(long)]
    json_logs: bool,

    #[arg(long)]
    log_file: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn logger_config(&self) -> LoggerConfig {
        let mut config = if self.json_logs {
            LoggerConfig::production()
        } else {
            LoggerConfig::new()
        };
        if self.verbose {
            config = config.with_level(LogLevel::Debug);
        }
        if let Some(path) = &self.log_file {
            config = config.with_file_output(path);
        }
        config
    }

    fn parameters(&self, config: &ClientConfig) -> GenerationParameters {
        let mut params = GenerationParameters::new(self.prompt.clone())
            .with_model(self.model)
            .with_enhance(self.enhance)
            .with_transparent(self.transparent);
        params.width = parse_dimension(&self.width);
        params.height = parse_dimension(&self.height);

        if let Some(key) = self.key.clone().or_else(|| config.api_key.clone()) {
            params = params.with_api_key(key);
        }
        params
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    logger::init_with_config(cli.logger_config())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        log::debug!("✅ .env file loaded");
    }

    if cli.list_models {
        for (id, description) in ImageModel::supported_models() {
            println!("{:<10} {}", id, description);
        }
        return Ok(());
    }

    let mut config = ClientConfig::from_env();
    if let Some(out) = &cli.out {
        config = config.with_output_dir(out.clone());
    }
    logger::log_config_info(&config);

    let params = cli.parameters(&config);
    if cli.transparent && !params.model.supports_transparency() {
        log::warn!("--transparent is ignored for model {}", params.model);
    }

    let client = PollinationsClient::new(&config)?;

    if cli.dry_run {
        println!("{}", client.request_builder().build_validated(&params)?.url);
        return Ok(());
    }

    let controller = GenerationController::with_client(client, Arc::new(LogNotifier));

    let outcome = controller.submit(&params).await;
    log::debug!("Status: {}", controller.phase());

    let result = match outcome {
        Ok(SubmitOutcome::Generated(_)) => match controller.download(&config.output_dir).await {
            Ok(Some(path)) => {
                println!("{}", path.display());
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => Err(e.into()),
        },
        Ok(SubmitOutcome::Cancelled) => Ok(()),
        Err(e) => Err(e.into()),
    };

    controller.shutdown();
    result
}
