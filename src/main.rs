use anyhow::Context;
use clap::Parser;
use specialty_coffee::config::cli::{Command, PredictArgs, ServeArgs};
use specialty_coffee::utils::error::ErrorSeverity;
use specialty_coffee::utils::{logger, validation::Validate};
use specialty_coffee::web::{self, AppState};
use specialty_coffee::{
    AppConfig, ArtifactClassifier, Cli, CoffeeError, CoffeeQuery, InferenceAdapter, LocalStorage, Processing,
    Region, Variety,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => AppConfig::default(),
    };

    // 初始化日誌
    logger::init_logger(config.logging.format, cli.verbose);

    let result = match &cli.command {
        Command::Serve(args) => run_serve(args, &mut config).await,
        Command::Predict(args) => run_predict(args, &mut config),
        Command::Options => {
            print_options();
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low | ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn open_adapter(config: &AppConfig) -> Result<InferenceAdapter<ArtifactClassifier<LocalStorage>>, CoffeeError> {
    let classifier = ArtifactClassifier::open(LocalStorage::current_dir(), config.model.path.clone(), config.model.load)?;
    Ok(InferenceAdapter::new(classifier))
}

async fn run_serve(args: &ServeArgs, config: &mut AppConfig) -> Result<(), CoffeeError> {
    args.apply(config);
    config.validate()?;
    tracing::debug!("Config: {:?}", config);

    let adapter = open_adapter(config)?;
    let state = AppState::new(adapter, config.model.path.display().to_string(), config.model.load)
        .with_header_image(config.assets.header_image.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    web::serve(listener, Arc::new(state), shutdown_signal(timeout)).await
}

fn run_predict(args: &PredictArgs, config: &mut AppConfig) -> Result<(), CoffeeError> {
    args.model.apply(config);
    config.validate()?;

    let query = CoffeeQuery::parse(&args.altitude, &args.region, &args.processing, &args.variety)?;
    let adapter = open_adapter(config)?;
    let verdict = adapter.verdict(&query)?;

    println!("{}", verdict.message());
    Ok(())
}

fn print_options() {
    println!("Altitude: whole metres, at least {}", specialty_coffee::domain::model::MIN_ALTITUDE);
    println!("Regions:");
    for region in Region::ALL {
        println!("  {}", region);
    }
    println!("Processing methods:");
    for processing in Processing::ALL {
        println!("  {}", processing);
    }
    println!("Varieties:");
    for variety in Variety::ALL {
        println!("  {}", variety);
    }
}

/// Resolves on Ctrl+C or SIGTERM; in-flight requests get `timeout` to finish.
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, initiating graceful shutdown..."),
    }

    tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        tracing::warn!("Shutdown timeout of {:?} reached, exiting", timeout);
        std::process::exit(0);
    });
}
