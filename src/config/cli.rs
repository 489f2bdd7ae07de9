use crate::config::toml_config::AppConfig;
use crate::core::artifact::LoadStrategy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "coffee-verdict")]
#[command(about = "Find out if your specialty coffee is very good or excellent")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Serve the web form
    Serve(ServeArgs),
    /// Classify one coffee sample and print the verdict
    Predict(PredictArgs),
    /// List the accepted region, processing and variety labels
    Options,
}

#[derive(Debug, Clone, Args)]
pub struct ModelArgs {
    /// Override the model artifact path
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Override how the artifact is loaded
    #[arg(long, value_enum)]
    pub load: Option<LoadStrategy>,
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Clone, Args)]
pub struct PredictArgs {
    /// Farm elevation in metres (600 or more)
    #[arg(long)]
    pub altitude: String,

    #[arg(long)]
    pub region: String,

    #[arg(long)]
    pub processing: String,

    #[arg(long)]
    pub variety: String,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ModelArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.model {
            config.model.path = path.clone();
        }
        if let Some(load) = self.load {
            config.model.load = load;
        }
    }
}

impl ServeArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        self.model.apply(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "coffee-verdict",
            "serve",
            "--port",
            "9001",
            "--load",
            "per-request",
            "--model",
            "/tmp/m.json",
        ]);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };

        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.load, LoadStrategy::PerRequest);
        assert_eq!(config.model.path, PathBuf::from("/tmp/m.json"));
    }

    #[test]
    fn test_predict_args() {
        let cli = Cli::parse_from([
            "coffee-verdict",
            "-v",
            "predict",
            "--altitude",
            "1800",
            "--region",
            "South America",
            "--processing",
            "Washed / Wet",
            "--variety",
            "Typica",
        ]);
        assert!(cli.verbose);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.altitude, "1800");
        assert_eq!(args.region, "South America");
        assert!(args.model.model.is_none());
    }
}
