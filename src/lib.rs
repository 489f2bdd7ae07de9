pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

#[cfg(feature = "cli")]
pub use config::cli::Cli;
pub use crate::config::{AppConfig, LocalStorage};

pub use crate::core::{
    adapter::InferenceAdapter,
    artifact::{ArtifactClassifier, LoadStrategy},
    forest::RandomForest,
};
pub use domain::model::{Altitude, CoffeeQuery, Label, Processing, Region, Variety, Verdict};
pub use domain::ports::{ArtifactStore, Classifier};
pub use utils::error::{CoffeeError, Result};
