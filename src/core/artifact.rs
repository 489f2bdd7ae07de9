use crate::core::forest::RandomForest;
use crate::core::{ArtifactStore, Classifier, FeatureRecord, Label};
use crate::utils::error::{CoffeeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Load and validate once, share the handle across predictions.
    #[default]
    Eager,
    /// Re-read the artifact from disk on every prediction.
    PerRequest,
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStrategy::Eager => f.write_str("eager"),
            LoadStrategy::PerRequest => f.write_str("per_request"),
        }
    }
}

enum Handle {
    Loaded(Arc<RandomForest>),
    Deferred,
}

/// Classifier backed by a forest artifact read through an [`ArtifactStore`].
pub struct ArtifactClassifier<S: ArtifactStore> {
    store: S,
    path: PathBuf,
    strategy: LoadStrategy,
    handle: Handle,
}

impl<S: ArtifactStore> ArtifactClassifier<S> {
    /// With [`LoadStrategy::Eager`] a missing or corrupt artifact fails here.
    pub fn open(store: S, path: impl Into<PathBuf>, strategy: LoadStrategy) -> Result<Self> {
        let path = path.into();
        let handle = match strategy {
            LoadStrategy::Eager => {
                let model = load_forest(&store, &path)?;
                tracing::info!(
                    "Loaded model artifact {} ({} trees, classes {:?})",
                    path.display(),
                    model.n_trees(),
                    model.classes()
                );
                Handle::Loaded(Arc::new(model))
            }
            LoadStrategy::PerRequest => {
                tracing::info!("Model artifact {} will be loaded on every prediction", path.display());
                Handle::Deferred
            }
        };

        Ok(Self {
            store,
            path,
            strategy,
            handle,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }
}

impl<S: ArtifactStore> Classifier for ArtifactClassifier<S> {
    fn predict(&self, record: &FeatureRecord) -> Result<Label> {
        match &self.handle {
            Handle::Loaded(model) => model.predict(record),
            Handle::Deferred => load_forest(&self.store, &self.path)?.predict(record),
        }
    }
}

pub fn load_forest<S: ArtifactStore + ?Sized>(store: &S, path: &Path) -> Result<RandomForest> {
    let bytes = store.read_artifact(path).map_err(|e| CoffeeError::ModelLoadError {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    RandomForest::from_json_slice(&bytes)
}
