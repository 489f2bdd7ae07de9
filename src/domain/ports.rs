use crate::domain::model::{FeatureRecord, Label};
use crate::utils::error::Result;
use std::path::Path;
use std::sync::Arc;

/// A fitted model that maps one feature record to one class label.
pub trait Classifier: Send + Sync {
    fn predict(&self, record: &FeatureRecord) -> Result<Label>;
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn predict(&self, record: &FeatureRecord) -> Result<Label> {
        (**self).predict(record)
    }
}

/// Where serialized model artifacts are read from.
pub trait ArtifactStore: Send + Sync {
    fn read_artifact(&self, path: &Path) -> Result<Vec<u8>>;
}

impl<S: ArtifactStore + ?Sized> ArtifactStore for Arc<S> {
    fn read_artifact(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read_artifact(path)
    }
}
