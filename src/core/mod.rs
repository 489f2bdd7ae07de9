pub mod adapter;
pub mod artifact;
pub mod forest;

pub use crate::domain::model::{CoffeeQuery, FeatureRecord, Label, Verdict};
pub use crate::domain::ports::{ArtifactStore, Classifier};
pub use crate::utils::error::Result;
