use crate::core::{Classifier, Label};
use crate::domain::model::{Altitude, CoffeeQuery, Processing, Region, Variety, Verdict};
use crate::utils::error::Result;

/// Binds the form's four values to a classifier call.
pub struct InferenceAdapter<C: Classifier> {
    classifier: C,
}

impl<C: Classifier> InferenceAdapter<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn predict(&self, altitude: Altitude, region: Region, processing: Processing, variety: Variety) -> Result<Label> {
        self.predict_query(&CoffeeQuery::new(altitude, region, processing, variety))
    }

    pub fn predict_query(&self, query: &CoffeeQuery) -> Result<Label> {
        let record = query.to_record();
        tracing::debug!(
            altitude = query.altitude.metres(),
            region = %query.region,
            processing = %query.processing,
            variety = %query.variety,
            "Running prediction"
        );
        let label = self.classifier.predict(&record)?;
        tracing::debug!("Classifier returned label {}", label);
        Ok(label)
    }

    /// Like [`predict_query`](Self::predict_query) but refuses labels outside {0, 1}.
    pub fn verdict(&self, query: &CoffeeQuery) -> Result<Verdict> {
        let label = self.predict_query(query)?;
        Verdict::try_from(label).inspect_err(|e| tracing::error!("❌ {}", e))
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }
}
