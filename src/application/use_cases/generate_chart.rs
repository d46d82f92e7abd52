use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::application::{ChartEngine, ChartSession};
use crate::domain::{BirthDetails, ChartRecord, DomainError};

/// Validates birth details, runs the chart engine and, only on success,
/// replaces the session's chart. Any failure leaves the previous chart active.
pub struct GenerateChartUseCase {
    engine: Arc<dyn ChartEngine>,
    charts: Arc<ChartSession>,
}

impl GenerateChartUseCase {
    pub fn new(engine: Arc<dyn ChartEngine>, charts: Arc<ChartSession>) -> Self {
        Self { engine, charts }
    }

    pub async fn execute(&self, details: &BirthDetails) -> Result<Arc<ChartRecord>, DomainError> {
        details.validate()?;

        info!(
            "Generating chart for {} ({} {} {}) with {}",
            details.name,
            details.date_label(),
            details.time_label(),
            details.timezone,
            self.engine.engine_name()
        );
        let start_time = Instant::now();

        let chart = self.engine.compute_chart(details).await.map_err(|e| {
            warn!("Chart engine failed for {}: {}", details.name, e);
            e
        })?;

        info!(
            "Chart computed in {:?}: {} placements, {} aspects",
            start_time.elapsed(),
            chart.placements().len(),
            chart.aspects().len()
        );

        Ok(self.charts.load(chart).await)
    }
}
