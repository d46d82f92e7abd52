use async_trait::async_trait;

use crate::domain::{BirthDetails, ChartRecord, DomainError};

/// Computes natal charts. Ephemeris math, house systems and aspect detection
/// all live behind this seam.
#[async_trait]
pub trait ChartEngine: Send + Sync {
    /// Returns the chart, or [`DomainError::Upstream`] when the engine itself
    /// reports a failure.
    async fn compute_chart(&self, details: &BirthDetails) -> Result<ChartRecord, DomainError>;

    fn engine_name(&self) -> &str;

    /// True when placements are fabricated rather than computed from an
    /// ephemeris.
    fn is_synthetic(&self) -> bool {
        false
    }
}
