use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{format_context, ChartRecord};

pub const NO_CHART_STATUS: &str =
    "⚠ No chart loaded - generate a chart first for personalized insights";

/// The current chart together with the context block derived from it.
/// Always built as a pair, so the two can never disagree.
#[derive(Debug, Clone)]
pub struct LoadedChart {
    chart: Arc<ChartRecord>,
    context: String,
}

impl LoadedChart {
    pub fn new(chart: ChartRecord) -> Self {
        let context = format_context(&chart);
        Self {
            chart: Arc::new(chart),
            context,
        }
    }

    pub fn chart(&self) -> &Arc<ChartRecord> {
        &self.chart
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

/// The session's single chart slot.
///
/// Shared by handle between chart generation and the chat engine. The slot is
/// replaced as a whole under a write lock; readers clone out what they need
/// and never hold the lock across an await.
#[derive(Debug, Default)]
pub struct ChartSession {
    current: RwLock<Option<LoadedChart>>,
}

impl ChartSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current chart and its context in one step.
    pub async fn load(&self, chart: ChartRecord) -> Arc<ChartRecord> {
        let loaded = LoadedChart::new(chart);
        let chart = loaded.chart().clone();
        info!(
            "Chart loaded for {} ({} context bytes)",
            chart.name(),
            loaded.context().len()
        );
        *self.current.write().await = Some(loaded);
        chart
    }

    pub async fn clear(&self) {
        let previous = self.current.write().await.take();
        if let Some(previous) = previous {
            info!("Chart context cleared (was {})", previous.chart().name());
        }
    }

    pub async fn current(&self) -> Option<LoadedChart> {
        self.current.read().await.clone()
    }

    pub async fn chart(&self) -> Option<Arc<ChartRecord>> {
        self.current.read().await.as_ref().map(|l| l.chart().clone())
    }

    pub async fn context(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|l| l.context().to_string())
    }

    pub async fn is_loaded(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn status_line(&self) -> String {
        match self.chart().await {
            Some(chart) => format!("✓ Chart loaded: {}", chart.name()),
            None => NO_CHART_STATUS.to_string(),
        }
    }
}
