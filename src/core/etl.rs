use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Summary of a finished extract/transform/load pass.
#[derive(Debug, Clone)]
pub struct EtlReport {
    pub raw_items: usize,
    pub venues: usize,
    pub output_path: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EtlReport> {
        tracing::info!("🚀 Starting fetch and clean");

        tracing::info!("📥 Extracting list items...");
        let raw_items = self.pipeline.extract().await?;
        let raw_count = raw_items.len();
        tracing::info!("📥 Extracted {} raw items", raw_count);

        tracing::info!("🔄 Normalizing venues...");
        let transformed = self.pipeline.transform(raw_items).await?;
        let venue_count = transformed.venues.len();
        tracing::info!("🔄 Normalized {} venues", venue_count);

        tracing::info!("💾 Writing venue table...");
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!("💾 Output saved to: {}", output_path);

        Ok(EtlReport {
            raw_items: raw_count,
            venues: venue_count,
            output_path,
        })
    }
}
