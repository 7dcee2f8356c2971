pub mod fetch_pipeline;

pub use fetch_pipeline::FetchPipeline;
