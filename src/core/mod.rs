pub mod cache;
pub mod choice;
pub mod etl;
pub mod fetcher;
pub mod migration;
pub mod normalizer;
pub mod progress;

pub use crate::domain::model::{RawItem, TransformResult, Venue, VenueTable};
pub use crate::domain::ports::{ListApi, Pipeline, Storage};
pub use crate::utils::error::Result;
