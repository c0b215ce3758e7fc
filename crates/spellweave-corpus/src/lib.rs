//! Training data for the prediction ensemble.
//!
//! - [`data_point`] - [`TrainingDataPoint`](data_point::TrainingDataPoint), one
//!   labeled observation of a spell combination
//! - [`corpus`] - [`TrainingCorpus`](corpus::TrainingCorpus), the bounded and
//!   deduplicated store with statistics and export
//! - [`feature`] - numeric feature vectors and labels for regression
//! - [`optimizer`] - offline cleanup, balancing and quality reporting
//!
//! # Typical Workflow
//!
//! ```text
//! InteractionCache::get_or_compute
//!     ↓ finalized analysis + observed metrics
//! TrainingDataPoint::from_analysis → TrainingCorpus::record
//!     ↓
//! snapshot → optimizer → feature::extract_point / extract_label → training
//! ```

pub mod corpus;
pub mod data_point;
pub mod feature;
pub mod optimizer;
