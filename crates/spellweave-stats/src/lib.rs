//! Statistical utilities for the spellweave pipeline.
//!
//! - [`descriptive`]: min/max/mean/standard deviation over metric values, `None` for
//!   empty input
//! - [`counts`]: zero-initialized per-category counters and capped population ratios
//!   used for corpus distributions and model confidence
//!
//! # Examples
//!
//! ```
//! use spellweave_stats::{counts::CategoryCounts, descriptive::DescriptiveStats};
//!
//! let stats = DescriptiveStats::new([1.0, 2.0, 3.0]).unwrap();
//! assert_eq!(stats.mean, 2.0);
//!
//! let mut outcomes = CategoryCounts::with_keys(["success", "failure"]);
//! outcomes.increment("success");
//! assert_eq!(outcomes.get(&"failure"), 0);
//! ```

pub mod counts;
pub mod descriptive;
