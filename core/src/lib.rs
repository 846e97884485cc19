//! Insurance pricing pipeline: data preparation, frequency/severity GLMs
//! and a boosted-tree claim-cost regression.

pub mod config;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod gbm;
pub mod glm;
pub mod linalg;
pub mod metrics;
pub mod model;
pub mod prepare;
pub mod pricing;
pub mod report;
pub mod rng;
pub mod schema;
pub mod split;
pub mod stats;
pub mod types;
