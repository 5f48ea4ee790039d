//! Dataset access for tree growth.
//!
//! The engine reads samples only through the [`FeatureSource`] trait and makes
//! no assumption about storage layout.
//!
//! # Providers
//!
//! - [`Dataset`]: owned column store with optional weights
//! - [`ArrayDataset`]: borrowed `ndarray` views, any layout
//!
//! # Validation
//!
//! Growth assumes finite values and categorical indices inside their declared
//! range. [`validate_source`] checks this up front and reports the first
//! offending entry as a [`ConfigurationError`].

mod array;
mod dataset;
mod error;
mod traits;

pub use array::ArrayDataset;
pub use dataset::{Dataset, FeatureColumn};
pub use error::ConfigurationError;
pub use traits::{category_index, validate_source, FeatureKind, FeatureSource};
