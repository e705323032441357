//! Features Module - Feature mapping & schema alignment
//!
//! Turns an `InputRecord` into the ordered numeric vector the trained model
//! was fit on. Mapping never fails; alignment never fails.

pub mod input;
pub mod layout;
pub mod mapper;
pub mod schema;


// Re-export common types
pub use input::InputRecord;
pub use layout::{OPTIONAL_FEATURES, REQUIRED_FEATURES};
pub use mapper::{EngineeredFeature, FeatureMapper, FeatureVector, SkipReason};
pub use schema::{reconcile, AlignedVector, ExpectedSchema};
