//! Generic stream operators the query pipeline is assembled from.

pub mod combine_latest;
pub mod distinct;
pub mod sequenced;

pub use combine_latest::CombineLatest;
pub use distinct::{distinct_until_changed, distinct_until_changed_by};
pub use sequenced::Sequenced;
