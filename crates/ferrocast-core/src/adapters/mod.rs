//! Price source implementations.

pub mod synthetic;
pub mod yahoo;

pub use synthetic::{SyntheticSource, SYNTHETIC_CATALOG};
pub use yahoo::YahooAdapter;
