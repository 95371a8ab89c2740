//! The search controller: builds and expands the candidate tree, enforces
//! iteration/children bounds, and selects the node to return.

pub mod controller;
pub mod options;

pub use controller::SearchController;
pub use options::{ConverterOptions, ConverterResponse};
