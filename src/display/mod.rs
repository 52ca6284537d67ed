//! Output envelope and rendering

pub mod envelope;
pub mod output;

pub use envelope::{Breadcrumb, ErrorDetail, Pagination, Response, SuccessBuilder};
pub use output::OutputOptions;
