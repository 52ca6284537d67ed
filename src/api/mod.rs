pub mod client;
pub mod endpoints;
pub mod error_body;
pub mod link;
pub mod models;
