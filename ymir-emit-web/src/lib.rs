pub mod auth_pages;
pub mod client;
pub mod emit;
pub mod errors;
pub mod forms;
pub mod layout;
pub mod listing;
pub mod stylesheet;
pub mod types;

pub use emit::{emit_web, GeneratedFile};
pub use errors::EmissionError;
