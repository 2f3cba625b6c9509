//! Request handler module
//!
//! Responsible for request routing dispatch, JSON lookups and asset pass-through.

pub mod assets;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
