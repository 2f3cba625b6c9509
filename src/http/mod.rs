//! HTTP protocol layer module
//!
//! Response builders and header helpers shared by the handlers,
//! decoupled from the upstream lookups.

pub mod headers;
pub mod response;

// Re-export commonly used types
pub use headers::forwardable_headers;
pub use response::{
    build_400_response, build_404_response, build_500_response, build_json_response,
    build_not_found_response, BoxError, ProxyBody,
};
