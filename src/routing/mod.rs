//! Routing module
//!
//! Path matching for the video and channel endpoints plus id validation.

mod matcher;

pub use matcher::{is_numeric_id, match_route, Endpoint, RouteMatch};
