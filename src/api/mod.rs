//! Access to the remote JSON API.
//!
//! [`JsonApi`] is the seam sources talk to: one endpoint in, one parsed
//! payload out. [`HttpConnector`] is the production implementation.

pub mod connector;
pub mod extract;

pub use connector::{HttpConnector, JsonApi};
pub use extract::{extract_list, PayloadShape};

#[cfg(test)]
pub mod testing;
