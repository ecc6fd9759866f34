//! # API Models
//!
//! Request and response structures for the REST API, separate from the
//! database models so the wire format can evolve independently.
//!
//! ## Organization
//!
//! - `requests.rs` - Incoming request bodies and query strings
//! - `responses.rs` - Outgoing response bodies
//!
//! ## Serialization
//!
//! All models use Serde with camelCase field names for JavaScript clients.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
