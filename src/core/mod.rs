//! Routing and payload shaping. Everything here is synchronous and works on
//! already-fetched, already-deserialized data.

pub mod envelope;
pub mod estimate;
pub mod fields;
pub mod limiter;
pub mod project;
pub mod query;
pub mod routes;
pub mod template;
