//! Request middleware.

pub mod limits;

pub use limits::{limit_middleware, InFlightLimit};
