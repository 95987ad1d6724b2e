//! Routing module
//!
//! Maps (method, path) pairs to route targets through a table built from
//! configuration at startup.

mod table;

pub use table::{Route, RouteOutcome, RouteTarget, Router};
