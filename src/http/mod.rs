//! HTTP protocol layer module
//!
//! JSON reply envelope and response builders, decoupled from routing and
//! dispatch logic.

pub mod response;

pub use response::{encode, json_response, Reply, ReplyStatus};
