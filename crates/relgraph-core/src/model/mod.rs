//! Graph data model and request/response contracts.

pub mod edge;
pub mod event;
pub mod node;
pub mod request;
