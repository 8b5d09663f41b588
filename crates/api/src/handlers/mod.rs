//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod notification;
pub mod report;
pub mod reward;
