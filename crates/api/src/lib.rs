//! RPC surface: message envelope, request/response mapping, and process wiring.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
