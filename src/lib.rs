//! Newsportal - news portal backend
//!
//! Categories, tags, authors and news stored in SQLite or MySQL, served over
//! an admin JSON-RPC endpoint and a read-only public portal endpoint.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod validation;
