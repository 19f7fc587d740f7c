//! Generates syndication feeds for WordPress sites from their REST API.
//!
//! Each configured site goes through endpoint discovery, metadata and post
//! retrieval, then is rendered to the configured feed formats.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod feed;
pub mod services;
pub mod sources;
