//! Storm Config Library
//!
//! Generates the YAML configuration read by the Storm backup tool.
//!
//! This crate provides:
//! - Parsing generator options and backup folder lists
//! - Loading device id and secrets from the environment
//! - Rendering and validating the configuration document

pub mod config;
pub mod render;
