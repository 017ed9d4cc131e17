//! Butterfly Core - Foundational types for Butterfly Earth
//!
//! This crate provides the types every other Butterfly crate depends on:
//! - `Topic` - the closed set of seven quiz topics and their assets
//! - `Route` - every navigable screen, replacing string route tables
//! - `Color`, `Vec3` - small value types shared by the globe and the hub
//! - `AppConfig` - layered configuration
//! - Error types and Result alias

pub mod config;
mod error;
mod route;
mod topic;
mod types;

pub use config::AppConfig;
pub use error::{ButterflyError, Result};
pub use route::Route;
pub use topic::Topic;
pub use types::{mat4_mul, mat4_scale_rotation_y, Color, Vec3};
