//! FoodLog Library
//!
//! Personal food intake logging: a brand and food library, a dated
//! consumption log, and calories and macros computed at read time.

pub mod build_info;
pub mod catalog;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod session;
pub mod tools;
