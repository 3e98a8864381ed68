pub mod api;
pub mod catalog;
pub mod config;
pub mod download;
pub mod emotion;
pub mod input;
pub mod session;
pub mod transform;
pub mod wizard;
pub mod workflow;

/// Application name for XDG paths
pub const APP_NAME: &str = "cinemood";
