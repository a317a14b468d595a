pub mod config;
pub mod misc;
pub mod plane;
pub mod progress;
