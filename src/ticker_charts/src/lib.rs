pub mod app;
pub mod chart;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod providers;
pub mod render;
pub mod view;
