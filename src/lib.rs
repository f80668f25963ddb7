pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod services;
