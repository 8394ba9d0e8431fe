pub mod aggregate;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod output;
pub mod server;
