pub mod cancel;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod generator;
pub mod grid;
pub mod limits;
pub mod model;
pub mod observability;
pub mod partition;
pub mod sim;
pub mod snapshot;
