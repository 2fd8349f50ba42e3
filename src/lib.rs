pub mod cli;
pub mod config;
pub mod error;
pub mod generate;
pub mod github;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod snapshot;
pub mod stats;
pub mod util;
