#![forbid(unsafe_code)]

pub mod bank;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod model;
pub mod resume;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod time;
pub mod timer;

pub use error::Error;
pub use time::Clock;
