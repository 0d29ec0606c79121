#![forbid(unsafe_code)]

pub mod error;
pub mod flow;
pub mod keys;
pub mod model;
pub mod scoring;
pub mod store;
pub mod time;

pub use error::Error;
pub use time::Clock;
