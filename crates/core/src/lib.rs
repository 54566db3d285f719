#![forbid(unsafe_code)]

pub mod answer;
pub mod model;
pub mod time;

pub use time::Clock;
