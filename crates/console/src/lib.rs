#![forbid(unsafe_code)]

//! Line-oriented quiz console served over a byte stream.
//!
//! - [`terminal`]: output sink and line reader over any async stream
//! - [`command`]: command tokens, parsing and completion
//! - [`dispatcher`]: per-connection command loop
//! - [`server`]: TCP accept loop, one task per connection

pub mod banner;
pub mod command;
pub mod dispatcher;
pub mod error;
pub mod server;
pub mod style;
pub mod terminal;

pub use command::{COMMAND_TOKENS, Command, complete};
pub use dispatcher::{Dispatcher, Flow};
pub use error::CommandError;
pub use server::serve;
pub use terminal::Terminal;
