/// Deferred command module - recorded render-thread operations

pub mod command;
pub mod command_queue;

pub use command::*;
pub use command_queue::*;
