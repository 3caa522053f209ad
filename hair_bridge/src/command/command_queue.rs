/// FIFO queue of deferred commands
///
/// The queue itself is not synchronized; the owning context guards it with the
/// scene lock. `take` is the swap half of swap-then-drain: it hands the whole
/// pending batch to the caller and leaves an empty queue behind, so producers
/// can keep enqueueing while the batch executes.

use crate::command::Command;

#[derive(Debug, Default, Clone)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Swap the pending batch out, in enqueue order
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Drop every pending command
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending commands, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "command_queue_tests.rs"]
mod tests;
