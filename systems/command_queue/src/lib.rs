#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared FIFO that carries movement commands from the recognition thread to
//! the game loop.
//!
//! Every operation takes the same mutex, so `enqueue`, `try_dequeue` and
//! `clear` are totally ordered. A clear therefore acts as a barrier: anything
//! enqueued before it is either dequeued before it or discarded by it, and a
//! dequeue never observes a partially written element.

use std::{collections::VecDeque, fmt, sync::Arc};

use parking_lot::Mutex;
use voice_maze_core::Direction;

/// Cloneable handle to a single shared command queue.
///
/// Clones refer to the same underlying queue, which is how the producer and
/// the world are wired together without process-wide state.
pub struct CommandQueue<T = Direction> {
    inner: Arc<Mutex<VecDeque<T>>>,
}

impl<T> CommandQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Appends `command` to the tail of the queue.
    pub fn enqueue(&self, command: T) {
        self.inner.lock().push_back(command);
    }

    /// Removes and returns the oldest pending command without blocking on an
    /// empty queue.
    #[must_use]
    pub fn try_dequeue(&self) -> Option<T> {
        self.inner.lock().pop_front()
    }

    /// Discards every pending command and reports how many were dropped.
    ///
    /// Clearing an empty queue is a no-op.
    pub fn clear(&self) -> usize {
        let mut pending = self.inner.lock();
        let discarded = pending.len();
        pending.clear();
        discarded
    }

    /// Number of commands waiting to be consumed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Reports whether no commands are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<T: Clone> CommandQueue<T> {
    /// Copies the pending commands in dequeue order without consuming them.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.lock().iter().cloned().collect()
    }
}

impl<T> Clone for CommandQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for CommandQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CommandQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("pending", &self.len())
            .finish()
    }
}
