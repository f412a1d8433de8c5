//! Frame-rate independent gate for move attempts.

use voice_maze_core::MoveCadence;

/// Counts ticks and opens once per completed cadence.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MoveScheduler {
    cadence: MoveCadence,
    elapsed: u32,
}

impl MoveScheduler {
    pub(crate) const fn new(cadence: MoveCadence) -> Self {
        Self {
            cadence,
            elapsed: 0,
        }
    }

    /// Records a tick and reports whether a move should be attempted.
    ///
    /// The counter resets whenever it opens, whatever the attempt's outcome.
    pub(crate) fn advance(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed < self.cadence.ticks() {
            return false;
        }

        self.elapsed = 0;
        true
    }
}
