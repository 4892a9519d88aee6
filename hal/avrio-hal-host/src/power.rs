//! Host idle strategy

use avrio_hal::WaitForInterrupt;

/// Spin once per wait, counting how often the loop went idle
#[derive(Debug, Default, Clone)]
pub struct SpinWait {
    rounds: u32,
}

impl SpinWait {
    /// Create a new idle strategy
    pub const fn new() -> Self {
        Self { rounds: 0 }
    }

    /// Number of times the loop went idle
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl WaitForInterrupt for SpinWait {
    fn wait(&mut self) {
        self.rounds = self.rounds.wrapping_add(1);
        core::hint::spin_loop();
    }
}
