/// Whole-second elapsed counter driven by external ticks.
///
/// Ticks only count while running, so a paused session keeps the time it
/// had without accumulating more.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElapsedTimer {
    seconds: u64,
    running: bool,
}

impl ElapsedTimer {
    /// Reset to zero and start counting.
    pub fn start(&mut self) {
        self.seconds = 0;
        self.running = true;
    }

    /// Stop counting, keeping the current value.
    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Continue counting from the current value.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Stop counting and return to zero.
    pub fn reset(&mut self) {
        self.seconds = 0;
        self.running = false;
    }

    /// Advance by one second if running. Returns whether the tick counted.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.seconds += 1;
        }
        self.running
    }

    /// Seconds counted so far.
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// Whether ticks are currently counted.
    pub fn is_running(&self) -> bool {
        self.running
    }
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
