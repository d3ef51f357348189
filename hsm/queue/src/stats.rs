//! Queue usage statistics

/// Snapshot of an event queue's usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Number of slots in the queue
    pub capacity: usize,
    /// Number of events currently queued
    pub used: usize,
    /// Highest number of events ever queued at once
    pub max_used: usize,
    /// Number of events rejected because the queue was full
    pub dropped: u32,
}

impl QueueStats {
    /// Number of free slots
    pub const fn free(&self) -> usize {
        self.capacity - self.used
    }

    /// Check if any event was ever dropped
    pub const fn has_dropped(&self) -> bool {
        self.dropped != 0
    }

    /// Peak utilization as a percentage (0-100)
    pub fn peak_utilization(&self) -> u8 {
        if self.capacity == 0 {
            0
        } else {
            ((self.max_used * 100) / self.capacity) as u8
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for QueueStats {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "QueueStats{{ capacity: {}, used: {}, max_used: {}, dropped: {} }}",
            self.capacity,
            self.used,
            self.max_used,
            self.dropped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_free_and_utilization() {
        let stats = QueueStats {
            capacity: 8,
            used: 2,
            max_used: 6,
            dropped: 0,
        };
        assert_eq!(stats.free(), 6);
        assert_eq!(stats.peak_utilization(), 75);
        assert!(!stats.has_dropped());
    }
}
