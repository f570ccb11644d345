use std::sync::atomic::{AtomicU32, Ordering};

/// Counts completed chunks across concurrent workers.
///
/// The increment is a single atomic fetch-add, so every worker observes a
/// distinct, gap-free count. The value is only ever used for reporting.
#[derive(Debug, Default)]
pub struct ProgressCounter {
    completed: AtomicU32,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed chunk and returns the new completed count.
    pub fn record_chunk(&self) -> u32 {
        self.completed.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current completed count.
    pub fn completed(&self) -> u32 {
        self.completed.load(Ordering::SeqCst)
    }
}
