//! Single-release gate for work that must wait for a visual transition.

/// Starts locked. Items queued with [`Lock::after_unlock`] are released,
/// in order, by the first [`Lock::unlock`]; later unlocks release nothing.
///
/// The lock stores plain values rather than closures so the queue can be
/// inspected. The caller runs what it gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lock<T> {
    locked: bool,
    queue: Vec<T>,
}

impl<T> Lock<T> {
    pub fn new() -> Self {
        Self {
            locked: true,
            queue: Vec::new(),
        }
    }

    /// Queue `item`, or hand it straight back if the lock is already open.
    #[must_use = "an item returned from an open lock must be run now"]
    pub fn after_unlock(&mut self, item: T) -> Option<T> {
        if self.locked {
            self.queue.push(item);
            None
        } else {
            Some(item)
        }
    }

    /// Open the lock and take every queued item in registration order.
    pub fn unlock(&mut self) -> Vec<T> {
        if !self.locked {
            return Vec::new();
        }
        self.locked = false;
        std::mem::take(&mut self.queue)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Items waiting for the unlock.
    pub fn pending(&self) -> &[T] {
        &self.queue
    }
}

impl<T> Default for Lock<T> {
    fn default() -> Self {
        Self::new()
    }
}
