//! Wall-clock timing of propagation work, reported through `tracing`

use std::time::Instant;
use tracing::debug;

/// RAII timer for a named region
///
/// Emits one `debug!` event with the elapsed milliseconds when dropped. If the
/// region processed a known number of items (frames, tasks), the average time
/// per item is reported as well.
pub struct ProfilerScope {
    start: Instant,
    name: &'static str,
    items: usize,
}

impl ProfilerScope {
    /// Start timing `name`.
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
            items: 0,
        }
    }

    /// Attribute `items` units of work to this scope.
    pub fn with_items(mut self, items: usize) -> Self {
        self.items = items;
        self
    }

    /// Milliseconds since the scope started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Average milliseconds per item, `None` without items.
    pub fn per_item_ms(&self) -> Option<f64> {
        (self.items > 0).then(|| self.elapsed_ms() / self.items as f64)
    }
}

impl Drop for ProfilerScope {
    fn drop(&mut self) {
        match self.per_item_ms() {
            Some(per_item_ms) => debug!(
                scope = self.name,
                elapsed_ms = self.elapsed_ms(),
                items = self.items,
                per_item_ms,
                "scope finished"
            ),
            None => debug!(scope = self.name, elapsed_ms = self.elapsed_ms(), "scope finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_profiler_scope_measures_time() {
        let scope = ProfilerScope::new("test");
        thread::sleep(Duration::from_millis(10));
        let elapsed = scope.elapsed_ms();
        assert!(elapsed >= 10.0, "Expected at least 10ms, got {elapsed}");
        assert!(scope.per_item_ms().is_none());
    }

    #[test]
    fn test_per_item_average() {
        let scope = ProfilerScope::new("frames").with_items(4);
        thread::sleep(Duration::from_millis(8));
        let per_item = scope.per_item_ms().unwrap();
        assert!(per_item >= 2.0 && per_item <= scope.elapsed_ms());
    }
}
