/// Monotonic page time in milliseconds, advanced by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageClock {
    pub now_ms: u64,
}

impl PageClock {
    pub fn reset(&mut self) {
        self.now_ms = 0;
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledEvent<A> {
    pub due_ms: u64,
    pub action: A,
}

impl<A> ScheduledEvent<A> {
    pub fn new(due_ms: u64, action: A) -> Self {
        Self { due_ms, action }
    }
}

/// One-shot deferred actions. Events with equal deadlines fire in the order
/// they were scheduled.
#[derive(Debug)]
pub struct Scheduler<A> {
    events: Vec<ScheduledEvent<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, action: A) {
        let index = self.events.partition_point(|event| event.due_ms <= due_ms);
        self.events.insert(index, ScheduledEvent::new(due_ms, action));
    }

    /// Removes and returns every event due at or before `now_ms`.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<ScheduledEvent<A>> {
        let ready = self.events.partition_point(|event| event.due_ms <= now_ms);
        self.events.drain(..ready).collect()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.events.first().map(|event| event.due_ms)
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(4_000, "restore");
        scheduler.schedule(3_000, "stop");
        scheduler.schedule(3_000, "second stop");

        assert!(scheduler.take_due(2_999).is_empty());

        let fired: Vec<_> = scheduler
            .take_due(3_000)
            .into_iter()
            .map(|event| event.action)
            .collect();
        assert_eq!(fired, vec!["stop", "second stop"]);
        assert_eq!(scheduler.next_due(), Some(4_000));

        assert_eq!(scheduler.take_due(10_000).len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn clock_saturates() {
        let mut clock = PageClock { now_ms: u64::MAX - 1 };
        clock.advance(5);
        assert_eq!(clock.now_ms, u64::MAX);
        clock.reset();
        assert_eq!(clock.now_ms, 0);
    }
}
