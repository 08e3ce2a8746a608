/// Deferred alarm resets.
///
/// A power pellet alarms every pursuer and schedules one clear per pursuer
/// at `now + ALARM_WINDOW`. Clears are independent: a later pellet adds new
/// entries but never cancels the ones already queued, so each pursuer calms
/// down exactly when its own earliest outstanding clear comes due.
///
/// Entries are pushed with a constant window on a monotonic clock, so the
/// queue stays sorted by `fire_at` and draining only looks at the front.

use std::collections::VecDeque;
use std::time::Duration;

use crate::domain::entity::PursuerId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlarmClear {
    pub pursuer: PursuerId,
    pub fire_at: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct AlarmQueue {
    pending: VecDeque<AlarmClear>,
}

impl AlarmQueue {
    pub fn new() -> Self {
        AlarmQueue { pending: VecDeque::new() }
    }

    pub fn schedule(&mut self, pursuer: PursuerId, fire_at: Duration) {
        // keep sorted even if a caller ever schedules out of order
        let idx = self.pending.partition_point(|e| e.fire_at <= fire_at);
        self.pending.insert(idx, AlarmClear { pursuer, fire_at });
    }

    /// Remove and return every clear due at or before `now`, oldest first.
    pub fn drain_due(&mut self, now: Duration) -> Vec<AlarmClear> {
        let due = self.pending.partition_point(|e| e.fire_at <= now);
        self.pending.drain(..due).collect()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_due_before_fire_time() {
        let mut q = AlarmQueue::new();
        q.schedule(PursuerId(0), ms(5000));
        assert!(q.drain_due(ms(4999)).is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn due_exactly_at_fire_time() {
        let mut q = AlarmQueue::new();
        q.schedule(PursuerId(0), ms(5000));
        let due = q.drain_due(ms(5000));
        assert_eq!(due, vec![AlarmClear { pursuer: PursuerId(0), fire_at: ms(5000) }]);
        assert!(q.is_empty());
    }

    #[test]
    fn drains_in_fire_order_and_leaves_the_rest() {
        let mut q = AlarmQueue::new();
        q.schedule(PursuerId(1), ms(7000));
        q.schedule(PursuerId(0), ms(5000));
        q.schedule(PursuerId(2), ms(9000));
        let due: Vec<PursuerId> = q.drain_due(ms(8000)).into_iter().map(|e| e.pursuer).collect();
        assert_eq!(due, vec![PursuerId(0), PursuerId(1)]);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn later_schedule_does_not_replace_earlier() {
        let mut q = AlarmQueue::new();
        q.schedule(PursuerId(0), ms(5000));
        q.schedule(PursuerId(0), ms(8000));
        assert_eq!(q.drain_due(ms(5000)).len(), 1);
        assert_eq!(q.drain_due(ms(8000)).len(), 1);
    }
}
