use super::event::CollisionEvent;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Min-ordered queue of predicted collisions.
///
/// Stale entries are not removed eagerly; the scheduler discards them on pop
/// by comparing collision counts.
#[derive(Debug, Default)]
pub struct EventCalendar {
    queue: BinaryHeap<Reverse<CollisionEvent>>,
}

impl EventCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CollisionEvent) {
        self.queue.push(Reverse(event));
    }

    pub fn pop(&mut self) -> Option<CollisionEvent> {
        self.queue.pop().map(|Reverse(event)| event)
    }

    pub fn peek(&self) -> Option<&CollisionEvent> {
        self.queue.peek().map(|Reverse(event)| event)
    }

    /// Pops the earliest event if it is due at or before `time`.
    pub fn pop_due(&mut self, time: f64) -> Option<CollisionEvent> {
        if self.peek()?.time_f64() <= time {
            self.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
