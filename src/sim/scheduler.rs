use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::state::{FrameTask, TimerId};

/// Something the simulated browser will deliver at a given time.
#[derive(Debug, Clone, PartialEq)]
pub enum Wake {
    Interval(TimerId),
    Frame(FrameTask),
    Load(String),
    /// First observer callback, reporting the current viewport state
    ObserverStart,
    Viewport(f64),
    Click,
}

#[derive(Debug)]
struct Entry {
    at: Duration,
    seq: u64,
    wake: Wake,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// Virtual clock plus a time-ordered queue. Entries due at the same instant
/// come out in the order they were scheduled.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, at: Duration, wake: Wake) {
        self.seq += 1;
        self.queue.push(Reverse(Entry {
            at: at.max(self.now),
            seq: self.seq,
            wake,
        }));
    }

    pub fn schedule_in(&mut self, delay: Duration, wake: Wake) {
        self.schedule(self.now + delay, wake);
    }

    /// Pop the next entry due at or before `until`, moving the clock to it.
    pub fn pop_due(&mut self, until: Duration) -> Option<(Duration, Wake)> {
        let due = self.queue.peek().is_some_and(|Reverse(e)| e.at <= until);
        if !due {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = entry.at;
        Some((entry.at, entry.wake))
    }

    /// Move the clock forward once nothing else is due.
    pub fn settle(&mut self, until: Duration) {
        if until > self.now {
            self.now = until;
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
