//! Discrete-event scheduling
//!
//! [`Scheduler`] is the interface the topology needs from a simulator clock.
//! [`EventQueue`] is a minimal deterministic implementation: events fire in
//! time order, ties in insertion order.

use crate::{Result, TopologyError};
use leo_orbit::SimTime;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

pub trait Scheduler<E> {
    fn now(&self) -> SimTime;

    /// Queue `event` at absolute time `at`
    fn schedule(&mut self, at: SimTime, event: E) -> Result<()>;

    fn schedule_in(&mut self, delay: SimTime, event: E) -> Result<()> {
        let at = self.now() + delay;
        self.schedule(at, event)
    }
}

#[derive(Debug)]
struct Entry<E> {
    at: SimTime,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at.cmp(&other.at).then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug)]
pub struct EventQueue<E> {
    now: SimTime,
    next_seq: u64,
    pending: BinaryHeap<Reverse<Entry<E>>>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            now: SimTime::zero(),
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Time of the next pending event
    pub fn peek_time(&self) -> Option<SimTime> {
        self.pending.peek().map(|Reverse(entry)| entry.at)
    }

    /// Remove the earliest event and advance the clock to it
    pub fn pop(&mut self) -> Option<(SimTime, E)> {
        let Reverse(entry) = self.pending.pop()?;
        self.now = entry.at;
        Some((entry.at, entry.event))
    }

    /// Like [`pop`](Self::pop), but leaves events after `limit` queued
    pub fn pop_until(&mut self, limit: SimTime) -> Option<(SimTime, E)> {
        match self.peek_time() {
            Some(at) if at <= limit => self.pop(),
            _ => None,
        }
    }
}

impl<E> Scheduler<E> for EventQueue<E> {
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule(&mut self, at: SimTime, event: E) -> Result<()> {
        if at < self.now {
            return Err(TopologyError::SchedulePast { at, now: self.now });
        }
        self.pending.push(Reverse(Entry {
            at,
            seq: self.next_seq,
            event,
        }));
        self.next_seq += 1;
        Ok(())
    }
}
