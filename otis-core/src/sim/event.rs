use crate::{endpoint::Time, packet::Packet};
use std::{cmp::Ordering, cmp::Reverse, collections::BinaryHeap};

/// The two simulated endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// The sending side.
    A,
    /// The receiving side.
    B,
}

impl Entity {
    /// The endpoint on the other end of the channel.
    pub fn peer(self) -> Entity {
        match self {
            Entity::A => Entity::B,
            Entity::B => Entity::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Entity::A => 0,
            Entity::B => 1,
        }
    }
}

/// Something scheduled to happen at a point in simulated time.
#[derive(Debug, Clone)]
pub enum EventKind {
    /// The application at A hands down its next message.
    FromApplication,
    /// A packet finishes transit and arrives at `entity`.
    Arrival { entity: Entity, packet: Packet },
    /// The timer at `entity` fires, unless `generation` has gone stale.
    TimerExpiry { entity: Entity, generation: u64 },
}

#[derive(Debug, Clone)]
pub struct Event {
    pub time: Time,
    /// Insertion order, used to break ties so same-time events stay FIFO.
    seq: u64,
    pub kind: EventKind,
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.seq.cmp(&other.seq))
    }
}

/// A time-ordered event list; ties pop in insertion order.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Event>>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, time: Time, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Event { time, seq, kind }));
    }

    /// The next event in time order.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(event)| event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
