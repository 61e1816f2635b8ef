//! Test doubles shared by the unit tests.

use crate::{
    endpoint::{Host, Time},
    message::Message,
    packet::Packet,
};

/// A host that records every interaction and holds the clock wherever a
/// test puts it.
#[derive(Debug, Default)]
pub struct TestHost {
    pub sent: Vec<Packet>,
    pub delivered: Vec<Message>,
    pub timer_starts: Vec<Time>,
    pub timer_stops: u32,
    pub clock: Time,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Host for TestHost {
    fn send_to_channel(&mut self, packet: Packet) {
        self.sent.push(packet);
    }

    fn deliver(&mut self, payload: Message) {
        self.delivered.push(payload);
    }

    fn start_timer(&mut self, interval: Time) {
        self.timer_starts.push(interval);
    }

    fn stop_timer(&mut self) {
        self.timer_stops += 1;
    }

    fn now(&self) -> Time {
        self.clock
    }
}
