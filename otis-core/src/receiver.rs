//! The receiving side of the transfer engine.
//!
//! The receiver accepts any uncorrupted packet inside its acceptance
//! window, reassembles contiguous runs through the reorder buffer, delivers
//! them upward in order, and answers every accepted packet with a
//! cumulative acknowledgment. Anything already delivered or too far ahead
//! is re-acknowledged without buffering.

mod reorder;

use crate::{
    config::Config,
    endpoint::{Endpoint, Host},
    modular,
    packet::Packet,
    stats::ReceiverStats,
};
use reorder::ReorderBuffer;

/// The receiver state machine.
#[derive(Debug)]
pub struct Receiver {
    config: Config,
    /// Next sequence number needed for in-order delivery.
    expecting: u16,
    /// Highest contiguous sequence number delivered so far. Starts at
    /// `LimitSeqNo - 1`, congruent to one step behind `expecting`, so a
    /// pre-delivery duplicate still re-acknowledges a value the sender
    /// classifies as stale.
    last_delivered: u16,
    buffer: ReorderBuffer,
    stats: ReceiverStats,
}

impl Receiver {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            expecting: 0,
            last_delivered: config.limit_seq_no() - 1,
            buffer: ReorderBuffer::new(config.limit_seq_no()),
            stats: ReceiverStats::default(),
        }
    }

    fn on_data(&mut self, packet: Packet, host: &mut dyn Host) {
        if !packet.verify() {
            // No acknowledgment either: a corrupted packet must look exactly
            // like a lost one from the sender's side.
            self.stats.corrupted += 1;
            tracing::debug!(seq = packet.seq, "dropping corrupted packet");
            return;
        }
        let acceptable = modular::in_window(
            self.expecting,
            self.config.window_size(),
            packet.seq,
            self.config.limit_seq_no(),
        );
        if !acceptable || self.buffer.contains(packet.seq) {
            // Already delivered, already buffered, or too far ahead:
            // re-announce the delivery horizon.
            tracing::debug!(seq = packet.seq, "duplicate or out-of-range, re-acking");
            self.send_ack(host);
            return;
        }
        self.buffer.insert(packet);
        self.drain_contiguous(host);
        self.send_ack(host);
    }

    /// Delivers every buffered packet from `expecting` onward until the
    /// first gap.
    fn drain_contiguous(&mut self, host: &mut dyn Host) {
        while let Some(packet) = self.buffer.take(self.expecting) {
            host.deliver(packet.payload);
            self.stats.delivered += 1;
            self.last_delivered = self.expecting;
            self.expecting = modular::next(self.expecting, self.config.limit_seq_no());
        }
    }

    fn send_ack(&mut self, host: &mut dyn Host) {
        host.send_to_channel(Packet::ack(self.last_delivered));
        self.stats.acks_sent += 1;
    }

    /// Next sequence number needed for in-order delivery.
    pub fn expecting(&self) -> u16 {
        self.expecting
    }

    /// Packets buffered but not yet deliverable.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }
}

impl Endpoint for Receiver {
    fn on_packet(&mut self, packet: Packet, host: &mut dyn Host) {
        self.on_data(packet, host);
    }

    fn on_timer(&mut self, _host: &mut dyn Host) {
        tracing::warn!("the receiver runs no timer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{message::Message, modular, testing::TestHost};

    fn receiver(window_size: u16) -> Receiver {
        Receiver::new(Config::new(window_size, 30.0).unwrap())
    }

    fn data(seq: u16, text: &str) -> Packet {
        Packet::data(seq, 0, Message::new(text).unwrap())
    }

    #[test]
    fn in_order_packet_is_delivered_and_acked() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();
        receiver.on_packet(data(0, "m0"), &mut host);

        assert_eq!(host.delivered, [Message::new("m0").unwrap()]);
        assert_eq!(host.sent.len(), 1);
        assert_eq!(host.sent[0].ack, 0);
        assert!(host.sent[0].payload.is_empty());
        assert_eq!(receiver.expecting(), 1);
        assert_eq!(receiver.stats().delivered, 1);
        assert_eq!(receiver.stats().acks_sent, 1);
    }

    #[test]
    fn gap_is_buffered_until_filled() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();

        // 1 and 2 arrive ahead of 0: buffered, acked with the horizon still
        // behind the gap.
        receiver.on_packet(data(1, "m1"), &mut host);
        receiver.on_packet(data(2, "m2"), &mut host);
        assert!(host.delivered.is_empty());
        assert_eq!(receiver.buffered(), 2);
        assert_eq!(host.sent.len(), 2);
        assert_eq!(host.sent[1].ack, 7);

        // The gap fills and the whole run drains in order.
        receiver.on_packet(data(0, "m0"), &mut host);
        let delivered: Vec<Vec<u8>> = host.delivered.iter().map(|m| m.to_vec()).collect();
        assert_eq!(delivered, [b"m0".to_vec(), b"m1".to_vec(), b"m2".to_vec()]);
        assert_eq!(receiver.expecting(), 3);
        assert_eq!(host.sent[2].ack, 2);
        assert_eq!(receiver.buffered(), 0);
    }

    #[test]
    fn duplicate_is_reacked_without_redelivery() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();
        receiver.on_packet(data(0, "m0"), &mut host);
        receiver.on_packet(data(0, "m0"), &mut host);

        assert_eq!(host.delivered.len(), 1);
        assert_eq!(receiver.expecting(), 1);
        assert_eq!(host.sent.len(), 2);
        assert_eq!(host.sent[1].ack, 0);
        assert_eq!(receiver.stats().acks_sent, 2);
    }

    #[test]
    fn duplicate_of_buffered_packet_is_reacked() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();
        receiver.on_packet(data(2, "m2"), &mut host);
        receiver.on_packet(data(2, "m2"), &mut host);

        assert_eq!(receiver.buffered(), 1);
        assert_eq!(host.sent.len(), 2);
        // Nothing delivered yet, so the horizon is still the initial one.
        assert_eq!(host.sent[1].ack, 7);
    }

    #[test]
    fn corrupted_packet_is_dropped_without_ack() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();
        let mut packet = data(0, "m0");
        packet.seq += 1;
        receiver.on_packet(packet, &mut host);

        assert!(host.sent.is_empty());
        assert!(host.delivered.is_empty());
        assert_eq!(receiver.stats().corrupted, 1);
        assert_eq!(receiver.expecting(), 0);
    }

    #[test]
    fn too_far_ahead_is_not_buffered() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();
        // Window is [0, 4); seq 5 is beyond the acceptance window.
        receiver.on_packet(data(5, "m5"), &mut host);

        assert_eq!(receiver.buffered(), 0);
        assert_eq!(host.sent.len(), 1);
        assert_eq!(host.sent[0].ack, 7);
    }

    #[test]
    fn buffered_sequences_stay_inside_the_acceptance_window() {
        let mut receiver = receiver(4);
        let mut host = TestHost::new();
        for seq in [1, 3, 2, 5, 7] {
            receiver.on_packet(data(seq, "mx"), &mut host);
        }
        let config = Config::new(4, 30.0).unwrap();
        for seq in receiver.buffer.occupied() {
            assert!(modular::in_window(
                receiver.expecting(),
                config.window_size(),
                seq,
                config.limit_seq_no()
            ));
        }
        assert_eq!(receiver.buffered(), 3);
    }

    #[test]
    fn delivery_advances_across_the_wrap() {
        let mut receiver = receiver(2);
        let mut host = TestHost::new();
        for round in 0..3 {
            for seq in 0..4u16 {
                receiver.on_packet(data(seq, "mm"), &mut host);
            }
            assert_eq!(receiver.stats().delivered, (round + 1) * 4);
        }
        assert_eq!(receiver.expecting(), 0);
    }
}
