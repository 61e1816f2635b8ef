//! The wire unit exchanged over the simulated channel.

use crate::{checksum::Checksum, message::Message};

/// A packet in transit between the endpoints.
///
/// A packet is a value type: it has no identity beyond its field contents,
/// and it crosses the channel by copy. The three integer fields plus the
/// bounded payload are the entire interoperability contract between sender
/// and receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    /// Sequence number, modulo `LimitSeqNo`.
    pub seq: u16,
    /// Cumulative acknowledgment, modulo `LimitSeqNo`.
    pub ack: u16,
    /// Additive checksum over the other three fields.
    pub checksum: u32,
    /// Application payload; empty on pure acknowledgments.
    pub payload: Message,
}

impl Packet {
    /// Builds a data packet, embedding the computed checksum.
    pub fn data(seq: u16, ack: u16, payload: Message) -> Self {
        let checksum = compute(seq, ack, &payload);
        Self {
            seq,
            ack,
            checksum,
            payload,
        }
    }

    /// Builds a payload-less cumulative acknowledgment.
    pub fn ack(ack: u16) -> Self {
        Self::data(0, ack, Message::default())
    }

    /// Recomputes the checksum and compares it to the embedded value.
    pub fn verify(&self) -> bool {
        compute(self.seq, self.ack, &self.payload) == self.checksum
    }
}

/// The additive checksum over a packet's fields: `seq + ack` plus each
/// payload byte.
fn compute(seq: u16, ack: u16, payload: &Message) -> u32 {
    let mut checksum = Checksum::new();
    checksum.add_u16(seq);
    checksum.add_u16(ack);
    checksum.accumulate_remainder(payload.iter());
    checksum.value()
}
