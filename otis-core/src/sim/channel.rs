use super::event::Entity;
use crate::{endpoint::Time, message::Message, packet::Packet};
use rand::{rngs::SmallRng, Rng};

/// The unreliable link between the endpoints: drops, corrupts, and delays
/// packets, but never reorders them.
#[derive(Debug)]
pub struct UnreliableChannel {
    loss: f64,
    corrupt: f64,
    /// Latest scheduled arrival per entity. New arrivals depart no earlier
    /// than this, which keeps the channel FIFO.
    last_arrival: [Time; 2],
}

impl UnreliableChannel {
    /// Probabilities must lie in `[0, 1]`; [`SimConfig`](super::SimConfig)
    /// validation guarantees this for channels it builds.
    pub fn new(loss: f64, corrupt: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&loss));
        debug_assert!((0.0..=1.0).contains(&corrupt));
        Self {
            loss,
            corrupt,
            last_arrival: [0.0; 2],
        }
    }

    /// Decides the fate of one transmission toward `to`: `None` when the
    /// packet is lost, otherwise the arrival time and the possibly corrupted
    /// packet.
    pub fn transit(
        &mut self,
        now: Time,
        to: Entity,
        packet: Packet,
        rng: &mut SmallRng,
    ) -> Option<(Time, Packet)> {
        if rng.gen_bool(self.loss) {
            tracing::trace!(seq = packet.seq, "packet lost in transit");
            return None;
        }
        let mut packet = packet;
        if rng.gen_bool(self.corrupt) {
            corrupt_packet(&mut packet, rng);
            tracing::trace!(seq = packet.seq, "packet corrupted in transit");
        }
        let transit = 1.0 + 9.0 * rng.gen::<f64>();
        let arrival = now.max(self.last_arrival[to.index()]) + transit;
        self.last_arrival[to.index()] = arrival;
        Some((arrival, packet))
    }
}

/// Flips one field: the payload three times out of four, else the sequence
/// number, else the acknowledgment. The checksum is left alone so the
/// mismatch is observable.
fn corrupt_packet(packet: &mut Packet, rng: &mut SmallRng) {
    let which: f64 = rng.gen();
    if which < 0.75 && !packet.payload.is_empty() {
        let mut bytes = packet.payload.to_vec();
        bytes[0] = bytes[0].wrapping_add(1);
        if let Ok(mangled) = Message::new(bytes) {
            packet.payload = mangled;
            return;
        }
    }
    if which < 0.875 {
        packet.seq = packet.seq.wrapping_add(1);
    } else {
        packet.ack = packet.ack.wrapping_add(1);
    }
}
