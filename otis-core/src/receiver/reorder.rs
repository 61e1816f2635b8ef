use crate::packet::Packet;

/// Received-but-undelivered packets, slotted directly by sequence number.
///
/// One slot per sequence number in the space; lookup, insertion, and the
/// contiguous-run scan all index directly by sequence number.
#[derive(Debug)]
pub struct ReorderBuffer {
    slots: Vec<Option<Packet>>,
}

impl ReorderBuffer {
    pub fn new(limit_seq_no: u16) -> Self {
        Self {
            slots: vec![None; usize::from(limit_seq_no)],
        }
    }

    pub fn contains(&self, seq: u16) -> bool {
        self.slots[usize::from(seq)].is_some()
    }

    pub fn insert(&mut self, packet: Packet) {
        debug_assert!(!self.contains(packet.seq));
        let slot = usize::from(packet.seq);
        self.slots[slot] = Some(packet);
    }

    pub fn take(&mut self, seq: u16) -> Option<Packet> {
        self.slots[usize::from(seq)].take()
    }

    /// Occupied slot count.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Sequence numbers currently buffered.
    #[allow(unused)]
    pub fn occupied(&self) -> impl Iterator<Item = u16> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(seq, _)| seq as u16)
    }
}
