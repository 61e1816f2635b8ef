//! The sending side of the transfer engine.
//!
//! The sender reacts to three events: the application handing down a
//! message, an acknowledgment arriving from the channel, and its
//! retransmission timer expiring. Windowing and sequence issuance live in
//! the `SendWindow`; this module holds the state machine.

mod window;

use crate::{
    config::Config,
    endpoint::{Endpoint, Host},
    message::Message,
    packet::Packet,
    stats::SenderStats,
};
use window::SendWindow;

/// The sender's two states, derived from window occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderStatus {
    /// No unacknowledged packet; no timer running.
    Idle,
    /// At least one unacknowledged packet; the timer covers the oldest.
    Awaiting,
}

/// The sender state machine.
#[derive(Debug)]
pub struct Sender {
    config: Config,
    window: SendWindow,
    /// Piggybacked onto outgoing data packets. Data flows one way through
    /// this engine, so it never advances past its initial value.
    ack_no: u16,
    timer_running: bool,
    stats: SenderStats,
}

impl Sender {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            window: SendWindow::new(config.window_size(), config.limit_seq_no()),
            ack_no: 0,
            timer_running: false,
            stats: SenderStats::default(),
        }
    }

    /// The application handed down a message to transmit.
    ///
    /// The packet gets the next sequence number either way; if the window is
    /// full it waits in the backlog until acknowledgments open a slot.
    pub fn on_message(&mut self, message: Message, host: &mut dyn Host) {
        let seq = self.window.issue_seq();
        let packet = Packet::data(seq, self.ack_no, message);
        if self.window.has_capacity() {
            self.transmit_fresh(packet, host);
        } else {
            tracing::trace!(seq, "window full, backlogging");
            self.window.push_backlog(packet);
        }
    }

    /// An acknowledgment arrived from the channel.
    fn on_ack(&mut self, packet: Packet, host: &mut dyn Host) {
        if self.window.is_empty() {
            tracing::trace!(ack = packet.ack, "ignoring ack with an empty window");
            return;
        }
        if !packet.verify() {
            // Indistinguishable from the ack never arriving; the timer will
            // recover.
            self.stats.corrupted += 1;
            tracing::debug!(ack = packet.ack, "dropping corrupted ack");
            return;
        }
        match self.window.ack_distance(packet.ack) {
            Some(dist) if usize::from(dist) < self.window.len() => {
                self.accept_cumulative(dist, host)
            }
            _ => {
                // Older than the oldest in-flight packet: the receiver is
                // still missing it.
                tracing::debug!(ack = packet.ack, "stale ack, fast retransmit");
                self.retransmit_oldest(host);
            }
        }
    }

    /// Removes everything up to and including the acknowledged packet,
    /// samples its timings, refills from the backlog, and settles the timer.
    fn accept_cumulative(&mut self, dist: u16, host: &mut dyn Host) {
        let now = host.now();
        for _ in 0..=dist {
            if let Some(entry) = self.window.pop_oldest() {
                if let Some(sent_at) = entry.sent_at {
                    self.stats.rtt_sum += now - sent_at;
                    self.stats.rtt_samples += 1;
                }
                self.stats.comm_time_sum += now - entry.first_sent;
                self.stats.comm_time_samples += 1;
            }
        }
        while self.window.has_capacity() {
            let Some(packet) = self.window.pop_backlog() else {
                break;
            };
            tracing::trace!(seq = packet.seq, "admitting from backlog");
            self.transmit_fresh(packet, host);
        }
        if self.window.is_empty() {
            self.halt_timer(host);
        } else {
            self.restart_timer(host);
        }
    }

    fn transmit_fresh(&mut self, packet: Packet, host: &mut dyn Host) {
        self.window.admit(packet.clone(), host.now());
        self.stats.originals += 1;
        host.send_to_channel(packet);
        self.restart_timer(host);
    }

    fn retransmit_oldest(&mut self, host: &mut dyn Host) {
        if let Some(oldest) = self.window.oldest_mut() {
            oldest.sent_at = None;
            let packet = oldest.packet.clone();
            self.stats.retransmissions += 1;
            host.send_to_channel(packet);
            self.restart_timer(host);
        }
    }

    /// Stop-if-running-then-start, so the host never sees a second start
    /// while a timer is outstanding.
    fn restart_timer(&mut self, host: &mut dyn Host) {
        if self.timer_running {
            host.stop_timer();
        }
        host.start_timer(self.config.rxmt_interval());
        self.timer_running = true;
    }

    fn halt_timer(&mut self, host: &mut dyn Host) {
        if self.timer_running {
            host.stop_timer();
            self.timer_running = false;
        }
    }

    pub fn status(&self) -> SenderStatus {
        if self.window.is_empty() {
            SenderStatus::Idle
        } else {
            SenderStatus::Awaiting
        }
    }

    /// Unacknowledged packets currently in flight.
    pub fn in_flight(&self) -> usize {
        self.window.len()
    }

    /// Issued packets waiting for a window slot.
    pub fn backlog(&self) -> usize {
        self.window.backlog_len()
    }

    pub fn stats(&self) -> &SenderStats {
        &self.stats
    }
}

impl Endpoint for Sender {
    fn on_packet(&mut self, packet: Packet, host: &mut dyn Host) {
        self.on_ack(packet, host);
    }

    fn on_timer(&mut self, host: &mut dyn Host) {
        self.timer_running = false;
        if self.window.is_empty() {
            tracing::warn!("timer expired with an empty window");
            return;
        }
        tracing::debug!("retransmission timeout");
        self.retransmit_oldest(host);
    }
}
