//! Transfer statistics.
//!
//! Each state machine owns its side's counters; the two never share state.
//! A [`Report`] merges both sides at the end of a run and derives the
//! ratios and averages.

use crate::endpoint::Time;
use std::fmt::{self, Display};

/// Counters and timing accumulators maintained by the sender.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SenderStats {
    /// Packets transmitted for the first time.
    pub originals: u64,
    /// Packets transmitted again after a timeout or a stale acknowledgment.
    pub retransmissions: u64,
    /// Acknowledgments that arrived with a bad checksum.
    pub corrupted: u64,
    /// Sum of send-to-acknowledgment spans for packets acknowledged without
    /// an intervening retransmission.
    pub rtt_sum: Time,
    pub rtt_samples: u64,
    /// Sum of first-transmission-to-acknowledgment spans for every
    /// acknowledged packet.
    pub comm_time_sum: Time,
    pub comm_time_samples: u64,
}

/// Counters maintained by the receiver.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Payloads delivered to the application.
    pub delivered: u64,
    /// Acknowledgments handed to the channel.
    pub acks_sent: u64,
    /// Data packets that arrived with a bad checksum.
    pub corrupted: u64,
}

/// Merged end-of-run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub sender: SenderStats,
    pub receiver: ReceiverStats,
}

impl Report {
    pub fn new(sender: SenderStats, receiver: ReceiverStats) -> Self {
        Self { sender, receiver }
    }

    /// Every packet handed to the channel by either endpoint.
    pub fn total_transmissions(&self) -> u64 {
        self.sender.originals + self.sender.retransmissions + self.receiver.acks_sent
    }

    /// Corrupted receptions observed at either endpoint.
    pub fn corrupted(&self) -> u64 {
        self.sender.corrupted + self.receiver.corrupted
    }

    /// Fraction of transmissions presumed lost: each retransmission
    /// evidences one transmission that timed out, minus those explained by
    /// an observed corruption.
    pub fn lost_ratio(&self) -> f64 {
        let timed_out = self.sender.retransmissions.saturating_sub(self.corrupted());
        ratio(timed_out, self.total_transmissions())
    }

    /// Fraction of transmissions that arrived corrupted.
    pub fn corrupted_ratio(&self) -> f64 {
        ratio(self.corrupted(), self.total_transmissions())
    }

    /// Mean round-trip time over clean samples, if any were recorded.
    pub fn average_rtt(&self) -> Option<Time> {
        (self.sender.rtt_samples > 0).then(|| self.sender.rtt_sum / self.sender.rtt_samples as f64)
    }

    /// Mean span from a packet's first transmission to its acknowledgment.
    pub fn average_communication_time(&self) -> Option<Time> {
        (self.sender.comm_time_samples > 0)
            .then(|| self.sender.comm_time_sum / self.sender.comm_time_samples as f64)
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "===============STATISTICS=======================")?;
        writeln!(
            f,
            "Number of original packets transmitted by A: {}",
            self.sender.originals
        )?;
        writeln!(
            f,
            "Number of retransmissions by A: {}",
            self.sender.retransmissions
        )?;
        writeln!(
            f,
            "Number of data packets delivered to the application at B: {}",
            self.receiver.delivered
        )?;
        writeln!(
            f,
            "Number of ACK packets sent by B: {}",
            self.receiver.acks_sent
        )?;
        writeln!(f, "Number of corrupted packets: {}", self.corrupted())?;
        writeln!(f, "Ratio of lost packets: {:.3}", self.lost_ratio())?;
        writeln!(f, "Ratio of corrupted packets: {:.3}", self.corrupted_ratio())?;
        writeln!(
            f,
            "Average RTT: {:.3}",
            self.average_rtt().unwrap_or(0.0)
        )?;
        writeln!(
            f,
            "Average communication time: {:.3}",
            self.average_communication_time().unwrap_or(0.0)
        )?;
        write!(f, "==================================================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> Report {
        Report::new(
            SenderStats {
                originals: 10,
                retransmissions: 4,
                corrupted: 1,
                rtt_sum: 30.0,
                rtt_samples: 6,
                comm_time_sum: 100.0,
                comm_time_samples: 10,
            },
            ReceiverStats {
                delivered: 10,
                acks_sent: 11,
                corrupted: 2,
            },
        )
    }

    #[test]
    fn derived_ratios() {
        let report = report();
        assert_eq!(report.total_transmissions(), 25);
        assert_eq!(report.corrupted(), 3);
        // 4 retransmissions, 3 explained by corruption, so 1 presumed lost.
        assert!((report.lost_ratio() - 1.0 / 25.0).abs() < 1e-9);
        assert!((report.corrupted_ratio() - 3.0 / 25.0).abs() < 1e-9);
    }

    #[test]
    fn averages() {
        let report = report();
        assert_eq!(report.average_rtt(), Some(5.0));
        assert_eq!(report.average_communication_time(), Some(10.0));
    }

    #[test]
    fn empty_run_has_no_ratios() {
        let report = Report::new(SenderStats::default(), ReceiverStats::default());
        assert_eq!(report.lost_ratio(), 0.0);
        assert_eq!(report.corrupted_ratio(), 0.0);
        assert_eq!(report.average_rtt(), None);
    }

    #[test]
    fn more_corruptions_than_retransmissions_clamps_to_zero() {
        let mut report = report();
        report.sender.retransmissions = 1;
        assert_eq!(report.lost_ratio(), 0.0);
    }
}
