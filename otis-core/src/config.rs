//! Engine configuration.

use crate::endpoint::Time;

/// Parameters fixed at construction for both endpoints of a transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    window_size: u16,
    rxmt_interval: Time,
}

impl Config {
    /// Validates and builds a configuration. The window must hold at least
    /// one packet and leave room for `2 × window_size` sequence numbers; the
    /// retransmission interval must be positive.
    pub fn new(window_size: u16, rxmt_interval: Time) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if window_size > u16::MAX / 2 {
            return Err(ConfigError::WindowTooLarge(window_size));
        }
        if !(rxmt_interval > 0.0) || !rxmt_interval.is_finite() {
            return Err(ConfigError::NonPositiveInterval(rxmt_interval));
        }
        Ok(Self {
            window_size,
            rxmt_interval,
        })
    }

    /// How many unacknowledged packets the sender may have in flight.
    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    /// The modulus bounding all sequence arithmetic.
    pub fn limit_seq_no(&self) -> u16 {
        self.window_size * 2
    }

    /// The retransmission timeout.
    pub fn rxmt_interval(&self) -> Time {
        self.rxmt_interval
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("the window must hold at least one packet")]
    ZeroWindow,
    #[error("window size {0} exceeds the representable maximum of 32767")]
    WindowTooLarge(u16),
    #[error("the retransmission interval must be positive, got {0}")]
    NonPositiveInterval(Time),
}
