//! OTIS, the Ordered Transfer over an Imperfect channel Simulator: a library
//! for studying reliable data transfer over a link that loses, corrupts, and
//! delays packets but never reorders them.
//!
//! # Uses
//!
//! - Educators can use OTIS as a pedagogical tool. Students can watch a
//!   sliding-window protocol recover from loss and corruption, experiment
//!   with window sizes and timeout values, and compare stop-and-wait against
//!   Selective-Repeat behavior, all inside a deterministic simulation.
//! - Protocol experiments: the engine is driven entirely through a narrow
//!   host contract, so alternative schedulers and channel models can be
//!   swapped in without touching the state machines.
//!
//! # Organization
//!
//! - [`Message`] and [`Packet`](packet::Packet) are the application and wire
//!   units
//! - [`Sender`] and [`Receiver`] implement the two protocol state machines
//! - [`Host`](endpoint::Host) and [`Endpoint`](endpoint::Endpoint) form the
//!   contract between the engine and whatever drives it
//! - [`sim`] provides the discrete-event scheduler and unreliable channel
//!   that exercise the engine end to end
//!
//! # Protocol structure
//!
//! The sender admits application messages into a bounded window of
//! unacknowledged packets, queueing the overflow in a backlog, and
//! retransmits the oldest in-flight packet when its timer expires or a stale
//! acknowledgment hints at a loss. The receiver buffers any packet inside
//! its acceptance window, delivers contiguous runs upward in order, and
//! answers every accepted packet with a cumulative acknowledgment. All
//! sequence arithmetic wraps at twice the window size.

pub mod checksum;
pub mod config;
pub mod endpoint;
pub mod message;
pub mod modular;
pub mod packet;
pub mod receiver;
pub mod sender;
pub mod sim;
pub mod stats;

pub use config::Config;
pub use endpoint::{Endpoint, Host, Time};
pub use message::Message;
pub use packet::Packet;
pub use receiver::Receiver;
pub use sender::Sender;
pub use stats::Report;

#[cfg(test)]
pub(crate) mod testing;
