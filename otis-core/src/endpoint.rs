//! The two-sided contract between the engine and its host scheduler.
//!
//! The engine never owns the clock, the wire, or the application boundary.
//! It reacts to events the host hands it through [`Endpoint`] and asks for
//! everything else through [`Host`]. This keeps both state machines
//! unit-testable against a recording host, with no scheduler running.

use crate::{message::Message, packet::Packet};

/// Simulated time, in the host scheduler's units.
pub type Time = f64;

/// Capabilities a host scheduler provides to an endpoint.
///
/// Handlers run to completion before the next event is dispatched, so every
/// call here takes effect in the order it was made.
pub trait Host {
    /// Hands a packet to the unreliable channel for eventual delivery to the
    /// opposite endpoint.
    fn send_to_channel(&mut self, packet: Packet);

    /// Passes a fully reassembled, in-order payload up to the application.
    fn deliver(&mut self, payload: Message);

    /// Schedules a timer expiry `interval` from now. At most one timer may
    /// be outstanding per endpoint; callers stop a running timer before
    /// starting another.
    fn start_timer(&mut self, interval: Time);

    /// Cancels the outstanding timer.
    fn stop_timer(&mut self);

    /// The current simulated time. Read-only; used for statistics sampling.
    fn now(&self) -> Time;
}

/// An endpoint driven by the host's event loop.
pub trait Endpoint {
    /// A packet, possibly corrupted in transit, arrived from the channel.
    fn on_packet(&mut self, packet: Packet, host: &mut dyn Host);

    /// The endpoint's retransmission timer expired.
    fn on_timer(&mut self, host: &mut dyn Host);
}
