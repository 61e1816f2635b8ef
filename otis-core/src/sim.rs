//! A discrete-event harness that runs the transfer engine over the
//! unreliable channel.
//!
//! The harness owns everything the engine treats as external: the clock,
//! the event list, the channel's fault injection, the per-entity timers,
//! and the application traffic source. One event dispatches at a time and
//! its handler runs to completion, so a run is a pure function of its
//! configuration and seed.

mod channel;
mod event;

pub use channel::UnreliableChannel;
pub use event::{Entity, Event, EventKind, EventQueue};

use crate::{
    config::Config,
    endpoint::{Endpoint, Host, Time},
    message::{Message, MAX_PAYLOAD},
    packet::Packet,
    receiver::Receiver,
    sender::Sender,
    stats::Report,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Parameters of one simulation run. The engine's own parameters live in
/// [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Messages generated by the application at A.
    pub messages: u32,
    /// Probability that an individual transmission is dropped in transit.
    pub loss: f64,
    /// Probability that a surviving transmission is corrupted in transit.
    pub corrupt: f64,
    /// Mean simulated time between application messages.
    pub mean_interarrival: Time,
    /// Seed for the run's random source; equal seeds give equal runs.
    pub seed: u64,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if !(0.0..=1.0).contains(&self.loss) {
            return Err(SimConfigError::Loss(self.loss));
        }
        if !(0.0..=1.0).contains(&self.corrupt) {
            return Err(SimConfigError::Corrupt(self.corrupt));
        }
        if !(self.mean_interarrival > 0.0) || !self.mean_interarrival.is_finite() {
            return Err(SimConfigError::Interarrival(self.mean_interarrival));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum SimConfigError {
    #[error("loss probability {0} is outside [0, 1]")]
    Loss(f64),
    #[error("corruption probability {0} is outside [0, 1]")]
    Corrupt(f64),
    #[error("mean inter-arrival time must be positive, got {0}")]
    Interarrival(Time),
}

/// Safety valve for configurations that can never finish, such as a loss
/// probability of one.
const MAX_EVENTS: u64 = 1_000_000;

/// One end-to-end run of the engine under a configured channel.
pub struct Simulation {
    sim: SimConfig,
    clock: Time,
    events: EventQueue,
    channel: UnreliableChannel,
    rng: SmallRng,
    a: Sender,
    b: Receiver,
    timers: [TimerSlot; 2],
    generated: u32,
    sent: Vec<Message>,
    delivered: Vec<Message>,
}

/// Bookkeeping for one entity's single timer. Every start or stop bumps the
/// generation, which lazily cancels the expiry event already in the queue.
#[derive(Debug, Default, Clone, Copy)]
struct TimerSlot {
    running: bool,
    generation: u64,
}

/// What a finished run produced.
#[derive(Debug)]
pub struct Summary {
    pub report: Report,
    /// Payloads the application handed down at A, in order.
    pub sent: Vec<Message>,
    /// Payloads delivered to the application at B, in order.
    pub delivered: Vec<Message>,
    pub finished_at: Time,
}

impl Simulation {
    pub fn new(config: Config, sim: SimConfig) -> Result<Self, SimConfigError> {
        sim.validate()?;
        Ok(Self {
            channel: UnreliableChannel::new(sim.loss, sim.corrupt),
            rng: SmallRng::seed_from_u64(sim.seed),
            sim,
            clock: 0.0,
            events: EventQueue::new(),
            a: Sender::new(config),
            b: Receiver::new(config),
            timers: [TimerSlot::default(); 2],
            generated: 0,
            sent: Vec::new(),
            delivered: Vec::new(),
        })
    }

    /// Runs events to exhaustion and reports what happened.
    pub fn run(mut self) -> Summary {
        self.schedule_next_application_send();
        let mut dispatched: u64 = 0;
        while let Some(event) = self.events.pop() {
            dispatched += 1;
            if dispatched > MAX_EVENTS {
                tracing::warn!("event budget exhausted, ending the run early");
                break;
            }
            self.clock = event.time;
            match event.kind {
                EventKind::FromApplication => self.application_send(),
                EventKind::Arrival { entity, packet } => self.dispatch_packet(entity, packet),
                EventKind::TimerExpiry { entity, generation } => {
                    self.dispatch_timer(entity, generation)
                }
            }
        }
        tracing::info!(
            events = dispatched,
            finished_at = self.clock,
            "simulation drained"
        );
        Summary {
            report: Report::new(self.a.stats().clone(), self.b.stats().clone()),
            sent: self.sent,
            delivered: self.delivered,
            finished_at: self.clock,
        }
    }

    fn schedule_next_application_send(&mut self) {
        if self.generated >= self.sim.messages {
            return;
        }
        // Uniform on [0, 2 * mean), so the configured mean holds.
        let gap = 2.0 * self.sim.mean_interarrival * self.rng.gen::<f64>();
        self.events
            .schedule(self.clock + gap, EventKind::FromApplication);
    }

    fn application_send(&mut self) {
        let message = next_message(self.generated);
        self.generated += 1;
        self.sent.push(message.clone());
        let mut effects = Effects::new(self.clock);
        self.a.on_message(message, &mut effects);
        self.apply(Entity::A, effects);
        self.schedule_next_application_send();
    }

    fn dispatch_packet(&mut self, entity: Entity, packet: Packet) {
        let mut effects = Effects::new(self.clock);
        match entity {
            Entity::A => self.a.on_packet(packet, &mut effects),
            Entity::B => self.b.on_packet(packet, &mut effects),
        }
        self.apply(entity, effects);
    }

    fn dispatch_timer(&mut self, entity: Entity, generation: u64) {
        let slot = &mut self.timers[entity.index()];
        if !slot.running || slot.generation != generation {
            // A stop or restart superseded this expiry while it was queued.
            return;
        }
        slot.running = false;
        let mut effects = Effects::new(self.clock);
        match entity {
            Entity::A => self.a.on_timer(&mut effects),
            Entity::B => self.b.on_timer(&mut effects),
        }
        self.apply(entity, effects);
    }

    /// Applies the host calls one handler made, in the order it made them.
    fn apply(&mut self, entity: Entity, effects: Effects) {
        for op in effects.ops {
            match op {
                Op::Send(packet) => {
                    let to = entity.peer();
                    if let Some((arrival, packet)) =
                        self.channel.transit(self.clock, to, packet, &mut self.rng)
                    {
                        self.events
                            .schedule(arrival, EventKind::Arrival { entity: to, packet });
                    }
                }
                Op::Deliver(payload) => self.delivered.push(payload),
                Op::StartTimer(interval) => {
                    let slot = &mut self.timers[entity.index()];
                    if slot.running {
                        tracing::warn!(?entity, "timer started while already running");
                    }
                    slot.running = true;
                    slot.generation += 1;
                    let generation = slot.generation;
                    self.events.schedule(
                        self.clock + interval,
                        EventKind::TimerExpiry { entity, generation },
                    );
                }
                Op::StopTimer => {
                    let slot = &mut self.timers[entity.index()];
                    if !slot.running {
                        tracing::warn!(?entity, "timer stopped while not running");
                    }
                    slot.running = false;
                    slot.generation += 1;
                }
            }
        }
    }
}

/// The application payload for the `n`th message: a full packet's worth of
/// one letter, cycling through the alphabet.
fn next_message(n: u32) -> Message {
    let letter = b'a' + (n % 26) as u8;
    Message::new([letter; MAX_PAYLOAD]).expect("a MAX_PAYLOAD body is always in bounds")
}

/// Host calls recorded during one handler dispatch, applied afterwards.
struct Effects {
    now: Time,
    ops: Vec<Op>,
}

enum Op {
    Send(Packet),
    Deliver(Message),
    StartTimer(Time),
    StopTimer,
}

impl Effects {
    fn new(now: Time) -> Self {
        Self {
            now,
            ops: Vec::new(),
        }
    }
}

impl Host for Effects {
    fn send_to_channel(&mut self, packet: Packet) {
        self.ops.push(Op::Send(packet));
    }

    fn deliver(&mut self, payload: Message) {
        self.ops.push(Op::Deliver(payload));
    }

    fn start_timer(&mut self, interval: Time) {
        self.ops.push(Op::StartTimer(interval));
    }

    fn stop_timer(&mut self) {
        self.ops.push(Op::StopTimer);
    }

    fn now(&self) -> Time {
        self.now
    }
}
