use ntest::timeout;
use otis_core::{
    sim::{SimConfig, Simulation, Summary},
    Config,
};

fn run(window: u16, loss: f64, corrupt: f64, seed: u64) -> Summary {
    let config = Config::new(window, 50.0).unwrap();
    let simulation = Simulation::new(
        config,
        SimConfig {
            messages: 30,
            loss,
            corrupt,
            mean_interarrival: 30.0,
            seed,
        },
    )
    .unwrap();
    simulation.run()
}

#[test]
#[timeout(60000)]
fn unreliable() {
    let summary = run(8, 0.3, 0.3, 0xBAD5EED);

    // The channel mangles almost half of all traffic, yet the application
    // still sees every payload exactly once, in order.
    assert_eq!(summary.delivered, summary.sent);
    assert!(summary.report.sender.retransmissions > 0);
    assert!(summary.report.corrupted() > 0);
    assert!(summary.report.lost_ratio() < 1.0);
}

#[test]
#[timeout(60000)]
fn stop_and_wait_under_loss() {
    let summary = run(1, 0.2, 0.0, 42);
    assert_eq!(summary.delivered, summary.sent);
    assert!(summary.report.sender.retransmissions > 0);
}

#[test]
#[timeout(60000)]
fn delivery_survives_many_seeds() {
    for seed in 0..10 {
        let summary = run(4, 0.25, 0.25, seed);
        assert_eq!(
            summary.delivered, summary.sent,
            "seed {seed} broke in-order delivery"
        );
    }
}
