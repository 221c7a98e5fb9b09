// In demos/spsc_pingpong.rs
//
// cargo run --example spsc_pingpong -- [rounds]
use cycle_sync::SPSC::ChannelBuilder;
use std::env;
use std::thread;
use std::time::Instant;

fn main() -> cycle_sync::Result<()> {
    let rounds: u64 = env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1_000_000);

    let (mut ping_tx, mut ping_rx) = ChannelBuilder::new().with_capacity(64).build::<u64>()?;
    let (mut pong_tx, mut pong_rx) = ChannelBuilder::new().with_capacity(64).build::<u64>()?;

    let echo = thread::Builder::new()
        .name("echo".into())
        .spawn(move || {
            for _ in 0..rounds {
                let value = loop {
                    if let Some(v) = ping_rx.pop() {
                        break v;
                    }
                    std::hint::spin_loop();
                };
                while pong_tx.push(value + 1).is_err() {
                    std::hint::spin_loop();
                }
            }
        })
        .expect("Error spawning echo thread");

    println!("PingPong: {} round trips over two rings", rounds);
    let start = Instant::now();
    for i in 0..rounds {
        while ping_tx.push(i).is_err() {
            std::hint::spin_loop();
        }
        let reply = loop {
            if let Some(v) = pong_rx.pop() {
                break v;
            }
            std::hint::spin_loop();
        };
        assert_eq!(reply, i + 1);
    }
    let elapsed = start.elapsed();
    echo.join().expect("echo thread panicked");

    println!(
        "PingPong: {:.2?} total, {:.0} ns per round trip",
        elapsed,
        elapsed.as_nanos() as f64 / rounds.max(1) as f64
    );
    Ok(())
}
