// Run with: cargo run --example debug_scan -- [file_name] [time_scale]
// Prints every sequencer message with wall-clock offsets, then the generated result.

use apkguard_core::{ScanMessage, Sequencer, SequencerConfig, generate_with_thread_rng};
use std::time::Instant;
use uuid::Uuid;

fn main() {
    let mut args = std::env::args().skip(1);
    let file_name = args.next().unwrap_or_else(|| "debug_app.apk".to_string());
    let time_scale = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.1);

    println!("Scanning: {file_name} (time scale {time_scale})");

    let sequencer = Sequencer::new(SequencerConfig {
        time_scale,
        ..Default::default()
    });
    let (rx, handle) = sequencer.spawn();

    let start = Instant::now();
    let mut emissions = 0u32;
    let mut last_percent = 0.0;

    for msg in rx {
        let elapsed = start.elapsed().as_secs_f64();
        match msg {
            ScanMessage::PhaseStarted { index, name } => {
                println!("[{elapsed:>6.2}s] phase {index}: {name}");
            }
            ScanMessage::Progress(state) => {
                emissions += 1;
                if state.percent < last_percent {
                    println!("[{elapsed:>6.2}s] WARNING: progress went backwards");
                }
                last_percent = state.percent;
            }
            ScanMessage::Completed => {
                println!("[{elapsed:>6.2}s] completed after {emissions} progress updates");
                break;
            }
            ScanMessage::Cancelled => {
                println!("[{elapsed:>6.2}s] cancelled");
                break;
            }
        }
    }

    let outcome = handle.join().expect("sequencer thread panicked");
    println!("Outcome: {outcome:?}, final progress {last_percent:.1}%");

    let result = generate_with_thread_rng(Uuid::new_v4(), &file_name, 10_000_000);
    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("result serializes")
    );
}
