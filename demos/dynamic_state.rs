//! Dynamic state example: a string-keyed model consumed as a stream

use futures::executor::block_on;
use futures::StreamExt;
use modelcell::{state_map, Model, StateError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), StateError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Dynamic State ===\n");

    let model = Model::new(state_map! {
        "status" => "idle",
        "progress" => 0,
    });

    let observable = model.to_observable();
    let states = observable.stream();

    // A callback subscriber alongside the stream
    let _log = observable.subscribe(|state| println!("   [callback] {state}"));

    for step in [25, 50, 50, 100] {
        model.set_state(state_map! { "status" => "running", "progress" => step });
    }
    model.set_state(state_map! { "status" => "done" });

    println!("\nStream replay:");
    let collected = block_on(states.take(5).collect::<Vec<_>>());
    for state in &collected {
        println!("   [stream] {state}");
    }

    let last = model.state();
    let progress: i64 = last.get_as("progress")?;
    let status: String = last.get_as("status")?;
    println!("\nFinished with status={status} progress={progress}");

    // Typed reads report what went wrong
    if let Err(err) = last.get_as::<bool>("status") {
        println!("Expected error: {err}");
    }

    Ok(())
}
