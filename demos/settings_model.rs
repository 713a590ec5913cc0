//! Typed model example: an editor settings panel
//!
//! Run with `RUST_LOG=modelcell=trace` to see publish events.

use modelcell::{model_state, Model, ModelConfig, Shared};
use tracing_subscriber::EnvFilter;

model_state! {
    #[derive(Clone, Debug, PartialEq)]
    pub struct Settings => SettingsPatch {
        pub theme: String,
        pub font_size: u8,
        pub recent_files: Shared<Vec<String>>,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Settings Model ===\n");

    let model = Model::with_config(
        Settings {
            theme: "dark".to_string(),
            font_size: 12,
            recent_files: Shared::new(Vec::new()),
        },
        ModelConfig::new().label("settings"),
    );

    // Subscribers see the current state right away
    let subscription = model.subscribe(|settings| {
        println!(
            "   [settings] theme={} font={} recent={:?}",
            settings.theme, settings.font_size, *settings.recent_files
        );
    });

    println!("\n1. Bumping the font size");
    model.set_state(SettingsPatch::default().font_size(14));

    println!("\n2. Setting the same font size again (no notification)");
    model.set_state(SettingsPatch::default().font_size(14));

    println!("\n3. Opening a file");
    let mut recent = (*model.read(|s| s.recent_files.clone())).clone();
    recent.push("notes.md".to_string());
    model.set_state(SettingsPatch::default().recent_files(Shared::new(recent)));

    println!("\n4. Unsubscribing, then switching theme silently");
    subscription.dispose();
    model.set_state(SettingsPatch::default().theme("light".to_string()));

    println!("\nFinal state: {:#?}", model.state());
}
