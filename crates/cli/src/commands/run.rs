//! `quanta run` — Exercise the facade end to end.

use std::path::PathBuf;
use std::time::Duration;

use quanta_core::{HEARTBEAT_TOPIC, Signal};
use quanta_synapse::QuantaSynapse;
use tracing::info;

const TEST_TOPIC: &str = "test.topic";

pub async fn run(
    path: Option<PathBuf>,
    duration_secs: u64,
    heartbeat_ms: Option<u64>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = super::load_settings(path)?;
    if let Some(ms) = heartbeat_ms {
        if ms == 0 {
            return Err("--heartbeat-ms must be > 0".into());
        }
        settings.heartbeat.interval_ms = ms;
    }

    let synapse = QuantaSynapse::with_settings(settings);

    synapse.set_on_connected(|| println!("✅ Connection established"));
    synapse.set_on_disconnected(|| println!("🔌 Connection closed"));
    synapse.set_on_error(|message| eprintln!("❌ {message}"));

    info!(topics = ?[TEST_TOPIC, HEARTBEAT_TOPIC], "Subscribing");
    synapse.subscribe(TEST_TOPIC, move |s: &Signal| print_signal("message", s, json));
    synapse.subscribe(HEARTBEAT_TOPIC, move |s: &Signal| print_signal("heartbeat", s, json));

    synapse.connect().await;

    let greeting = Signal::new("main_app", "greeting", "Hello, QuantaSynapse!");
    synapse.publish(TEST_TOPIC, greeting);

    info!(duration_secs, "Observing heartbeats");
    tokio::time::sleep(Duration::from_secs(duration_secs)).await;

    synapse.disconnect().await;

    let metrics = synapse.metrics();
    println!("📊 Final metrics");
    println!("  Messages sent:     {}", metrics.messages_sent);
    println!("  Messages received: {}", metrics.messages_received);

    Ok(())
}

fn print_signal(kind: &str, signal: &Signal, json: bool) {
    if json {
        match serde_json::to_string(signal) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("❌ Failed to encode signal: {e}"),
        }
        return;
    }

    println!("📨 Received {kind}:");
    println!("  Sender:    {}", signal.sender);
    println!("  Type:      {}", signal.signal_type);
    println!("  Content:   '{}'", signal.content);
    println!("  Timestamp: {}", signal.timestamp.to_rfc3339());
}
