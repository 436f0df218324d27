//! End-to-end integration tests for the QuantaSynapse facade.
//!
//! These tests drive the full path from settings on disk through the
//! connection lifecycle, publish/subscribe fan-out, heartbeats, and metrics.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use quanta_config::SynapseSettings;
use quanta_core::{ConnectionStatus, HEARTBEAT_TOPIC, Signal, SynapseError};
use quanta_synapse::QuantaSynapse;

const PERIOD: Duration = Duration::from_millis(200);

fn settings_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn synapse_from_file() -> QuantaSynapse {
    let file = settings_file(
        r#"
[connection]
host = "quanta.local"
port = 7700
api_key = "sk-test"

[heartbeat]
interval_ms = 200

[node]
identity = "e2e-node"
connect_delay_ms = 50
"#,
    );
    let settings = SynapseSettings::load_from(file.path()).unwrap();
    QuantaSynapse::with_settings(settings)
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_settings_flow_into_facade() {
    let synapse = synapse_from_file();
    let config = synapse.config();
    assert_eq!(config.host, "quanta.local");
    assert_eq!(config.port, 7700);
    assert_eq!(config.timeout_ms, 10_000);

    let senders = Arc::new(Mutex::new(Vec::new()));
    let sink = senders.clone();
    synapse.subscribe(HEARTBEAT_TOPIC, move |s: &Signal| sink.lock().push(s.sender.clone()));

    synapse.connect().await;
    tokio::time::sleep(PERIOD + PERIOD / 2).await;
    synapse.disconnect().await;

    assert_eq!(*senders.lock(), vec!["e2e-node".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn e2e_two_subscribers_one_publish() {
    let synapse = synapse_from_file();
    let order = Arc::new(Mutex::new(Vec::new()));
    for name in ["A", "B"] {
        let order = order.clone();
        synapse.subscribe("t", move |s: &Signal| {
            order.lock().push((name, s.content.clone()));
        });
    }

    synapse.publish("t", Signal::new("main_app", "t", "payload"));

    assert_eq!(
        *order.lock(),
        vec![("A", "payload".to_string()), ("B", "payload".to_string())]
    );
    assert_eq!(synapse.messages_sent(), 1);
    assert_eq!(synapse.messages_received(), 2);
}

#[tokio::test(start_paused = true)]
async fn e2e_five_periods_of_heartbeats() {
    let synapse = synapse_from_file();
    let beats = Arc::new(AtomicUsize::new(0));
    let c = beats.clone();
    synapse.subscribe(HEARTBEAT_TOPIC, move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    synapse.connect().await;
    tokio::time::sleep(PERIOD * 5).await;
    synapse.disconnect().await;
    assert_eq!(synapse.status(), ConnectionStatus::Disconnected);

    let at_disconnect = beats.load(Ordering::SeqCst);
    assert!((4..=6).contains(&at_disconnect), "got {at_disconnect} heartbeats");

    tokio::time::sleep(PERIOD * 5).await;
    assert_eq!(beats.load(Ordering::SeqCst), at_disconnect);
    assert_eq!(synapse.messages_sent(), at_disconnect as u64);
}

#[tokio::test(start_paused = true)]
async fn e2e_demo_flow_metrics() {
    // Mirrors the `quanta run` command: two subscriptions, one greeting, heartbeats
    let synapse = synapse_from_file();
    let greetings = Arc::new(AtomicUsize::new(0));
    let beats = Arc::new(AtomicUsize::new(0));
    let (g, b) = (greetings.clone(), beats.clone());
    synapse.subscribe("test.topic", move |_| {
        g.fetch_add(1, Ordering::SeqCst);
    });
    synapse.subscribe(HEARTBEAT_TOPIC, move |_| {
        b.fetch_add(1, Ordering::SeqCst);
    });

    synapse.connect().await;
    synapse.publish(
        "test.topic",
        Signal::new("main_app", "greeting", "Hello, QuantaSynapse!"),
    );
    tokio::time::sleep(PERIOD * 3 + PERIOD / 2).await;
    synapse.disconnect().await;

    let heartbeats = beats.load(Ordering::SeqCst) as u64;
    assert_eq!(greetings.load(Ordering::SeqCst), 1);
    assert_eq!(heartbeats, 3);
    assert_eq!(synapse.messages_sent(), 1 + heartbeats);
    assert_eq!(synapse.messages_received(), 1 + heartbeats);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_publishers() {
    let synapse = Arc::new(QuantaSynapse::new());
    let delivered = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let d = delivered.clone();
        synapse.subscribe("load", move |_| {
            d.fetch_add(1, Ordering::SeqCst);
        });
    }

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let s = synapse.clone();
            tokio::spawn(async move {
                for n in 0..50 {
                    s.publish("load", Signal::new(format!("producer-{i}"), "load", n.to_string()));
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(synapse.messages_sent(), 400);
    assert_eq!(synapse.messages_received(), 1_200);
    assert_eq!(delivered.load(Ordering::SeqCst), 1_200);
}

#[tokio::test(start_paused = true)]
async fn e2e_error_report_then_recover() {
    let synapse = synapse_from_file();
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    synapse.set_on_error(move |msg| sink.lock().push(msg.to_string()));

    synapse.connect().await;
    synapse.report_error(SynapseError::configuration("port rejected by transport"));
    assert_eq!(synapse.status(), ConnectionStatus::Error);

    synapse.connect().await;
    assert_eq!(synapse.status(), ConnectionStatus::Connected);
    synapse.disconnect().await;

    assert_eq!(errors.lock().len(), 1);
    assert!(errors.lock()[0].contains("port rejected"));
}
