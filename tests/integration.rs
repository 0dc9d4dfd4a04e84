// SPDX-License-Identifier: MPL-2.0
//! End-to-end timing scenarios on tokio's paused clock.

use error_overlay::capture::{CapturedError, ErrorCapture, Outcome, ReportSeverity};
use error_overlay::config::{self, Config};
use error_overlay::console::{Binding, Channel, Console, ConsoleInterceptor, InterceptMode};
use error_overlay::domain::overlay::{DisplayDuration, ReassertInterval};
use error_overlay::presenter::{self, DrainLoop, PresenterSettings, SharedPresenter};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

fn start(settings: PresenterSettings) -> (ErrorCapture, SharedPresenter, JoinHandle<()>) {
    let capture = ErrorCapture::new();
    let presenter = presenter::shared(settings);
    let task = tokio::spawn(DrainLoop::new(capture.clone(), presenter.clone()).run());
    (capture, presenter, task)
}

fn raise(capture: &ErrorCapture, text: &str) -> Outcome {
    capture.log_error(&CapturedError::new("Error", text), None, ReportSeverity::Error)
}

fn visible_messages(presenter: &SharedPresenter) -> Vec<String> {
    presenter::lock(presenter)
        .visible()
        .map(|n| n.message().to_string())
        .collect()
}

/// Lets the drain loop run without moving the clock by more than a tick.
async fn settle() {
    time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn single_relevant_error_is_shown_for_display_duration() {
    let (capture, presenter, task) = start(PresenterSettings::default());
    let t0 = Instant::now();

    assert_eq!(
        raise(&capture, "SSL certificate verification failed"),
        Outcome::Enqueued { kicked: true }
    );
    settle().await;

    assert_eq!(
        visible_messages(&presenter),
        vec!["Error: SSL certificate verification failed"]
    );

    // The loop goes idle after one empty poll, one rate limit later.
    time::sleep_until(t0 + Duration::from_millis(3_100)).await;
    assert!(!capture.is_displaying());

    time::sleep_until(t0 + Duration::from_millis(9_990)).await;
    assert_eq!(visible_messages(&presenter).len(), 1);

    time::sleep_until(t0 + Duration::from_millis(10_010)).await;
    assert!(visible_messages(&presenter).is_empty());
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn burst_of_five_is_shown_in_order_at_rate_limit_spacing() {
    let settings = PresenterSettings {
        display_duration: DisplayDuration::from_millis(120_000),
        ..PresenterSettings::default()
    };
    let (capture, presenter, task) = start(settings);

    for n in 1..=5 {
        raise(&capture, &format!("tls failure e{n}"));
    }
    assert_eq!(capture.queued_len(), 5);

    time::sleep(Duration::from_millis(12_500)).await;

    let guard = presenter::lock(&presenter);
    let mounted: Vec<(String, Instant)> = guard
        .visible()
        .map(|n| (n.message().to_string(), n.mounted_at()))
        .collect();
    drop(guard);

    let order: Vec<&str> = mounted.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "Error: tls failure e1",
            "Error: tls failure e2",
            "Error: tls failure e3",
            "Error: tls failure e4",
            "Error: tls failure e5",
        ]
    );
    for pair in mounted.windows(2) {
        assert!(pair[1].1 - pair[0].1 >= Duration::from_millis(3_000));
    }
    assert_eq!(capture.queued_len(), 0);
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn irrelevant_error_is_never_shown() {
    let (capture, presenter, task) = start(PresenterSettings::default());

    assert_eq!(
        raise(&capture, "TypeError: cannot read property 'price' of undefined"),
        Outcome::Dropped
    );
    time::sleep(Duration::from_secs(15)).await;

    assert!(visible_messages(&presenter).is_empty());
    assert_eq!(capture.queued_len(), 0);
    assert!(!capture.is_displaying());
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn manual_dismissal_removes_only_that_notification() {
    let (capture, presenter, task) = start(PresenterSettings::default());
    let t0 = Instant::now();

    raise(&capture, "certificate expired");
    raise(&capture, "https downgrade blocked");
    settle().await;

    time::sleep_until(t0 + Duration::from_millis(2_000)).await;
    let first = presenter::lock(&presenter)
        .visible()
        .next()
        .map(|n| n.id())
        .expect("first notification mounted");
    assert!(presenter::lock(&presenter).dismiss(first));
    assert!(visible_messages(&presenter).is_empty());

    // The second error still appears on schedule and keeps its own timer.
    time::sleep_until(t0 + Duration::from_millis(3_010)).await;
    assert_eq!(visible_messages(&presenter), vec!["Error: https downgrade blocked"]);

    time::sleep_until(t0 + Duration::from_millis(12_990)).await;
    assert_eq!(visible_messages(&presenter).len(), 1);
    time::sleep_until(t0 + Duration::from_millis(13_010)).await;
    assert!(visible_messages(&presenter).is_empty());
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn error_raised_mid_drain_joins_the_running_loop() {
    let (capture, presenter, task) = start(PresenterSettings::default());
    let t0 = Instant::now();

    raise(&capture, "tls one");
    settle().await;
    time::sleep_until(t0 + Duration::from_millis(1_000)).await;

    assert_eq!(raise(&capture, "tls two"), Outcome::Enqueued { kicked: false });
    assert_eq!(visible_messages(&presenter).len(), 1);

    time::sleep_until(t0 + Duration::from_millis(3_010)).await;
    assert_eq!(
        visible_messages(&presenter),
        vec!["Error: tls one", "Error: tls two"]
    );
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn reassertion_silences_late_bindings() {
    let console = Arc::new(Console::new());
    let interceptor = Arc::new(ConsoleInterceptor::new(console.clone(), InterceptMode::Proxy));

    let first = interceptor.apply();
    assert!(first.rewritten > 0);
    assert_eq!(interceptor.apply().rewritten, 0);

    let task = tokio::spawn(
        interceptor
            .clone()
            .run_reassertion(ReassertInterval::from_millis(1_000)),
    );

    // A library rebinds a channel and registers its own after startup.
    console.bind(Channel::Log, Binding::emit(|_| {}));
    console.bind_extension("vendorMetrics", Binding::emit(|_| {}));
    assert!(!console.is_silent());

    time::sleep(Duration::from_millis(1_050)).await;
    assert!(console.is_silent());
    task.abort();
}

#[tokio::test(start_paused = true)]
async fn presenter_settings_load_from_config_dir() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(
        dir.path().join("settings.toml"),
        "[overlay]\nrate_limit_ms = 1000\ndisplay_duration_ms = 2000\n",
    )
    .expect("Failed to write settings");

    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    assert_ne!(config, Config::default());

    let (capture, presenter, task) = start(PresenterSettings::from_config(&config.overlay));
    let t0 = Instant::now();
    raise(&capture, "tls a");
    raise(&capture, "tls b");

    time::sleep_until(t0 + Duration::from_millis(1_010)).await;
    assert_eq!(visible_messages(&presenter).len(), 2);
    time::sleep_until(t0 + Duration::from_millis(2_010)).await;
    assert_eq!(visible_messages(&presenter), vec!["Error: tls b"]);
    task.abort();
}
