mod common;

use common::FakeHost;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use themeapp::events::{REFRESH_END, REFRESH_START};
use themeapp::refresh::{OnError, OnSuccess};
use themeapp::{Config, EventEnvelope, EventType, RefreshMode, ThemeApp};

type Log = Rc<RefCell<Vec<String>>>;

fn watch_refresh(theme: &ThemeApp) -> Log {
    let log: Log = Rc::default();
    for name in [REFRESH_START, REFRESH_END] {
        let sink = Rc::clone(&log);
        theme.on(name, move |envelope: &EventEnvelope| {
            sink.borrow_mut().push(envelope.event.clone());
        });
    }
    log
}

fn callbacks(log: &Log, label: &'static str) -> (Option<OnSuccess>, Option<OnError>) {
    let ok = Rc::clone(log);
    let err = Rc::clone(log);
    (
        Some(Box::new(move || ok.borrow_mut().push(format!("{label} ok")))),
        Some(Box::new(move |error: EventEnvelope| {
            err.borrow_mut().push(format!("{label} failed: {}", error.message));
        })),
    )
}

#[test]
fn successful_refresh_runs_the_whole_workflow() {
    let host = FakeHost::new();
    let theme = host.theme();
    let log = watch_refresh(&theme);
    let (on_success, on_error) = callbacks(&log, "first");

    theme.refresh(on_success, on_error);
    assert!(theme.is_refreshing());
    assert_eq!(*log.borrow(), vec![REFRESH_START]);

    host.finish_sync(Ok(()));

    assert!(!theme.is_refreshing());
    assert_eq!(*log.borrow(), vec![REFRESH_START, REFRESH_END, "first ok"]);
    assert_eq!(
        *host.calls.borrow(),
        vec![
            "sync",
            "build-menu",
            "reset-default-route",
            "default-route",
            "restart-history"
        ]
    );
}

#[test]
fn failed_sync_reports_before_ending() {
    let host = FakeHost::new();
    let theme = host.theme();
    let log = watch_refresh(&theme);
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&errors);
    let (on_success, _) = callbacks(&log, "first");

    theme.refresh(
        on_success,
        Some(Box::new(move |error: EventEnvelope| sink.borrow_mut().push(error))),
    );
    host.finish_sync(Err(json!({"type": "ajax"})));

    assert!(!theme.is_refreshing());
    assert_eq!(*log.borrow(), vec![REFRESH_START, REFRESH_END]);
    assert_eq!(*host.calls.borrow(), vec!["sync"]);

    let errors = errors.borrow();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].event, "error");
    assert_eq!(errors[0].event_type, EventType::Error);
    assert_eq!(errors[0].data, json!({"type": "ajax"}));
}

#[test]
fn overlapping_calls_share_one_refresh() {
    let host = FakeHost::new();
    let theme = host.theme();
    let log = watch_refresh(&theme);
    let (first_ok, first_err) = callbacks(&log, "first");
    let (second_ok, second_err) = callbacks(&log, "second");

    theme.refresh(first_ok, first_err);
    theme.refresh(second_ok, second_err);
    assert_eq!(host.pending_syncs(), 1);

    host.finish_sync(Err(json!({"type": "timeout"})));

    assert!(!theme.is_refreshing());
    let log = log.borrow();
    assert_eq!(log[0], REFRESH_START);
    assert_eq!(log.iter().filter(|e| *e == REFRESH_END).count(), 1);
    assert!(log.iter().any(|e| e.starts_with("first failed")));
    assert!(log.iter().any(|e| e.starts_with("second failed")));
}

#[test]
fn concurrent_mode_counts_every_refresh() {
    let host = FakeHost::new();
    let theme = host.theme_with(&Config {
        refresh_mode: RefreshMode::Concurrent,
        ..Config::default()
    });
    let log = watch_refresh(&theme);

    theme.refresh(None, None);
    theme.refresh(None, None);
    theme.refresh(None, None);
    assert_eq!(host.pending_syncs(), 3);

    host.finish_sync(Ok(()));
    assert!(theme.is_refreshing());
    host.finish_sync(Err(json!({"type": "ajax"})));
    assert!(theme.is_refreshing());
    host.finish_latest_sync(Ok(()));
    assert!(!theme.is_refreshing());

    let log = log.borrow();
    assert_eq!(log.iter().filter(|e| *e == REFRESH_START).count(), 3);
    assert_eq!(log.iter().filter(|e| *e == REFRESH_END).count(), 3);
}

#[test]
fn refresh_after_completion_starts_again() {
    let host = FakeHost::new();
    let theme = host.theme();

    theme.refresh(None, None);
    host.finish_sync(Ok(()));
    theme.refresh(None, None);

    assert!(theme.is_refreshing());
    assert_eq!(host.pending_syncs(), 1);
    host.finish_sync(Ok(()));
    assert!(!theme.is_refreshing());
}
