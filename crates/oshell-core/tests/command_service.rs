//! Dispatch behaviour of the command service.

use oshell_core::ShellError;
use oshell_testing::{completes_within, Fixtures, StubHandler};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::test]
async fn run_invokes_the_matching_handler_with_its_args() {
    let first = Arc::new(StubHandler::new("stubcmd", true));
    let second = Arc::new(StubHandler::new("stubcmd2", true));
    let service = Fixtures::stub_service(&[first.clone(), second.clone()]).unwrap();

    assert!(service.run("stubcmd arg1 arg2 arg3").await.unwrap());
    assert_eq!(first.calls(), vec!["arg1 arg2 arg3".to_string()]);
    assert_eq!(second.call_count(), 0);

    assert!(service.run("stubcmd2").await.unwrap());
    assert_eq!(second.calls(), vec![String::new()]);
}

#[tokio::test]
async fn handler_result_passes_through_unchanged() {
    let failing = Arc::new(StubHandler::new("nope", false));
    let service = Fixtures::stub_service(&[failing]).unwrap();

    assert!(!service.run("nope please").await.unwrap());
}

#[tokio::test]
async fn empty_command_is_invalid_argument() {
    let stub = Arc::new(StubHandler::new("stubcmd", true));
    let service = Fixtures::stub_service(&[stub.clone()]).unwrap();

    for spec in ["", "   ", "\t\r\n"] {
        let err = service.run(spec).await.unwrap_err();
        assert!(
            matches!(err, ShellError::InvalidArgument { param: "command_spec", .. }),
            "unexpected error for {spec:?}: {err:?}"
        );
    }
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn unknown_command_carries_original_input() {
    let service = Fixtures::stub_service(&[Arc::new(StubHandler::new("stubcmd", true))]).unwrap();

    match service.run("unknowncmd a b").await.unwrap_err() {
        ShellError::InvalidCommand { input } => assert_eq!(input, "unknowncmd a b"),
        other => panic!("unexpected error: {other:?}"),
    }

    match service.run("  unknowncmd a b ").await.unwrap_err() {
        ShellError::InvalidCommand { input } => assert_eq!(input, "  unknowncmd a b "),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_handler_does_not_block_fast_one() {
    let slow = Arc::new(StubHandler::new("slow", false).with_delay(Duration::from_secs(5)));
    let fast = Arc::new(StubHandler::new("fast", true));
    let service = Fixtures::stub_service(&[slow.clone(), fast.clone()]).unwrap();

    let started = Instant::now();
    let background = Arc::clone(&service);
    let slow_run = tokio::spawn(async move { background.run("slow arg").await });

    let fast_result = completes_within(Duration::from_secs(1), service.run("fast arg"))
        .await
        .unwrap()
        .unwrap();

    assert!(fast_result);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(!slow_run.is_finished());
    slow_run.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatches_of_one_command_keep_their_args() {
    let stub = Arc::new(StubHandler::new("echo", true).with_delay(Duration::from_millis(20)));
    let service = Fixtures::stub_service(&[stub.clone()]).unwrap();

    let runs: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.run(&format!("echo {}", i)).await })
        })
        .collect();
    for run in runs {
        assert!(run.await.unwrap().unwrap());
    }

    let mut calls = stub.calls();
    calls.sort_by_key(|c| c.parse::<u32>().unwrap());
    let expected: Vec<String> = (0..16).map(|i| i.to_string()).collect();
    assert_eq!(calls, expected);
}
