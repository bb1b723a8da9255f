// tests/poll_dispatch.rs

use gcalcron::engine::{PollDispatcher, TickReport};
use gcalcron::exec::ExecOptions;
use gcalcron::types::StreamTarget;
use gcalcron_test_utils::builders::{CalendarEventBuilder, at, t0, test_settings};
use gcalcron_test_utils::fake_gateway::FakeCalendarGateway;
use gcalcron_test_utils::init_tracing;
use gcalcron_test_utils::recording_executor::RecordingExecutor;

fn dispatcher(
    gateway: &FakeCalendarGateway,
    executor: &RecordingExecutor,
) -> PollDispatcher<FakeCalendarGateway, RecordingExecutor> {
    PollDispatcher::new(
        gateway.clone(),
        executor.clone(),
        &test_settings(),
        ExecOptions::default(),
        t0(),
    )
}

#[tokio::test]
async fn executes_title_command_and_marks_event() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("e1", "echo hi")
            .between(at(10), at(20))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let report = poller.tick_at(at(60)).await;

    assert_eq!(report.dispatched, vec!["e1".to_string()]);
    assert!(report.advanced);
    assert_eq!(poller.last_poll_end(), at(60));

    let commands = executor.dispatched();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].command, "echo hi");
    assert_eq!(commands[0].stdout, StreamTarget::Inherit);

    assert_eq!(
        gateway.patches(),
        vec![("e1".to_string(), "[Executed] echo hi".to_string())]
    );
    assert_eq!(gateway.title_of("e1").as_deref(), Some("[Executed] echo hi"));
    assert!(poller.tracker().is_empty());
}

#[tokio::test]
async fn body_wins_over_title_remainder() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::new("e1")
            .title("Execute: ignored")
            .body("echo from-body")
            .between(at(10), at(20))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    poller.tick_at(at(60)).await;

    assert_eq!(executor.dispatched()[0].command, "echo from-body");
    assert_eq!(gateway.title_of("e1").as_deref(), Some("[Executed] ignored"));
}

#[tokio::test]
async fn marked_event_is_not_dispatched_again_in_overlapping_window() {
    init_tracing();

    // Spans both windows, so the second poll lists it again.
    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("long", "make backup")
            .between(at(30), at(300))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let first = poller.tick_at(at(60)).await;
    let second = poller.tick_at(at(120)).await;

    assert_eq!(first.dispatched, vec!["long".to_string()]);
    assert_eq!(second.fetched, 1);
    assert!(second.dispatched.is_empty());
    assert_eq!(second.skipped, 1);
    assert_eq!(executor.dispatched_ids(), vec!["long".to_string()]);
}

#[tokio::test]
async fn windows_are_contiguous_on_success() {
    init_tracing();

    let gateway = FakeCalendarGateway::new();
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    for end in [60, 120, 180] {
        let report = poller.tick_at(at(end)).await;
        assert!(report.advanced);
    }

    let windows = gateway.list_calls();
    assert_eq!(windows.len(), 3);
    assert_eq!(windows[0].start, t0());
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "gap or overlap between windows");
    }
    assert_eq!(windows[2].end, at(180));
}

#[tokio::test]
async fn fetch_failure_keeps_window_start() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("e1", "echo late")
            .between(at(30), at(40))
            .build(),
    ]);
    gateway.fail_next_lists(1);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let failed: TickReport = poller.tick_at(at(60)).await;
    assert!(failed.fetch_failed);
    assert!(!failed.advanced);
    assert_eq!(poller.last_poll_end(), t0());

    let retried = poller.tick_at(at(120)).await;
    assert_eq!(retried.window.start, failed.window.start);
    assert_eq!(retried.dispatched, vec!["e1".to_string()]);
    assert!(retried.advanced);
    assert_eq!(poller.last_poll_end(), at(120));
}

#[tokio::test]
async fn patch_failure_leaves_event_for_next_tick() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("flaky", "echo one")
            .between(at(10), at(20))
            .build(),
        CalendarEventBuilder::execute("fine", "echo two")
            .between(at(10), at(20))
            .build(),
    ]);
    gateway.fail_patches_for("flaky");
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let first = poller.tick_at(at(60)).await;
    assert_eq!(first.failed, vec!["flaky".to_string()]);
    assert_eq!(first.dispatched, vec!["fine".to_string()]);
    assert!(!first.advanced);
    assert!(poller.tracker().is_empty());
    assert_eq!(gateway.title_of("flaky").as_deref(), Some("Execute: echo one"));

    gateway.allow_patches_for("flaky");
    let second = poller.tick_at(at(120)).await;
    assert_eq!(second.window.start, t0());
    assert_eq!(second.dispatched, vec!["flaky".to_string()]);
    assert!(second.advanced);

    assert_eq!(
        executor.dispatched_ids(),
        vec!["fine".to_string(), "flaky".to_string()]
    );
}

#[tokio::test]
async fn bare_marker_is_skipped_without_patch() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::new("empty")
            .title("Execute:")
            .between(at(10), at(20))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let report = poller.tick_at(at(60)).await;

    assert_eq!(report.failed, vec!["empty".to_string()]);
    assert!(report.advanced);
    assert!(gateway.patches().is_empty());
    assert!(executor.dispatched().is_empty());
    assert!(poller.tracker().is_empty());
}

#[tokio::test]
async fn ordinary_events_are_ignored() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::new("m1")
            .title("Team meeting")
            .between(at(10), at(20))
            .build(),
        CalendarEventBuilder::new("m2")
            .title("[Executed] echo done")
            .between(at(10), at(20))
            .build(),
        CalendarEventBuilder::new("m3")
            .title("execute: lowercase does not count")
            .between(at(10), at(20))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let report = poller.tick_at(at(60)).await;

    assert_eq!(report.fetched, 3);
    assert_eq!(report.skipped, 3);
    assert!(gateway.patches().is_empty());
    assert!(executor.dispatched().is_empty());
}

#[tokio::test]
async fn duplicate_listing_dispatches_once() {
    init_tracing();

    let event = CalendarEventBuilder::execute("dup", "echo once")
        .between(at(10), at(20))
        .build();
    let gateway = FakeCalendarGateway::with_events(vec![event.clone(), event]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let report = poller.tick_at(at(60)).await;

    assert_eq!(report.dispatched, vec!["dup".to_string()]);
    assert_eq!(report.skipped, 1);
    assert_eq!(gateway.patches().len(), 1);
}

#[tokio::test]
async fn closed_executor_does_not_block_window() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("e1", "echo hi")
            .between(at(10), at(20))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    executor.close();
    let mut poller = dispatcher(&gateway, &executor);

    let report = poller.tick_at(at(60)).await;

    assert_eq!(report.failed, vec!["e1".to_string()]);
    assert!(report.advanced);
    assert_eq!(gateway.patches().len(), 1);
    assert!(poller.tracker().is_empty());
}

#[tokio::test]
async fn events_outside_window_are_not_seen() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("future", "echo later")
            .between(at(500), at(600))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let mut poller = dispatcher(&gateway, &executor);

    let early = poller.tick_at(at(60)).await;
    assert_eq!(early.fetched, 0);

    let late = poller.tick_at(at(550)).await;
    assert_eq!(late.dispatched, vec!["future".to_string()]);
}

#[tokio::test]
async fn redirect_options_travel_with_command() {
    init_tracing();

    let gateway = FakeCalendarGateway::with_events(vec![
        CalendarEventBuilder::execute("e1", "echo hi")
            .between(at(10), at(20))
            .build(),
    ]);
    let executor = RecordingExecutor::new();
    let options = ExecOptions {
        stdout: StreamTarget::AppendFile("/var/log/out.log".into()),
        stderr: StreamTarget::Inherit,
        shell: Some("/bin/bash".to_string()),
    };
    let mut poller = PollDispatcher::new(
        gateway.clone(),
        executor.clone(),
        &test_settings(),
        options,
        t0(),
    );

    poller.tick_at(at(60)).await;

    let command = &executor.dispatched()[0];
    assert_eq!(command.event_id, "e1");
    assert_eq!(command.stdout, StreamTarget::AppendFile("/var/log/out.log".into()));
    assert_eq!(command.stderr, StreamTarget::Inherit);
    assert_eq!(command.shell.as_deref(), Some("/bin/bash"));
}
