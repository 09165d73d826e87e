//! Streaming sessions driven end to end over a scripted transport

mod common;

use common::*;
use kkconsole_core::session::{run_session, teardown_pair, SessionOutcome, SessionPhase};
use kkconsole_core::wizard::TRANSPORT_FAILURE_LINE;
use kkconsole_core::{ConsoleConfig, ConsoleError, SpecDocument};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_install_success_streams_lines_in_order() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::new(vec![
        text("preparing hosts"),
        text("pulling images"),
        text("安装集群成功"),
    ]);
    let (_guard, signal) = teardown_pair();

    let mut printed = Vec::new();
    let outcome = tokio::time::timeout(
        TEST_TIMEOUT,
        run_session(&mut wizard, &transport, signal, |line| {
            printed.push(line.to_string())
        }),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(outcome, SessionOutcome::Succeeded);
    assert_eq!(
        printed,
        vec![
            "安装开始，请勿进行其他操作！",
            "preparing hosts",
            "pulling images",
            "安装集群成功",
        ]
    );
    assert_eq!(wizard.logs(), printed.as_slice());

    // success keeps the wizard locked but lets the user leave
    assert!(wizard.in_flight());
    assert!(!wizard.can_submit());
    assert!(wizard.can_return_home());
    assert!(transport.observed.closed());

    let sent = transport.observed.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(SpecDocument::from_yaml(&sent[0]).unwrap(), *wizard.document());
}

#[tokio::test]
async fn test_failure_sentinel_unlocks_wizard() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::new(vec![text("x"), text("安装集群失败"), text("after")]);
    let (_guard, signal) = teardown_pair();

    let outcome = run_session(&mut wizard, &transport, signal, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Failed);
    assert!(!wizard.in_flight());
    assert!(wizard.can_submit());
    assert!(wizard.can_retreat());
    assert_eq!(wizard.logs().last().map(String::as_str), Some("安装集群失败"));
}

#[tokio::test]
async fn test_refused_connection_logs_failure_line() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::refusing("connection refused");
    let (_guard, signal) = teardown_pair();

    let mut printed = Vec::new();
    let outcome = run_session(&mut wizard, &transport, signal, |line| {
        printed.push(line.to_string())
    })
    .await
    .unwrap();

    assert_eq!(outcome, SessionOutcome::Pending);
    assert_eq!(printed, vec![TRANSPORT_FAILURE_LINE]);
    assert_eq!(wizard.session_phase(), SessionPhase::Closed);
    assert!(!wizard.in_flight());
}

#[tokio::test]
async fn test_mid_stream_error_keeps_flags() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::new(vec![text("step 1"), Frame::Error("reset".into())]);
    let (_guard, signal) = teardown_pair();

    let outcome = run_session(&mut wizard, &transport, signal, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Pending);
    assert!(wizard.in_flight());
    assert!(!wizard.safe_to_navigate_away());
    assert_eq!(
        wizard.logs().last().map(String::as_str),
        Some(TRANSPORT_FAILURE_LINE)
    );
}

#[tokio::test]
async fn test_peer_close_without_sentinel_is_pending() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::new(vec![text("only line")]);
    let (_guard, signal) = teardown_pair();

    let outcome = run_session(&mut wizard, &transport, signal, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome, SessionOutcome::Pending);
    assert_eq!(wizard.session_phase(), SessionPhase::Closed);
    assert_eq!(wizard.logs().len(), 2);
}

#[tokio::test]
async fn test_dropping_guard_tears_session_down() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::new(vec![text("working"), Frame::Hang]);
    let (guard, signal) = teardown_pair();

    let observed = std::sync::Arc::clone(&transport.observed);
    let drop_later = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        guard.teardown();
    });

    let outcome = tokio::time::timeout(
        TEST_TIMEOUT,
        run_session(&mut wizard, &transport, signal, |_| {}),
    )
    .await
    .unwrap()
    .unwrap();
    drop_later.await.unwrap();

    assert_eq!(outcome, SessionOutcome::Pending);
    assert_eq!(wizard.session_phase(), SessionPhase::Closed);
    assert!(observed.closed());
    assert_eq!(wizard.logs().len(), 2);
}

#[tokio::test]
async fn test_submit_refused_while_in_flight() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);
    let transport = ScriptedTransport::new(vec![text("安装集群成功")]);

    let (_guard, signal) = teardown_pair();
    run_session(&mut wizard, &transport, signal, |_| {})
        .await
        .unwrap();

    let (_guard, signal) = teardown_pair();
    let err = run_session(&mut wizard, &transport, signal, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, ConsoleError::NavigationBlocked { .. }));
    assert_eq!(transport.observed.connected_to.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_resubmit_after_failure_reports_only_new_run() {
    let config = ConsoleConfig::test(8082);
    let mut wizard = ready_install_wizard(&config);

    let first = ScriptedTransport::new(vec![text("old"), text("安装集群失败")]);
    let (_guard, signal) = teardown_pair();
    run_session(&mut wizard, &first, signal, |_| {}).await.unwrap();

    let second = ScriptedTransport::new(vec![text("new"), text("安装集群成功")]);
    let (_guard, signal) = teardown_pair();
    let mut printed = Vec::new();
    run_session(&mut wizard, &second, signal, |line| {
        printed.push(line.to_string())
    })
    .await
    .unwrap();

    assert_eq!(
        printed,
        vec!["安装开始，请勿进行其他操作！", "new", "安装集群成功"]
    );
    assert_eq!(wizard.logs(), printed.as_slice());
}
