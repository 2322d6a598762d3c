mod support;

use std::time::Duration as StdDuration;

use chrono::Duration;
use flagdeck::auth::{AuthError, TokenStore};
use flagdeck::session::{SchedulerState, SessionEvent};
use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{
    manager, mount_refresh_failure, mount_refresh_success, seeded_store, token, token_with_ttl,
};

/// Let the scheduler task observe the latest state.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    tokio::time::sleep(StdDuration::from_millis(10)).await;
}

// --- Scheduler behavior (paused clock) ---

#[tokio::test(start_paused = true)]
async fn long_ttl_token_refreshes_after_fixed_buffer() {
    let server = MockServer::start().await;
    // 700s TTL: fixed 60s buffer, timer due in 640s.
    mount_refresh_success(&server, "access-2", Duration::seconds(700), 1).await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(700)));
    let session = manager(&server, store.clone());
    let mut rx = session.subscribe();

    let started = tokio::time::Instant::now();
    session.start();
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::TokenRefreshed);
    let elapsed = started.elapsed();
    session.stop();

    assert!(
        elapsed >= StdDuration::from_secs(640),
        "refresh fired early: {elapsed:?}"
    );
    let stored = session.token().unwrap().unwrap();
    assert_eq!(stored.access_token, "access-2");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-2"));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn short_ttl_token_is_left_to_the_reactive_path() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 500, 0).await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(30)));
    let session = manager(&server, store);
    session.start();
    settle().await;

    assert_eq!(session.scheduler_state(), SchedulerState::Idle);
    // Even well past the token's expiry, no proactive attempt happens.
    tokio::time::sleep(StdDuration::from_secs(120)).await;
    assert_eq!(session.scheduler_state(), SchedulerState::Idle);
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn expired_token_refreshes_immediately() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, "access-2", Duration::seconds(700), 1).await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(-5)));
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let started = tokio::time::Instant::now();
    session.start();
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::TokenRefreshed);
    let elapsed = started.elapsed();
    session.stop();

    assert!(
        elapsed < StdDuration::from_secs(60),
        "immediate refresh waited: {elapsed:?}"
    );
    assert_eq!(session.token().unwrap().unwrap().access_token, "access-2");
}

#[tokio::test(start_paused = true)]
async fn restarting_the_scheduler_coalesces_to_one_refresh() {
    let server = MockServer::start().await;
    mount_refresh_success(&server, "access-2", Duration::seconds(700), 1).await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(700)));
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    session.start();
    session.start(); // restart replaces the previous schedule
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::TokenRefreshed);
    session.stop();
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn rejected_refresh_ends_the_session() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 401, 1).await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(-5)));
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    session.start();
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::Unauthenticated);
    settle().await;

    assert!(session.token().unwrap().is_none());
    assert_eq!(session.scheduler_state(), SchedulerState::Idle);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn transient_failure_reschedules_without_signing_out() {
    let server = MockServer::start().await;
    // 300s TTL: the attempt at 225s fails with a server error. That is not
    // fatal: no sign-out, the token stays, and a new timer is armed against
    // the unchanged expiry.
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1..)
        .mount(&server)
        .await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(300)));
    let session = manager(&server, store);
    let mut rx = session.subscribe();
    session.start();

    loop {
        if !server.received_requests().await.unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(StdDuration::from_secs(5)).await;
    }
    // The failed attempt must be followed by a rearm, not a sign-out.
    loop {
        if matches!(session.scheduler_state(), SchedulerState::Armed { .. }) {
            break;
        }
        tokio::task::yield_now().await;
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    session.stop();

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(session.token().unwrap().unwrap().access_token, "access-1");
}

#[tokio::test(start_paused = true)]
async fn external_token_change_wakes_an_idle_scheduler() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 500, 0).await;

    let store = seeded_store(token("unused"));
    store.clear().unwrap();
    let session = manager(&server, store.clone());
    session.start();
    settle().await;
    assert_eq!(session.scheduler_state(), SchedulerState::Idle);

    store
        .save(&token_with_ttl("access-1", Duration::seconds(700)))
        .unwrap();
    session.notify_token_changed();
    settle().await;

    assert!(matches!(
        session.scheduler_state(),
        SchedulerState::Armed { .. }
    ));
    session.stop();
}

#[tokio::test(start_paused = true)]
async fn sign_out_cancels_a_pending_schedule() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 500, 0).await;

    let store = seeded_store(token_with_ttl("access-1", Duration::seconds(700)));
    let session = manager(&server, store);
    session.start();
    settle().await;
    assert!(matches!(
        session.scheduler_state(),
        SchedulerState::Armed { .. }
    ));

    session.sign_out().unwrap();
    settle().await;
    assert_eq!(session.scheduler_state(), SchedulerState::Idle);
    assert!(session.token().unwrap().is_none());
    session.stop();
}

// --- refresh_now semantics ---

#[tokio::test]
async fn refresh_now_replaces_the_token_and_emits_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .and(body_json(json!({"refreshToken": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::token_json(
            "access-2",
            "refresh-2",
            chrono::Utc::now() + Duration::seconds(700),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store(token("access-1"));
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let fresh = session.refresh_now().await.unwrap();
    assert_eq!(fresh.access_token, "access-2");
    assert_eq!(session.token().unwrap().unwrap().access_token, "access-2");
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::TokenRefreshed);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn refresh_now_transient_error_keeps_the_token_and_stays_quiet() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 503, 1).await;

    let store = seeded_store(token("access-1"));
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let err = session.refresh_now().await.unwrap_err();
    assert!(!err.is_fatal());
    assert_eq!(session.token().unwrap().unwrap().access_token, "access-1");
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    // The scheduler never ran here and its state must not be left stuck on
    // the failed attempt.
    assert_eq!(session.scheduler_state(), SchedulerState::Idle);
}

#[tokio::test]
async fn refresh_now_rejection_clears_the_token() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 403, 1).await;

    let store = seeded_store(token("access-1"));
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let err = session.refresh_now().await.unwrap_err();
    assert!(matches!(err, AuthError::RefreshRejected { status: 403 }));
    assert!(session.token().unwrap().is_none());
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::Unauthenticated);
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn refresh_now_without_a_token_is_a_noop() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 500, 0).await;

    let store = seeded_store(token("unused"));
    store.clear().unwrap();
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let err = session.refresh_now().await.unwrap_err();
    assert!(matches!(err, AuthError::NotSignedIn));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn refresh_now_without_a_refresh_token_is_a_noop() {
    let server = MockServer::start().await;
    mount_refresh_failure(&server, 500, 0).await;

    let mut stale = token("access-1");
    stale.refresh_token = None;
    let store = seeded_store(stale);
    let session = manager(&server, store);

    let err = session.refresh_now().await.unwrap_err();
    assert!(matches!(err, AuthError::NotSignedIn));
    assert_eq!(session.token().unwrap().unwrap().access_token, "access-1");
}

#[tokio::test]
async fn concurrent_refreshes_coalesce_into_one_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(support::token_json(
                    "access-2",
                    "refresh-2",
                    chrono::Utc::now() + Duration::seconds(700),
                ))
                .set_delay(StdDuration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store(token("access-1"));
    let session = manager(&server, store);

    let (a, b) = tokio::join!(session.refresh_now(), session.refresh_now());
    assert_eq!(a.unwrap().access_token, "access-2");
    assert_eq!(b.unwrap().access_token, "access-2");
}

// --- sign-in ---

#[tokio::test]
async fn sign_in_stores_the_token_and_signals() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/token"))
        .and(body_json(
            json!({"email": "admin@example.com", "password": "secret"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(support::token_json(
            "access-1",
            "refresh-1",
            chrono::Utc::now() + Duration::seconds(3600),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store(token("unused"));
    store.clear().unwrap();
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let issued = session.sign_in("admin@example.com", "secret").await.unwrap();
    assert_eq!(issued.access_token, "access-1");
    assert_eq!(session.token().unwrap().unwrap().access_token, "access-1");
    assert_eq!(rx.recv().await.unwrap(), SessionEvent::TokenRefreshed);
}

#[tokio::test]
async fn sign_in_with_bad_credentials_fails_cleanly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let store = seeded_store(token("unused"));
    store.clear().unwrap();
    let session = manager(&server, store);
    let mut rx = session.subscribe();

    let err = session
        .sign_in("admin@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert!(session.token().unwrap().is_none());
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}
