mod common;

use common::{registry, url, Reply, ScriptedTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use userscout_probe::{
    check, CheckOptions, HttpTransport, ProbeEngine, ProbeError, ProbeResult, TransportError,
};

fn engine(transport: Arc<ScriptedTransport>) -> ProbeEngine {
    ProbeEngine::builder(registry())
        .with_transport(transport)
        .with_timeout(Duration::from_secs(5))
        .build()
        .expect("build engine")
}

fn result_for<'a>(results: &'a [ProbeResult], service: &str) -> &'a ProbeResult {
    results
        .iter()
        .find(|r| r.service_name.matches(service))
        .unwrap_or_else(|| panic!("no result for {service}"))
}

#[tokio::test]
async fn test_exactly_one_result_per_selected_service() {
    let transport = Arc::new(ScriptedTransport::new());
    let engine = engine(transport.clone());

    let selected = engine.selected_services();
    let results = engine.check_one("alice").await.expect("check");

    assert_eq!(results.len(), selected.len());
    let names: Vec<_> = results.iter().map(|r| r.service_name.clone()).collect();
    assert_eq!(names, selected);
    assert_eq!(transport.request_count(), selected.len());
    assert!(results.iter().all(|r| r.username == "alice"));
}

#[tokio::test]
async fn test_blank_username_makes_no_requests() {
    let transport = Arc::new(ScriptedTransport::new());
    let engine = engine(transport.clone());

    assert!(matches!(
        engine.check_one("").await,
        Err(ProbeError::InvalidUsername)
    ));
    assert!(matches!(
        engine.check_one("   ").await,
        Err(ProbeError::InvalidUsername)
    ));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_status_code_policy() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("alpha", "alice"), Reply::status(200))
            .reply(&url("beta", "alice"), Reply::status(301))
            .reply(&url("gamma", "alice"), Reply::status(500)),
    );
    let engine = ProbeEngine::builder(registry())
        .with_transport(transport)
        .with_services(["alpha", "beta", "gamma", "forum"])
        .build()
        .expect("build engine");

    let results = engine.check_one("alice").await.expect("check");

    let alpha = result_for(&results, "alpha");
    assert!(alpha.found);
    assert_eq!(alpha.status_code, Some(200));

    assert!(result_for(&results, "beta").found);

    let gamma = result_for(&results, "gamma");
    assert!(!gamma.found);
    assert_eq!(gamma.status_code, Some(500));
    assert!(gamma.note.is_none());

    // Unscripted: 404
    let forum = result_for(&results, "forum");
    assert!(!forum.found);
    assert_eq!(forum.status_code, Some(404));
}

#[tokio::test]
async fn test_message_policy_and_body_fetching() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("forum", "ghost"), Reply::body(200, "<p>NO SUCH USER here</p>"))
            .reply(&url("forum", "alice"), Reply::body(200, "<p>alice's posts</p>"))
            .reply(&url("alpha", "alice"), Reply::status(200)),
    );
    let engine = engine(transport.clone());

    let ghost = engine.check_one("ghost").await.expect("check ghost");
    assert!(!result_for(&ghost, "forum").found);

    let alice = engine.check_one("alice").await.expect("check alice");
    assert!(result_for(&alice, "forum").found);

    assert_eq!(transport.body_requested(&url("forum", "alice")), Some(true));
    assert_eq!(transport.body_requested(&url("alpha", "alice")), Some(false));
}

#[tokio::test]
async fn test_allow_list_restricts_results() {
    let transport = Arc::new(ScriptedTransport::new());
    let engine = ProbeEngine::builder(registry())
        .with_transport(transport.clone())
        .with_services(["GAMMA"])
        .build()
        .expect("build engine");

    let results = engine.check_one("alice").await.expect("check");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].service_name.as_str(), "gamma");
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_nsfw_services_excluded_unless_included() {
    let transport = Arc::new(ScriptedTransport::new());

    let sfw = engine(transport.clone());
    assert!(!sfw.selected_services().iter().any(|name| name.matches("delta")));

    let all = ProbeEngine::builder(registry())
        .with_transport(transport)
        .with_include_nsfw(true)
        .build()
        .expect("build engine");
    let results = all.check_one("alice").await.expect("check");
    assert_eq!(results.len(), 5);
    result_for(&results, "delta");
}

#[tokio::test(start_paused = true)]
async fn test_slow_probe_reported_as_timeout() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(
                &url("alpha", "alice"),
                Reply::delayed(200, Duration::from_secs(60)),
            )
            .reply(&url("beta", "alice"), Reply::status(200)),
    );
    let engine = ProbeEngine::builder(registry())
        .with_transport(transport)
        .with_timeout(Duration::from_secs(2))
        .build()
        .expect("build engine");

    let results = engine.check_one("alice").await.expect("check");

    let alpha = result_for(&results, "alpha");
    assert!(!alpha.found);
    assert_eq!(alpha.note.as_deref(), Some("timeout"));
    assert!(alpha.status_code.is_none());
    assert!(alpha.timed_out());

    let beta = result_for(&results, "beta");
    assert!(beta.found);
    assert_eq!(beta.status_code, Some(200));
}

#[tokio::test(start_paused = true)]
async fn test_deadline_shared_by_queued_probes() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("alpha", "alice"), Reply::delayed(200, Duration::from_secs(3)))
            .reply(&url("beta", "alice"), Reply::delayed(200, Duration::from_secs(3))),
    );
    let engine = ProbeEngine::builder(registry())
        .with_transport(transport)
        .with_services(["alpha", "beta"])
        .with_max_concurrent_probes(1)
        .with_timeout(Duration::from_secs(5))
        .build()
        .expect("build engine");

    let results = engine.check_one("alice").await.expect("check");

    // Run one at a time: the first finishes at 3s, the second would need 6s.
    assert!(result_for(&results, "alpha").found);
    assert!(result_for(&results, "beta").timed_out());
}

#[tokio::test]
async fn test_transport_failure_isolated_to_one_probe() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(
                &url("alpha", "alice"),
                Reply::Fail(TransportError::Connect("connection refused".to_string())),
            )
            .reply(&url("beta", "alice"), Reply::status(200))
            .reply(&url("gamma", "alice"), Reply::status(200)),
    );
    let engine = engine(transport);

    let results = engine.check_one("alice").await.expect("check");

    let alpha = result_for(&results, "alpha");
    assert!(!alpha.found);
    assert!(alpha.status_code.is_none());
    assert_eq!(alpha.note.as_deref(), Some("connect"));
    assert!(!alpha.timed_out());

    assert!(result_for(&results, "beta").found);
    assert!(result_for(&results, "gamma").found);
}

#[tokio::test]
async fn test_cancellation_abandons_probes_as_timeouts() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("alpha", "alice"), Reply::delayed(200, Duration::from_secs(60))),
    );
    let engine = engine(transport);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let results = engine
        .check_one_with_cancel("alice", &cancel)
        .await
        .expect("check");

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(ProbeResult::timed_out));
    assert!(results.iter().all(|r| !r.found));
}

#[tokio::test(start_paused = true)]
async fn test_cancellation_mid_flight_keeps_finished_results() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("alpha", "alice"), Reply::delayed(200, Duration::from_secs(60)))
            .reply(&url("beta", "alice"), Reply::status(200)),
    );
    let engine = engine(transport);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let started = tokio::time::Instant::now();
    let results = engine
        .check_one_with_cancel("alice", &cancel)
        .await
        .expect("check");

    // Cancelled well before the 5s deadline
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(results.len(), 4);

    let alpha = result_for(&results, "alpha");
    assert!(alpha.timed_out());
    assert!(!alpha.found);
    assert!(alpha.status_code.is_none());

    let beta = result_for(&results, "beta");
    assert!(beta.found);
    assert_eq!(beta.status_code, Some(200));
    assert!(beta.note.is_none());

    assert_eq!(result_for(&results, "gamma").status_code, Some(404));
}

#[tokio::test(start_paused = true)]
async fn test_check_many_cancelled_mid_flight() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("alpha", "alice"), Reply::delayed(200, Duration::from_secs(60)))
            .reply(&url("beta", "alice"), Reply::status(200))
            .reply(&url("beta", "bob"), Reply::status(200)),
    );
    let engine = engine(transport);

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let results = engine
        .check_many_with_cancel(["alice", "bob"], &cancel)
        .await
        .expect("check many");

    assert_eq!(results.len(), 2);

    let alice = &results["alice"];
    assert!(result_for(alice, "alpha").timed_out());
    assert!(result_for(alice, "beta").found);

    let bob = &results["bob"];
    assert_eq!(bob.len(), 4);
    assert!(bob.iter().all(ProbeResult::timed_out));
    assert!(bob.iter().all(|r| !r.found && r.username == "bob"));
}

#[tokio::test]
async fn test_check_many_keys_by_username() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .reply(&url("alpha", "a"), Reply::status(200))
            .reply(&url("beta", "b"), Reply::status(200)),
    );
    let engine = engine(transport);

    let results = engine.check_many(["a", "b"]).await.expect("check many");

    assert_eq!(
        results.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
    assert!(results["a"].iter().all(|r| r.username == "a"));
    assert!(result_for(&results["a"], "alpha").found);
    assert!(!result_for(&results["a"], "beta").found);
    assert!(result_for(&results["b"], "beta").found);
}

#[tokio::test]
async fn test_check_many_repeated_username_single_entry() {
    let transport = Arc::new(ScriptedTransport::new());
    let engine = engine(transport.clone());

    let results = engine
        .check_many(["alice", "bob", "alice"])
        .await
        .expect("check many");

    assert_eq!(results.len(), 2);
    // Not deduplicated: every input is checked
    assert_eq!(transport.request_count(), 3 * 4);
}

#[tokio::test]
async fn test_check_many_folds_username_case() {
    let transport = Arc::new(
        ScriptedTransport::new().reply(&url("alpha", "alice"), Reply::status(200)),
    );
    let engine = engine(transport.clone());

    let results = engine
        .check_many(["Alice", "alice"])
        .await
        .expect("check many");

    // First spelling kept as the key, last check's results kept as the value
    assert_eq!(
        results.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["Alice"]
    );
    let alice = &results["Alice"];
    assert!(alice.iter().all(|r| r.username == "alice"));
    assert!(result_for(alice, "alpha").found);
    assert_eq!(transport.request_count(), 2 * 4);
}

#[tokio::test]
async fn test_check_many_propagates_invalid_username() {
    let engine = engine(Arc::new(ScriptedTransport::new()));
    let result = engine.check_many(["alice", " "]).await;
    assert!(matches!(result, Err(ProbeError::InvalidUsername)));
}

#[tokio::test]
async fn test_check_many_summaries_keep_input_order() {
    let engine = engine(Arc::new(ScriptedTransport::new()));

    let summaries = engine
        .check_many_summaries(["zed", "alice"])
        .await
        .expect("check many");

    let usernames: Vec<&str> = summaries.iter().map(|s| s.username.as_str()).collect();
    assert_eq!(usernames, vec!["zed", "alice"]);
    assert!(summaries.iter().all(|s| s.results.len() == 4));
}

#[tokio::test]
async fn test_one_shot_check() {
    let transport =
        Arc::new(ScriptedTransport::new().reply(&url("gamma", "alice"), Reply::status(200)));

    let results = check(
        &registry(),
        "alice",
        CheckOptions {
            services: vec!["gamma".to_string()],
            transport: Some(transport.clone() as Arc<dyn HttpTransport>),
            ..CheckOptions::default()
        },
    )
    .await
    .expect("one-shot check");

    assert_eq!(results.len(), 1);
    assert!(results[0].found);
    assert_eq!(transport.request_count(), 1);
}

#[tokio::test]
async fn test_one_shot_check_rejects_blank_username() {
    let transport = Arc::new(ScriptedTransport::new());

    let result = check(
        &registry(),
        "",
        CheckOptions {
            transport: Some(transport.clone() as Arc<dyn HttpTransport>),
            ..CheckOptions::default()
        },
    )
    .await;

    assert!(matches!(result, Err(ProbeError::InvalidUsername)));
    assert_eq!(transport.request_count(), 0);
}
