// tests/session_runner.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use profile_refresher::automation::{RunOutcome, SessionRunner, Step};
use profile_refresher::config::{ConfigFile, Credentials};
use profile_refresher::schedule::{Job, JobScheduler};
use profile_refresher::types::{OverlapPolicy, TriggerReason};
use profile_refresher::webdriver::Locator;
use profile_refresher_test_utils::builders::ConfigFileBuilder;
use profile_refresher_test_utils::fake_session::{Call, FakeSessionFactory};
use profile_refresher_test_utils::{init_tracing, with_timeout};

const USERNAME: &str = "jane@example.com";
const PASSWORD: &str = "correct horse battery staple";

fn runner(factory: &FakeSessionFactory, cfg: &ConfigFile) -> SessionRunner {
    SessionRunner::new(
        Arc::new(factory.clone()),
        cfg.script.clone(),
        Credentials::new(USERNAME, PASSWORD),
        cfg.schedule.overlap,
    )
}

fn element(session: &str, locator: &Locator) -> String {
    format!("{session}/{locator}")
}

fn sent_keys(calls: &[Call]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, Call::SendKeys { .. }))
        .count()
}

#[tokio::test]
async fn successful_run_follows_the_step_order_and_closes_once() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();
    let factory = FakeSessionFactory::new();
    let runner = runner(&factory, &cfg);

    let outcome = with_timeout(runner.run_once(TriggerReason::Manual)).await;
    assert_eq!(outcome, RunOutcome::Completed);

    let s = &cfg.script;
    let id = "fake-1";
    assert_eq!(
        factory.calls(id),
        vec![
            Call::Goto(s.profile_url.clone()),
            Call::Find(s.username_field.to_string()),
            Call::Find(s.password_field.to_string()),
            Call::Find(s.submit_button.to_string()),
            Call::SendKeys {
                element: element(id, &s.username_field),
                text: USERNAME.to_string(),
            },
            Call::SendKeys {
                element: element(id, &s.password_field),
                text: PASSWORD.to_string(),
            },
            Call::Click(element(id, &s.submit_button)),
            Call::Find(s.edit_control.to_string()),
            Call::Click(element(id, &s.edit_control)),
            Call::Find(s.save_button.to_string()),
            Call::Click(element(id, &s.save_button)),
        ]
    );

    assert_eq!(factory.opened(), 1);
    assert_eq!(factory.closes().get(id), Some(&1));
}

#[tokio::test]
async fn missing_login_field_submits_nothing_and_still_closes() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();

    // Both the first and the last of the three lookups.
    for missing in [&cfg.script.username_field, &cfg.script.submit_button] {
        let factory = FakeSessionFactory::new().missing_element(missing);
        let runner = runner(&factory, &cfg);

        let outcome = with_timeout(runner.run_once(TriggerReason::Manual)).await;
        assert_eq!(outcome, RunOutcome::Failed(Step::LocateLoginForm));

        assert_eq!(sent_keys(&factory.calls("fake-1")), 0, "typed despite missing {missing}");
        assert_eq!(factory.closes().get("fake-1"), Some(&1));
    }
}

#[tokio::test]
async fn failures_after_login_report_their_step() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();

    let cases = [
        (&cfg.script.edit_control, Step::OpenEditor),
        (&cfg.script.save_button, Step::Save),
    ];

    for (missing, step) in cases {
        let factory = FakeSessionFactory::new().missing_element(missing);
        let runner = runner(&factory, &cfg);

        let outcome = with_timeout(runner.run_once(TriggerReason::Manual)).await;
        assert_eq!(outcome, RunOutcome::Failed(step));
        assert_eq!(sent_keys(&factory.calls("fake-1")), 2);
        assert_eq!(factory.closes().get("fake-1"), Some(&1));
    }
}

#[tokio::test]
async fn failed_open_has_nothing_to_close() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();
    let factory = FakeSessionFactory::failing_open();
    let runner = runner(&factory, &cfg);

    let outcome = with_timeout(runner.run_once(TriggerReason::Startup)).await;

    assert_eq!(outcome, RunOutcome::Failed(Step::OpenSession));
    assert_eq!(factory.opened(), 0);
    assert!(factory.closes().is_empty());
}

#[tokio::test]
async fn a_failed_run_does_not_poison_later_runs() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();
    let factory = FakeSessionFactory::new().missing_element(&cfg.script.password_field);
    let runner = runner(&factory, &cfg);

    for _ in 0..3 {
        let outcome = with_timeout(runner.run_once(TriggerReason::Manual)).await;
        assert_eq!(outcome, RunOutcome::Failed(Step::LocateLoginForm));
    }

    assert_eq!(factory.opened(), 3);
    let closes = factory.closes();
    assert_eq!(closes.len(), 3);
    assert!(closes.values().all(|&n| n == 1));
}

#[tokio::test]
async fn overlapping_runs_use_separate_sessions() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();
    let factory = FakeSessionFactory::new().with_navigate_delay(Duration::from_millis(200));
    let runner = runner(&factory, &cfg);

    let (a, b) = with_timeout(async {
        tokio::join!(
            runner.run_once(TriggerReason::Startup),
            runner.run_once(TriggerReason::Manual)
        )
    })
    .await;

    assert_eq!(a, RunOutcome::Completed);
    assert_eq!(b, RunOutcome::Completed);
    assert_eq!(factory.session_ids(), vec!["fake-1", "fake-2"]);

    for id in ["fake-1", "fake-2"] {
        let calls = factory.calls(id);
        assert_eq!(calls.len(), 11, "session {id} saw {calls:?}");
        assert!(calls.iter().all(|c| match c {
            Call::SendKeys { element, .. } | Call::Click(element) => element.starts_with(id),
            _ => true,
        }));
        assert_eq!(factory.closes().get(id), Some(&1));
    }
}

#[tokio::test]
async fn skip_policy_drops_a_fire_while_a_run_is_in_flight() {
    init_tracing();
    let cfg = ConfigFileBuilder::new()
        .fast()
        .overlap(OverlapPolicy::Skip)
        .build();
    let factory = FakeSessionFactory::new().with_navigate_delay(Duration::from_millis(200));
    let runner = runner(&factory, &cfg);

    let (a, b) = with_timeout(async {
        tokio::join!(
            runner.run_once(TriggerReason::Startup),
            runner.run_once(TriggerReason::Manual)
        )
    })
    .await;

    let mut outcomes = [a, b];
    outcomes.sort_by_key(|o| matches!(o, RunOutcome::Skipped));
    assert_eq!(outcomes, [RunOutcome::Completed, RunOutcome::Skipped]);
    assert_eq!(factory.opened(), 1);

    // The gate is released afterwards.
    let again = with_timeout(runner.run_once(TriggerReason::Manual)).await;
    assert_eq!(again, RunOutcome::Completed);
}

#[tokio::test]
async fn settle_waits_are_honoured() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().settle("200ms", "100ms").build();
    let factory = FakeSessionFactory::new();
    let runner = runner(&factory, &cfg);

    let started = Instant::now();
    let outcome = with_timeout(runner.run_once(TriggerReason::Manual)).await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn scheduled_fires_keep_coming_after_failures() {
    init_tracing();
    let cfg = ConfigFileBuilder::new().fast().build();
    let factory = FakeSessionFactory::new().missing_element(&cfg.script.username_field);
    let job: Arc<dyn Job> = Arc::new(runner(&factory, &cfg));

    let every_second = "* * * * * *".parse().expect("valid expression");
    let handle = JobScheduler::new(vec![every_second]).start(Arc::clone(&job));

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    handle.abort();

    assert!(factory.opened() >= 2, "only {} runs fired", factory.opened());
    assert!(factory.closes().values().all(|&n| n == 1));
}
