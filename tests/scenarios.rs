//! End-to-end scenarios exercising full composite trees, not just single units.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flowcore::prelude::*;

/// Scenario tests are the one place noisy enough to want engine traces;
/// `RUST_LOG=flowcore=debug cargo test --test scenarios` turns them on.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Scripted {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
    delay: Duration,
    fail: bool,
}

#[async_trait]
impl Task for Scripted {
    async fn execute(&self, _ctx: &Context) -> Result<(), TaskError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.log.lock().unwrap().push(self.name.clone());
        if self.fail {
            Err(TaskError::new(format!("{} exploded", self.name)))
        } else {
            Ok(())
        }
    }
}

fn task_named(name: &str, log: Arc<Mutex<Vec<String>>>) -> Arc<dyn Workflow> {
    Arc::new(TaskWorkflow::new(TaskDescriptor::new(Scripted {
        name: name.to_string(),
        log,
        delay: Duration::ZERO,
        fail: false,
    })))
}

fn failing_task_named(name: &str, log: Arc<Mutex<Vec<String>>>) -> Arc<dyn Workflow> {
    Arc::new(TaskWorkflow::new(TaskDescriptor::new(Scripted {
        name: name.to_string(),
        log,
        delay: Duration::ZERO,
        fail: true,
    })))
}

#[tokio::test]
async fn scenario_1_sequential_fail_fast() {
    init_tracing();
    let log = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Sequential::new(vec![
        task_named("A", log.clone()),
        failing_task_named("B", log.clone()),
        task_named("C", log.clone()),
    ]);

    let result = pipeline.execute(&Context::new()).await;

    assert_eq!(result.status, WorkflowStatus::Failed);
    assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
    assert!(result.error.unwrap().to_string().contains("B exploded"));
}

#[tokio::test]
async fn scenario_2_parallel_fail_fast_cancellation() {
    init_tracing();
    let log = Arc::new(Mutex::new(Vec::new()));
    let slow = Arc::new(TaskWorkflow::new(TaskDescriptor::new(Scripted {
        name: "slow".into(),
        log: log.clone(),
        delay: Duration::from_millis(1000),
        fail: false,
    })));
    let fast_fail = Arc::new(TaskWorkflow::new(TaskDescriptor::new(Scripted {
        name: "fast-fail".into(),
        log: log.clone(),
        delay: Duration::from_millis(10),
        fail: true,
    })));

    let pipeline = Parallel::new(vec![slow, fast_fail]).with_fail_fast(true);

    let started = std::time::Instant::now();
    let result = pipeline.execute(&Context::new()).await;
    let elapsed = started.elapsed();

    assert_eq!(result.status, WorkflowStatus::Failed);
    assert!(elapsed < Duration::from_millis(200), "took {elapsed:?}, expected well under 1000ms");
    assert_eq!(*log.lock().unwrap(), vec!["fast-fail"]);
}

#[tokio::test]
async fn scenario_3_saga_backward_recovery() {
    init_tracing();
    let log = Arc::new(Mutex::new(Vec::new()));

    let saga = Saga::builder()
        .step("reserve", task_named("reserve", log.clone()), Some(task_named("release", log.clone())))
        .step("charge", task_named("charge", log.clone()), Some(task_named("refund", log.clone())))
        .step("ship", task_named("ship", log.clone()), None)
        .step("notify", failing_task_named("notify", log.clone()), None)
        .build()
        .unwrap();

    let ctx = Context::new();
    let result = saga.execute(&ctx).await;

    assert_eq!(result.status, WorkflowStatus::Failed);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["reserve", "charge", "ship", "notify", "refund", "release"]
    );
    assert_eq!(ctx.get::<String>(SAGA_FAILED_STEP), Some("notify".to_string()));
}

struct FlakyThenSucceeds {
    fails_until: usize,
    attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl Task for FlakyThenSucceeds {
    async fn execute(&self, _ctx: &Context) -> Result<(), TaskError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.fails_until {
            Err(TaskError::new(format!("attempt {attempt} failed")))
        } else {
            Ok(())
        }
    }
}

#[tokio::test]
async fn scenario_4_retry_with_exponential_backoff() {
    init_tracing();
    let attempts = Arc::new(AtomicUsize::new(0));
    let task = FlakyThenSucceeds { fails_until: 2, attempts: attempts.clone() };

    let policy = RetryPolicy::exponential()
        .with_max_attempts(3)
        .with_initial_interval(Duration::from_millis(100))
        .with_backoff_coefficient(2.0)
        .with_jitter(0.0);

    let sleeper = Arc::new(RecordingSleeper::new());
    let wf = TaskWorkflow::new(TaskDescriptor::new(task).with_retry(policy)).with_sleeper(sleeper.clone());

    let result = wf.execute(&Context::new()).await;

    assert_eq!(result.status, WorkflowStatus::Success);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.requested(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[tokio::test]
async fn scenario_5_token_bucket_admission() {
    init_tracing();
    let limiter = TokenBucketLimiter::new(5, 5.0);

    let first_batch: Vec<bool> = (0..10).map(|_| limiter.try_acquire()).collect();
    assert_eq!(first_batch.iter().filter(|ok| **ok).count(), 5);
    assert_eq!(first_batch, vec![true, true, true, true, true, false, false, false, false, false]);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let second_batch: Vec<bool> = (0..5).map(|_| limiter.try_acquire()).collect();
    assert!(second_batch.iter().all(|ok| *ok));
}

struct Touch(Arc<AtomicUsize>);

#[async_trait]
impl Task for Touch {
    async fn execute(&self, _ctx: &Context) -> Result<(), TaskError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn scenario_6_conditional_with_no_else() {
    init_tracing();
    let touched = Arc::new(AtomicUsize::new(0));

    let wf = Conditional::new(
        |_ctx: &Context| Ok(false),
        Arc::new(TaskWorkflow::new(TaskDescriptor::new(Touch(touched.clone())))),
    );

    let result = wf.execute(&Context::new()).await;

    assert_eq!(result.status, WorkflowStatus::Success);
    assert_eq!(touched.load(Ordering::SeqCst), 0);
}
