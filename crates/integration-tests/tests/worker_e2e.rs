//! End-to-end: submit through JobService, run on a Worker, observe logs and job state

use std::time::Duration;

use delayed_core::application::{shutdown_channel, EnqueueRequest, DELAYED_TASK_MESSAGE};
use delayed_core::domain::{JobArguments, JobState};
use delayed_core::port::JobRepository;
use delayed_integration_tests::{LogCapture, TestRunner};
use serde_json::json;
use tokio::time::Instant;

async fn submit_and_run(arguments: JobArguments) {
    let (logs, _guard) = LogCapture::install();
    let runner = TestRunner::with_builtin_tasks();

    let job_id = runner
        .service
        .enqueue(EnqueueRequest::new("clever_utility", arguments.clone()))
        .await
        .unwrap();

    let queued = runner.service.find(&job_id).await.unwrap().unwrap();
    assert_eq!(queued.state, JobState::Queued);
    assert_eq!(queued.queue, "default");

    let worker = runner.worker("default");
    let started = Instant::now();
    assert!(worker.process_next_job().await.unwrap());
    assert!(started.elapsed() >= Duration::from_secs(15));

    let job = runner.service.find(&job_id).await.unwrap().unwrap();
    assert_eq!(job.state, JobState::Done);
    assert_eq!(job.queue, "default");
    assert_eq!(job.arguments, arguments);
    assert!(job.duration_ms().unwrap() >= 15_000);
    assert!(job.error.is_none());

    assert_eq!(logs.matching(DELAYED_TASK_MESSAGE).len(), 1);
    assert_eq!(logs.matching("Performing job").len(), 1);
    assert_eq!(logs.matching("Performed job").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_submit_empty_arguments() {
    submit_and_run(JobArguments::empty()).await;
}

#[tokio::test(start_paused = true)]
async fn test_submit_mixed_arguments() {
    submit_and_run(JobArguments::new(vec![json!(42), json!("x")])).await;
}

#[tokio::test(start_paused = true)]
async fn test_worker_is_occupied_for_the_whole_delay() {
    let runner = TestRunner::with_builtin_tasks();
    for n in 0..2 {
        runner
            .service
            .enqueue(EnqueueRequest::new(
                "clever_utility",
                JobArguments::new(vec![json!(n)]),
            ))
            .await
            .unwrap();
    }

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let worker = runner.worker("default");
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    // Halfway through the first run: one running, one still waiting
    tokio::time::sleep(Duration::from_secs(7)).await;
    let repo = &runner.job_repo;
    assert_eq!(repo.count_by_state("default", JobState::Running).await.unwrap(), 1);
    assert_eq!(repo.count_by_state("default", JobState::Queued).await.unwrap(), 1);

    // First done, second only just started
    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(repo.count_by_state("default", JobState::Done).await.unwrap(), 1);
    assert_eq!(repo.count_by_state("default", JobState::Running).await.unwrap(), 1);

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(repo.count_by_state("default", JobState::Done).await.unwrap(), 2);

    shutdown_tx.shutdown();
    handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_lets_running_job_finish() {
    let runner = TestRunner::with_builtin_tasks();
    let job_id = runner
        .service
        .enqueue(EnqueueRequest::new("clever_utility", JobArguments::empty()))
        .await
        .unwrap();

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let worker = runner.worker("default");
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_secs(1)).await;
    shutdown_tx.shutdown();
    handle.await.unwrap().unwrap();

    let job = runner.service.find(&job_id).await.unwrap().unwrap();
    assert_eq!(job.state, JobState::Done);
}

#[tokio::test(start_paused = true)]
async fn test_delayed_submission_waits_for_schedule() {
    let runner = TestRunner::with_builtin_tasks();
    let job_id = runner
        .service
        .enqueue(
            EnqueueRequest::new("clever_utility", JobArguments::empty()).with_delay_ms(5_000),
        )
        .await
        .unwrap();

    let worker = runner.worker("default");
    assert!(!worker.process_next_job().await.unwrap());

    tokio::time::sleep(Duration::from_millis(5_000)).await;
    assert!(worker.process_next_job().await.unwrap());

    let job = runner.service.find(&job_id).await.unwrap().unwrap();
    assert_eq!(job.state, JobState::Done);
    assert!(job.started_at.unwrap() >= job.scheduled_at.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_perform_now_bypasses_queue() {
    let (logs, _guard) = LogCapture::install();
    let runner = TestRunner::with_builtin_tasks();

    runner
        .service
        .perform_now("clever_utility", &JobArguments::new(vec![json!(42), json!("x")]))
        .await
        .unwrap();

    assert!(runner.job_repo.is_empty().await);
    assert_eq!(logs.matching(DELAYED_TASK_MESSAGE).len(), 1);
}
