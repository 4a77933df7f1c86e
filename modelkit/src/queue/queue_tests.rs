//! Tests for deferred pipelines on the in-memory and tokio queues.

#[cfg(test)]
mod tests {
    use crate::config::QueueConfig;
    use crate::errors::ModelkitError;
    use crate::pipeline::{pipe_fn, Next, Pipeline, PipesThrough, SharedPipe};
    use crate::queue::{
        DeferredPipeline, InMemoryTaskQueue, Job, TaskQueue, TokioTaskQueue,
        DEFERRED_PIPELINE_JOB,
    };
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Report {
        title: String,
        steps: Vec<String>,
    }

    impl Report {
        fn new(title: &str) -> Self {
            Self {
                title: title.to_string(),
                steps: Vec::new(),
            }
        }
    }

    impl PipesThrough for Report {}

    fn step(name: &'static str) -> SharedPipe<Report> {
        pipe_fn(move |mut report: Report, next: Next<'_, Report>| {
            report.steps.push(name.to_string());
            next.run(report)
        })
    }

    fn sink(into: &Arc<Mutex<Vec<Report>>>) -> SharedPipe<Report> {
        let into = Arc::clone(into);
        pipe_fn(move |report: Report, next: Next<'_, Report>| {
            let report = next.run(report)?;
            into.lock().push(report.clone());
            Ok(report)
        })
    }

    #[test]
    fn test_deferred_record_matches_sync_run() {
        let pipes = vec![step("load"), step("render")];

        let sync = Pipeline::new()
            .through_all(pipes.clone())
            .then_return(Report::new("q3"))
            .unwrap();
        let deferred = DeferredPipeline::new(Report::new("q3"), pipes).run().unwrap();

        assert_eq!(deferred, sync);
        assert_eq!(deferred.steps, vec!["load", "render"]);
    }

    #[test]
    fn test_record_snapshot_ignores_later_changes() {
        let mut pipes = vec![step("one")];
        let record = DeferredPipeline::new(Report::new("snap"), pipes.clone());
        pipes.push(step("two"));

        assert_eq!(record.pipe_count(), 1);
        assert_eq!(record.subject().title, "snap");
        assert_eq!(record.run().unwrap().steps, vec!["one"]);
    }

    #[test]
    fn test_in_memory_queue_runs_in_push_order() {
        let queue = InMemoryTaskQueue::new("reports");
        let done = Arc::new(Mutex::new(Vec::new()));

        for title in ["a", "b", "c"] {
            Report::new(title)
                .dispatch_pipeline(&queue, Some(vec![step("x"), sink(&done)]))
                .unwrap();
        }

        assert_eq!(queue.len(), 3);
        assert!(done.lock().is_empty());

        assert_eq!(queue.drain(), 3);
        assert!(queue.is_empty());
        let titles: Vec<String> = done.lock().iter().map(|r| r.title.clone()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_in_memory_queue_records_failures() {
        let queue = InMemoryTaskQueue::new("reports");
        let boom = pipe_fn(|_: Report, _next: Next<'_, Report>| Err(anyhow::anyhow!("render failed")));

        let ack = Report::new("bad")
            .dispatch_pipeline(&queue, Some(vec![boom]))
            .unwrap();

        let result = queue.work_next().unwrap();
        assert!(result.is_err());

        let failed = queue.failed_jobs();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].job_id, ack.job_id);
        assert_eq!(failed[0].job_name, DEFERRED_PIPELINE_JOB);
        assert_eq!(failed[0].error, "render failed");
        assert!(queue.work_next().is_none());
    }

    #[test]
    fn test_in_memory_queue_survives_panicking_job() {
        let queue = InMemoryTaskQueue::new("reports");
        let done = Arc::new(Mutex::new(Vec::new()));
        let panic = pipe_fn(|_: Report, _next: Next<'_, Report>| -> anyhow::Result<Report> {
            panic!("pipe panicked")
        });

        let bad = Report::new("bad").dispatch_pipeline(&queue, Some(vec![panic])).unwrap();
        Report::new("good")
            .dispatch_pipeline(&queue, Some(vec![sink(&done)]))
            .unwrap();

        assert_eq!(queue.drain(), 2);
        assert!(queue.is_empty());

        let failed = queue.failed_jobs();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].job_id, bad.job_id);
        assert_eq!(failed[0].error, "job panicked: pipe panicked");
        assert_eq!(done.lock()[0].title, "good");
    }

    #[test]
    fn test_ack_log_keeps_most_recent_pushes() {
        let queue = InMemoryTaskQueue::from_config(&QueueConfig::new().with_name("bounded").with_max_pushed_acks(3));

        let acks: Vec<_> = (0..10_000)
            .map(|i| {
                let ack = Report::new(&i.to_string())
                    .dispatch_pipeline(&queue, Some(vec![step("x")]))
                    .unwrap();
                assert_eq!(queue.drain(), 1);
                ack
            })
            .collect();

        assert_eq!(queue.pushed(), acks[acks.len() - 3..].to_vec());
        assert!(queue.was_pushed(DEFERRED_PIPELINE_JOB));
        assert_eq!(queue.take_pushed().len(), 3);
        assert!(queue.pushed().is_empty());
    }

    #[test]
    fn test_ack_describes_job() {
        let queue = InMemoryTaskQueue::new("reports");
        let record = DeferredPipeline::new(Report::new("ack"), Vec::new());
        let id = record.id();

        let ack = queue.push(Box::new(record)).unwrap();

        assert_eq!(ack.job_id, id);
        assert_eq!(ack.queue, "reports");
        assert_eq!(queue.pushed(), vec![ack]);
    }

    #[tokio::test]
    async fn test_tokio_queue_runs_jobs_after_dispatch() {
        let queue = TokioTaskQueue::start(&QueueConfig::new().with_name("workers"));
        let done = Arc::new(Mutex::new(Vec::new()));

        for title in ["first", "second"] {
            let ack = Report::new(title)
                .dispatch_pipeline(&queue, Some(vec![step("render"), sink(&done)]))
                .unwrap();
            assert_eq!(ack.queue, "workers");
        }

        queue.shutdown().await;

        assert_eq!(queue.processed(), 2);
        assert!(queue.failed_jobs().is_empty());
        let done = done.lock();
        assert_eq!(done.len(), 2);
        assert_eq!(done[0].title, "first");
        assert_eq!(done[1].steps, vec!["render"]);
    }

    #[tokio::test]
    async fn test_tokio_queue_reports_failures_and_panics() {
        let queue = TokioTaskQueue::start(&QueueConfig::default());

        let fail = pipe_fn(|_: Report, _next: Next<'_, Report>| Err(anyhow::anyhow!("no data")));
        Report::new("fails").dispatch_pipeline(&queue, Some(vec![fail])).unwrap();

        let panic = pipe_fn(|_: Report, _next: Next<'_, Report>| -> anyhow::Result<Report> {
            panic!("pipe panicked")
        });
        Report::new("panics").dispatch_pipeline(&queue, Some(vec![panic])).unwrap();

        queue.shutdown().await;

        let failed = queue.failed_jobs();
        assert_eq!(queue.processed(), 2);
        assert_eq!(failed.len(), 2);
        assert_eq!(failed[0].error, "no data");
        assert!(failed[1].error.contains("panic"));
    }

    #[tokio::test]
    async fn test_tokio_queue_rejects_after_shutdown() {
        let queue = TokioTaskQueue::start(&QueueConfig::new().with_name("closing"));
        queue.shutdown().await;

        assert!(!queue.is_open());
        let record: Box<dyn Job> = Box::new(DeferredPipeline::new(Report::new("late"), Vec::new()));
        let err = queue.push(record).unwrap_err();
        assert!(matches!(err, ModelkitError::QueueClosed(name) if name == "closing"));
    }
}
