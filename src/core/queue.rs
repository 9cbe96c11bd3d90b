//! Bounded pipeline work queue and its worker pool.
//!
//! HTTP handlers enqueue jobs with `try_send` and answer immediately; a fixed
//! set of workers drains the queue and drives the orchestrators. In-flight
//! work stays enumerable through the atomic counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::errors::Error;
use crate::pipeline::{self, PipelineContext};

/// Caller-supplied material the source-analysis step starts from.
#[derive(Debug, Clone)]
pub struct SourceInputs {
    pub query: String,
    pub seed_urls: Vec<String>,
    pub ai_citations_text: String,
    pub ai_overview_text: String,
}

/// One unit of background work, bound to an already-created task record.
#[derive(Debug)]
pub enum PipelineJob {
    Run {
        task_id: String,
        inputs: SourceInputs,
    },
    Brief {
        task_id: String,
        inputs: SourceInputs,
    },
    /// Covers both `from_brief` and `from_custom_brief`; the latter has no
    /// back-reference.
    Article {
        task_id: String,
        query: String,
        source_brief_id: Option<String>,
        brief_markdown: String,
    },
    QuickDraft {
        task_id: String,
        inputs: SourceInputs,
    },
}

impl PipelineJob {
    pub fn task_id(&self) -> &str {
        match self {
            PipelineJob::Run { task_id, .. }
            | PipelineJob::Brief { task_id, .. }
            | PipelineJob::Article { task_id, .. }
            | PipelineJob::QuickDraft { task_id, .. } => task_id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PipelineJob::Run { .. } => "run",
            PipelineJob::Brief { .. } => "brief",
            PipelineJob::Article { .. } => "article",
            PipelineJob::QuickDraft { .. } => "quick_draft",
        }
    }
}

/// Handle used by HTTP handlers to submit jobs.
#[derive(Clone)]
pub struct PipelineQueue {
    tx: mpsc::Sender<PipelineJob>,
    in_flight: Arc<AtomicUsize>,
}

impl PipelineQueue {
    /// Creates the queue and returns the receiver half for `spawn_workers`.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PipelineJob>) {
        let (tx, rx) = mpsc::channel(capacity);
        let queue = PipelineQueue {
            tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        };
        (queue, rx)
    }

    /// Submits a job without waiting. A full queue is surfaced to the caller
    /// instead of blocking the request.
    pub fn enqueue(&self, job: PipelineJob) -> Result<(), Error> {
        self.tx.try_send(job).map_err(|err| match err {
            TrySendError::Full(job) => Error::StoreError(format!(
                "pipeline queue is full, rejected {} job for task {}",
                job.label(),
                job.task_id()
            )),
            TrySendError::Closed(_) => Error::StoreError("pipeline queue is closed".to_string()),
        })
    }

    /// Number of jobs currently being processed by workers.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Spawns `count` workers draining the queue until the sender side drops.
    pub fn spawn_workers(
        &self,
        count: usize,
        rx: mpsc::Receiver<PipelineJob>,
        ctx: PipelineContext,
    ) {
        let rx = Arc::new(Mutex::new(rx));
        for worker_id in 0..count {
            let rx = Arc::clone(&rx);
            let ctx = ctx.clone();
            let in_flight = Arc::clone(&self.in_flight);
            tokio::spawn(async move {
                loop {
                    let job = { rx.lock().await.recv().await };
                    let Some(job) = job else {
                        info!(worker_id, "pipeline queue closed, worker exiting");
                        break;
                    };
                    in_flight.fetch_add(1, Ordering::SeqCst);
                    info!(
                        worker_id,
                        task_id = job.task_id(),
                        kind = job.label(),
                        "pipeline job started"
                    );
                    run_job(&ctx, job).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
            });
        }
    }
}

async fn run_job(ctx: &PipelineContext, job: PipelineJob) {
    match job {
        PipelineJob::Run { task_id, inputs } => {
            pipeline::process_run(ctx, &task_id, inputs).await;
        }
        PipelineJob::Brief { task_id, inputs } => {
            pipeline::process_brief(ctx, &task_id, inputs).await;
        }
        PipelineJob::Article {
            task_id,
            query,
            source_brief_id,
            brief_markdown,
        } => {
            pipeline::process_article_from_brief(
                ctx,
                &task_id,
                &query,
                source_brief_id,
                &brief_markdown,
            )
            .await;
        }
        PipelineJob::QuickDraft { task_id, inputs } => {
            pipeline::process_quick_draft(ctx, &task_id, inputs).await;
        }
    }
}

/// Marks records left `queued`/`running` by a previous process as failed.
/// The queue only lives in-process, so after a restart those records can
/// never make progress again.
pub fn mark_interrupted_tasks(db: &crate::db::Database) {
    use crate::core::{TaskPatch, TaskStatus};
    use crate::db::TaskRepository;

    let mut conn = match db.get_conn() {
        Ok(conn) => conn,
        Err(err) => {
            error!("Failed to check for interrupted tasks: {}", err);
            return;
        }
    };
    let mut repo = TaskRepository::new(&mut conn);
    let stale = match repo.list_unfinished() {
        Ok(tasks) => tasks,
        Err(err) => {
            error!("Failed to list unfinished tasks: {}", err);
            return;
        }
    };
    for task in stale {
        let patch = TaskPatch::new()
            .status(TaskStatus::Failed)
            .stage(crate::constants::STAGE_FAILED)
            .progress(100)
            .error("Pipeline interrupted by a server restart. Submit the request again.");
        if let Err(err) = repo.update_task(&task.id, patch) {
            error!(task_id = %task.id, "Failed to mark interrupted task: {}", err);
        } else {
            info!(task_id = %task.id, "Marked interrupted task as failed");
        }
    }
}
