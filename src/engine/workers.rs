//! Concurrent mapping pipeline
//!
//! Distributes data rows by index over a fixed pool of worker tasks, each
//! running the row materializer, and reassembles the results in original
//! row order. Workers never touch the output or the error list directly:
//! a single aggregator owns the index-keyed result map and a single
//! collector owns the error list, each draining its own bounded channel.
//!
//! Rows that abort under strict policy are absent from the final output
//! while the batch continues — concurrent callers trade batch-abort
//! guarantees for partial-result tolerance.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::binding::BindingSet;
use super::materializer::materialize_row;
use super::registry::ParserRegistry;
use super::report::MapReport;
use super::title::TitleMap;
use crate::error::RowError;
use crate::schema::Record;
use crate::{Error, Result};

/// Depth of the bounded error queue drained by the collector
const ERROR_QUEUE_DEPTH: usize = 1024;

/// Shared read-only state for one pipeline run
struct RunContext {
    rows: Vec<Vec<String>>,
    header_index: usize,
    bindings: BindingSet,
    titles: TitleMap,
    registry: ParserRegistry,
    skip: bool,
}

/// Map `rows` across a pool of `workers` tasks
///
/// `rows` holds the data rows only (header already consumed);
/// `header_index` is carried for diagnostic row numbering. The output
/// preserves original row order regardless of completion order.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn map_with_workers<T: Record>(
    rows: Vec<Vec<String>>,
    header_index: usize,
    bindings: BindingSet,
    titles: TitleMap,
    registry: ParserRegistry,
    workers: usize,
    skip: bool,
    token: CancellationToken,
) -> Result<(Vec<T>, MapReport)> {
    let total = rows.len();
    let context = Arc::new(RunContext {
        rows,
        header_index,
        bindings,
        titles,
        registry,
        skip,
    });

    let (result_tx, mut result_rx) = mpsc::channel::<(usize, T)>(total.max(1));
    let (error_tx, mut error_rx) = mpsc::channel::<RowError>(ERROR_QUEUE_DEPTH);
    let work_queue = Arc::new(Mutex::new((0..total).collect::<VecDeque<usize>>()));

    // Workers cancel each other through a child token, so a fatal error
    // inside the pool stops the run without cancelling the caller's token.
    let run_token = token.child_token();

    info!("Spawning {} row mapping workers for {} rows", workers, total);

    let mut pool: JoinSet<Result<usize>> = JoinSet::new();
    for worker_id in 0..workers {
        let context = context.clone();
        let work_queue = work_queue.clone();
        let result_tx = result_tx.clone();
        let error_tx = error_tx.clone();
        let token = run_token.clone();

        pool.spawn(async move {
            worker_task(worker_id, context, work_queue, result_tx, error_tx, token).await
        });
    }
    // Workers hold the only remaining senders; the channels close when the
    // pool drains.
    drop(result_tx);
    drop(error_tx);

    let aggregator = tokio::spawn(async move {
        let mut by_index: HashMap<usize, T> = HashMap::new();
        while let Some((index, record)) = result_rx.recv().await {
            by_index.insert(index, record);
        }
        by_index
    });
    let collector = tokio::spawn(async move {
        let mut errors: Vec<RowError> = Vec::new();
        while let Some(error) = error_rx.recv().await {
            errors.push(error);
        }
        errors
    });

    // Join the pool, keeping the most informative fatal error: a real
    // mapping failure beats the Cancelled results of the siblings it
    // stopped.
    let mut fatal: Option<Error> = None;
    while let Some(joined) = pool.join_next().await {
        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(e) => Err(Error::Worker {
                message: e.to_string(),
            }),
        };
        if let Err(e) = outcome {
            let replace = match (&fatal, &e) {
                (None, _) => true,
                (Some(Error::Cancelled), Error::Cancelled) => false,
                (Some(Error::Cancelled), _) => true,
                _ => false,
            };
            if replace {
                fatal = Some(e);
            }
        }
    }

    let mut by_index = aggregator.await.map_err(|e| Error::Worker {
        message: e.to_string(),
    })?;
    let errors = collector.await.map_err(|e| Error::Worker {
        message: e.to_string(),
    })?;

    if let Some(e) = fatal {
        return Err(e);
    }

    // Reassemble in original row order; aborted rows are simply absent.
    let mut output = Vec::with_capacity(by_index.len());
    for index in 0..total {
        if let Some(record) = by_index.remove(&index) {
            output.push(record);
        }
    }

    let mut report = MapReport::new(total);
    report.records_mapped = output.len();
    report.rows_dropped = total - output.len();
    report.errors = errors;

    Ok((output, report))
}

/// One worker: pull row indices until the queue is empty or the run stops
async fn worker_task<T: Record>(
    worker_id: usize,
    context: Arc<RunContext>,
    work_queue: Arc<Mutex<VecDeque<usize>>>,
    result_tx: mpsc::Sender<(usize, T)>,
    error_tx: mpsc::Sender<RowError>,
    token: CancellationToken,
) -> Result<usize> {
    let mut rows_processed = 0;

    debug!("Worker {} started", worker_id);

    loop {
        // Cancellation is polled between queue pulls; in-flight rows finish.
        if token.is_cancelled() {
            debug!("Worker {} cancelled", worker_id);
            return Err(Error::Cancelled);
        }

        let index = {
            let mut queue = work_queue.lock().await;
            match queue.pop_front() {
                Some(index) => index,
                None => break,
            }
        };

        let row_number = context.header_index + 1 + index;
        let output = materialize_row::<T>(
            row_number,
            &context.rows[index],
            &context.bindings,
            &context.titles,
            &context.registry,
            context.skip,
        );

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                // Configuration defect: stop the siblings and surface it.
                token.cancel();
                return Err(e);
            }
        };

        for error in output.errors {
            if error_tx.send(error).await.is_err() {
                debug!("Worker {} error channel closed, stopping", worker_id);
                return Ok(rows_processed);
            }
        }
        if let Some(record) = output.record {
            if result_tx.send((index, record)).await.is_err() {
                debug!("Worker {} result channel closed, stopping", worker_id);
                return Ok(rows_processed);
            }
        }
        rows_processed += 1;
    }

    debug!(
        "Worker {} finished - {} rows processed",
        worker_id, rows_processed
    );
    Ok(rows_processed)
}
