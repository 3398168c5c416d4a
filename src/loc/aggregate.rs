//! Batched, parallel line counting.
//!
//! Each module's files are split into fixed-size batches. A pool of scoped
//! worker threads pulls batches from a shared channel and runs the line
//! counter on them; results flow back through a second channel to a single
//! collector, which owns the totals.

use crossbeam_channel::unbounded;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::thread;

use tracing::{debug, info};

use super::scc::LineCounter;
use super::CountError;
use crate::graph::ModuleId;

/// Default number of files handed to one counter invocation.
///
/// Keeps command lines well under OS argument limits.
pub const DEFAULT_BATCH_SIZE: usize = 300;

/// Settings for the line-count stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CountConfig {
    /// Files per counter invocation.
    pub batch_size: usize,
    /// Number of worker threads.
    pub workers: usize,
    /// Language record to read from the counter output.
    pub language: String,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            language: "Go".to_string(),
        }
    }
}

/// One unit of work: a slice of a module's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Sequential batch id
    pub id: usize,
    /// Module the files belong to
    pub module: ModuleId,
    /// Files to count
    pub files: Vec<PathBuf>,
}

/// Line count of a single batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Id of the batch this result belongs to
    pub batch_id: usize,
    /// Module the batch belongs to
    pub module: ModuleId,
    /// Code lines in the configured language
    pub lines: u64,
}

/// Aggregated line counts per module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMetrics {
    lines: BTreeMap<ModuleId, u64>,
    total: u64,
    total_excluding_stdlib: u64,
    batches: usize,
}

impl ModuleMetrics {
    /// Folds one batch result into the totals.
    pub fn record(&mut self, result: BatchResult) {
        self.total += result.lines;
        if !result.module.is_stdlib() {
            self.total_excluding_stdlib += result.lines;
        }
        *self.lines.entry(result.module).or_default() += result.lines;
        self.batches += 1;
    }

    /// Code lines counted for `module`, zero if it owns no files.
    pub fn lines_for(&self, module: &ModuleId) -> u64 {
        self.lines.get(module).copied().unwrap_or(0)
    }

    /// The smallest per-module count, the baseline for node sizes.
    ///
    /// Modules without files never received a count and are not considered.
    pub fn min_lines(&self) -> Option<u64> {
        self.lines.values().copied().min()
    }

    /// Total code lines across all modules.
    pub fn total_lines(&self) -> u64 {
        self.total
    }

    /// Total code lines outside the standard library bucket.
    pub fn total_lines_excluding_stdlib(&self) -> u64 {
        self.total_excluding_stdlib
    }

    /// Number of batches folded in.
    pub fn batch_count(&self) -> usize {
        self.batches
    }

    /// Iterates over modules that received a count.
    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, u64)> {
        self.lines.iter().map(|(module, &lines)| (module, lines))
    }
}

/// Splits every module's files into batches of at most `batch_size` files.
///
/// # Example
///
/// ```
/// use std::collections::{BTreeMap, BTreeSet};
/// use std::path::PathBuf;
/// use modscope::graph::ModuleId;
/// use modscope::loc::plan_batches;
///
/// let files: BTreeSet<PathBuf> = (0..7).map(|i| PathBuf::from(format!("{}.go", i))).collect();
/// let mut by_module = BTreeMap::new();
/// by_module.insert(ModuleId::stdlib(), files);
///
/// let batches = plan_batches(&by_module, 3);
/// let sizes: Vec<usize> = batches.iter().map(|b| b.files.len()).collect();
/// assert_eq!(sizes, vec![3, 3, 1]);
/// ```
pub fn plan_batches(
    files_by_module: &BTreeMap<ModuleId, BTreeSet<PathBuf>>,
    batch_size: usize,
) -> Vec<Batch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::new();

    for (module, files) in files_by_module {
        let files: Vec<PathBuf> = files.iter().cloned().collect();
        for chunk in files.chunks(batch_size) {
            batches.push(Batch {
                id: batches.len(),
                module: module.clone(),
                files: chunk.to_vec(),
            });
        }
    }

    batches
}

/// Counts one batch and extracts the configured language.
pub fn count_batch<C>(counter: &C, batch: &Batch, language: &str) -> Result<BatchResult, CountError>
where
    C: LineCounter + ?Sized,
{
    let counts = counter.count(&batch.files)?;
    let record = counts
        .into_iter()
        .find(|count| count.name == language)
        .ok_or_else(|| CountError::MissingLanguage {
            language: language.to_string(),
            module: batch.module.name().to_string(),
            batch: batch.id,
        })?;

    if record.code == 0 {
        return Err(CountError::EmptyCount {
            language: language.to_string(),
            module: batch.module.name().to_string(),
            batch: batch.id,
        });
    }

    Ok(BatchResult {
        batch_id: batch.id,
        module: batch.module.clone(),
        lines: record.code,
    })
}

/// Counts code lines for every module.
///
/// Blocks until every batch has been counted. The first failing batch aborts
/// the whole stage; workers still running stop after their current batch.
///
/// # Arguments
///
/// * `counter` - Line counter invoked once per batch
/// * `files_by_module` - Source files per module
/// * `config` - Batch size, worker count and language
pub fn count_lines<C>(
    counter: &C,
    files_by_module: &BTreeMap<ModuleId, BTreeSet<PathBuf>>,
    config: &CountConfig,
) -> Result<ModuleMetrics, CountError>
where
    C: LineCounter + ?Sized,
{
    let batches = plan_batches(files_by_module, config.batch_size);
    let batch_count = batches.len();
    if batch_count == 0 {
        return Ok(ModuleMetrics::default());
    }

    let worker_count = config.workers.clamp(1, batch_count);
    info!(
        "Counting lines in {} batches with {} workers",
        batch_count, worker_count
    );

    let (work_tx, work_rx) = unbounded::<Batch>();
    let (result_tx, result_rx) = unbounded::<Result<BatchResult, CountError>>();

    for batch in batches {
        if work_tx.send(batch).is_err() {
            break;
        }
    }
    drop(work_tx);

    let language = config.language.as_str();

    thread::scope(|scope| {
        for worker in 0..worker_count {
            let rx = work_rx.clone();
            let tx = result_tx.clone();
            scope.spawn(move || {
                for batch in rx {
                    debug!(
                        "Worker {} counting batch {} ({} files, module {})",
                        worker,
                        batch.id,
                        batch.files.len(),
                        batch.module
                    );
                    if tx.send(count_batch(counter, &batch, language)).is_err() {
                        break; // Collector gave up
                    }
                }
            });
        }
        drop(result_tx);

        // Owned here so an early return disconnects the workers.
        let results = result_rx;
        let mut metrics = ModuleMetrics::default();
        for received in 0..batch_count {
            let result = results.recv().map_err(|_| CountError::WorkerLost {
                expected: batch_count,
                received,
            })??;
            metrics.record(result);
        }
        Ok(metrics)
    })
}
