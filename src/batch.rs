use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use rayon::prelude::*;

use crate::{
    config::GeneratorConfig,
    foundation::error::{SwapError, SwapResult},
    output::{TaskWriter, task_id},
    prompt::PromptStyle,
    task::TaskGenerator,
};

/// SplitMix64 finalizer.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Independent per-task seed, stable for a given `(base, index)`.
pub fn derive_task_seed(base: u64, index: u64) -> u64 {
    mix64(base.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Cooperative stop signal, checked before each task starts.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct TaskFailure {
    pub index: u64,
    pub task_id: String,
    pub error: SwapError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub base_seed: u64,
    pub written: Vec<PathBuf>,
    pub failures: Vec<TaskFailure>,
    pub skipped: u64,
}

pub struct BatchRunner {
    generator: TaskGenerator,
    writer: TaskWriter,
    cancel: CancelFlag,
}

impl BatchRunner {
    /// Validates `config` and checks for ffmpeg once; the writer is shared by every task.
    pub fn new(config: GeneratorConfig) -> SwapResult<Self> {
        let generator = TaskGenerator::new(config)?;
        let writer = TaskWriter::new(generator.config());
        Ok(Self {
            generator,
            writer,
            cancel: CancelFlag::new(),
        })
    }

    pub fn with_prompt_style(mut self, style: PromptStyle) -> Self {
        self.writer = self.writer.with_prompt_style(style);
        self
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn generator(&self) -> &TaskGenerator {
        &self.generator
    }

    /// Generates and writes `num_samples` tasks. A failing task is recorded and skipped;
    /// only pool construction failures abort the run.
    pub fn run(&self) -> SwapResult<BatchReport> {
        let cfg = self.generator.config();
        let base_seed = cfg.random_seed.unwrap_or_else(rand::random::<u64>);
        let pool = build_thread_pool(cfg.threads)?;

        tracing::info!(
            samples = cfg.num_samples,
            base_seed,
            root = %self.writer.root().display(),
            "starting batch"
        );

        let outcomes: Vec<(u64, String, Option<SwapResult<PathBuf>>)> = pool.install(|| {
            (0..u64::from(cfg.num_samples))
                .into_par_iter()
                .map(|index| {
                    let id = task_id(&cfg.domain, index);
                    if self.cancel.is_cancelled() {
                        return (index, id, None);
                    }
                    let seed = derive_task_seed(base_seed, index);
                    let result = self
                        .generator
                        .generate(&id, seed)
                        .and_then(|task| self.writer.write(&task));
                    (index, id, Some(result))
                })
                .collect()
        });

        let mut report = BatchReport {
            base_seed,
            ..BatchReport::default()
        };
        for (index, id, outcome) in outcomes {
            match outcome {
                None => report.skipped += 1,
                Some(Ok(dir)) => report.written.push(dir),
                Some(Err(error)) => {
                    tracing::warn!(task = %id, %error, "task failed; continuing");
                    report.failures.push(TaskFailure {
                        index,
                        task_id: id,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            written = report.written.len(),
            failed = report.failures.len(),
            skipped = report.skipped,
            "batch finished"
        );
        Ok(report)
    }
}

fn build_thread_pool(threads: Option<usize>) -> SwapResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SwapError::configuration("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SwapError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}
