//! Core processing engine
//!
//! Fans dictionary words out to a bounded pool of generation workers and
//! drains their variants through a single buffered sink.
//!
//! ```text
//! dictionary ──▶ dispatcher ──(permit)──▶ worker × threads ──▶ queue ──▶ sink ──▶ stdout
//! ```
//!
//! The dispatcher takes a permit before spawning each word's task, so at
//! most `threads` words are in flight; workers return their permit when the
//! word is exhausted. Workers block on the bounded queue when the sink falls
//! behind. The run completes once every word has been dispatched, every
//! worker has finished and the sink has flushed.

use crate::cli::Args;
use crate::generate::{Bounds, Strategy};
use crate::output::OutputWriter;
use crate::progress::{create_spinner, print_warning, ProcessingStats};
use crate::table::SubstitutionTable;
use crate::wordlist::MmapLineIterator;

use anyhow::Context;
use colored::*;
use crossbeam_channel::bounded;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default capacity of the variant queue
pub const DEFAULT_QUEUE_SIZE: usize = 1000;

/// Processor configuration
pub struct ProcessorConfig {
    pub dictionary: PathBuf,
    pub tables: Vec<PathBuf>,
    pub bounds: Bounds,
    pub strategy: Strategy,
    pub threads: usize,
    pub queue_size: usize,
    pub buffer_size: usize,
    pub quiet: bool,
    pub show_stats: bool,
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        Ok(Self {
            dictionary: args.dictionary.clone(),
            tables: args.tables.clone(),
            bounds: Bounds::new(args.min, args.max),
            strategy: args.strategy(),
            threads: args.get_threads(),
            queue_size: args.queue_size,
            buffer_size: args.parse_buffer_size()?,
            quiet: args.quiet,
            show_stats: args.stats,
        })
    }
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    stats: Arc<ProcessingStats>,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            stats: Arc::new(ProcessingStats::new()),
        }
    }

    /// Load the tables, open the dictionary and write all variants to stdout
    pub fn process(&self) -> anyhow::Result<()> {
        let table = SubstitutionTable::from_files(&self.config.tables)?;
        if table.is_empty() && !self.config.quiet {
            print_warning("Substitution tables contain no usable entries; no variants will be generated");
        }

        let words = MmapLineIterator::new(&self.config.dictionary)?;
        log::debug!("Dictionary {:?} ({} bytes)", self.config.dictionary, words.size());

        self.run(words, &table, std::io::stdout())?;

        if self.config.show_stats {
            self.stats.print_summary();
        }

        Ok(())
    }

    /// Run the dispatch pipeline over `words`, writing variants to `out`.
    ///
    /// Returns once every dispatched word has been fully generated and the
    /// output has been flushed. A write failure stops further dispatching and
    /// is returned after in-flight workers have finished.
    pub fn run<I, W>(&self, words: I, table: &SubstitutionTable, out: W) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = Vec<u8>>,
        W: Write + Send,
    {
        let threads = self.config.threads.max(1);
        let strategy = self.config.strategy;
        let bounds = self.config.bounds;
        let buffer_size = self.config.buffer_size;

        log::info!(
            "Generating {} variants with {} substitutions, {} threads",
            strategy,
            format_bounds(bounds),
            threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("generate-{}", i))
            .build()
            .context("Failed to build worker pool")?;

        let (permit_tx, permit_rx) = bounded::<()>(threads);
        let (variant_tx, variant_rx) = bounded::<Vec<u8>>(self.config.queue_size.max(1));
        let sink_closed = AtomicBool::new(false);

        let pb = if self.config.quiet || !self.config.show_stats {
            indicatif::ProgressBar::hidden()
        } else {
            create_spinner("Generating...")
        };

        let stats = &self.stats;

        let (lines, bytes) = std::thread::scope(|scope| -> anyhow::Result<(u64, u64)> {
            let sink = scope.spawn(move || -> std::io::Result<(u64, u64)> {
                let mut writer = OutputWriter::new(out, buffer_size);
                for variant in variant_rx {
                    writer.write_line(&variant)?;
                }
                writer.flush()?;
                Ok((writer.lines_written(), writer.bytes_written()))
            });

            pool.in_place_scope(|s| {
                for word in words {
                    if sink_closed.load(Ordering::Relaxed) {
                        log::debug!("Output closed, stopping dispatch");
                        break;
                    }

                    // Blocks while `threads` words are in flight.
                    if permit_tx.send(()).is_err() {
                        break;
                    }

                    let tx = variant_tx.clone();
                    let permit_rx = &permit_rx;
                    let sink_closed = &sink_closed;

                    s.spawn(move |_| {
                        strategy.generate(&word, table, bounds, &mut |variant| {
                            if tx.send(variant).is_err() {
                                sink_closed.store(true, Ordering::Relaxed);
                            }
                        });
                        let _ = permit_rx.recv();
                    });

                    stats.add_word();
                    pb.inc(1);
                }
            });

            // Last sender gone: the sink drains what is left and stops.
            drop(variant_tx);

            let written = sink
                .join()
                .map_err(|_| anyhow::anyhow!("Output thread panicked"))?
                .context("Failed to write variants")?;
            Ok(written)
        })?;

        stats.add_output(lines, bytes);
        pb.finish_with_message("Complete".green().to_string());

        log::info!(
            "Generated {} variants from {} words in {:?}",
            lines,
            stats.get_words(),
            stats.elapsed()
        );

        Ok(())
    }

    /// Get processing statistics
    pub fn stats(&self) -> Arc<ProcessingStats> {
        Arc::clone(&self.stats)
    }
}

fn format_bounds(bounds: Bounds) -> String {
    format!("[{}, {}]", bounds.min(), bounds.max())
}
