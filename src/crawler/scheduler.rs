//! Batch scheduler for page fetches
//!
//! This module handles:
//! - Splitting candidates into chunks of the effective concurrency
//! - Running each chunk's fetches as concurrent tokio tasks
//! - Stopping once enough pages have been collected
//! - Pausing between chunks

use crate::config::ScraperConfig;
use futures::future::join_all;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Runs page fetches in bounded, delayed batches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchScheduler {
    chunk_size: usize,
    max_results: usize,
    batch_delay: Duration,
}

impl BatchScheduler {
    /// Creates a scheduler
    ///
    /// # Arguments
    ///
    /// * `concurrency` - Fetches per chunk (raised to 1 if zero)
    /// * `max_results` - Stop once this many results are collected
    /// * `batch_delay` - Pause between consecutive chunks
    pub fn new(concurrency: usize, max_results: usize, batch_delay: Duration) -> Self {
        Self {
            chunk_size: concurrency.max(1),
            max_results,
            batch_delay,
        }
    }

    /// Creates the scheduler for a session
    ///
    /// Rendering sessions fetch one page at a time. The batch delay is the
    /// configured delay or the robots.txt crawl delay, whichever is longer.
    pub fn for_session(config: &ScraperConfig, crawl_delay: Option<Duration>) -> Self {
        let concurrency = if config.render_javascript {
            1
        } else {
            config.concurrency
        };
        let batch_delay = crawl_delay.map_or(config.batch_delay(), |delay| delay.max(config.batch_delay()));

        Self::new(concurrency, config.max_pages, batch_delay)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// Runs `fetch` over every URL, chunk by chunk
    ///
    /// Each fetch runs in its own task; a panicking fetch is logged and counts
    /// as no result. Results keep candidate order and are truncated to
    /// `max_results`.
    pub async fn run<F, Fut, T>(&self, urls: Vec<Url>, fetch: F) -> Vec<T>
    where
        F: Fn(Url) -> Fut,
        Fut: Future<Output = Option<T>> + Send + 'static,
        T: Send + 'static,
    {
        let mut results = Vec::new();
        let chunks: Vec<&[Url]> = urls.chunks(self.chunk_size).collect();
        let total_chunks = chunks.len();

        for (index, chunk) in chunks.into_iter().enumerate() {
            tracing::debug!(
                "Fetching batch {}/{} ({} URLs)",
                index + 1,
                total_chunks,
                chunk.len()
            );

            let handles: Vec<_> = chunk
                .iter()
                .map(|url| tokio::spawn(fetch(url.clone())))
                .collect();

            for outcome in join_all(handles).await {
                match outcome {
                    Ok(Some(result)) => results.push(result),
                    Ok(None) => {}
                    Err(e) => tracing::error!("Page fetch task failed: {}", e),
                }
            }

            if results.len() >= self.max_results {
                tracing::debug!("Collected {} results, stopping early", results.len());
                break;
            }

            if index + 1 < total_chunks && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
        }

        results.truncate(self.max_results);
        results
    }
}
