//! Batch rendering across years, with a poster cache and run metrics.

use std::fs;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{error, info};

use crate::config::PosterConfig;
use crate::ephemeris::load_year;
use crate::error::{PosterError, Result};
use crate::poster::{Poster, PosterComposer};
use crate::svg::to_svg;

const DEFAULT_CACHE_CAPACITY: usize = 16;

// Performance Metrics
#[derive(Debug, Default)]
pub struct Metrics {
    compose_time: AtomicU64,
    posters_composed: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_compose(&self, duration: Duration) {
        self.compose_time
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        self.posters_composed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> String {
        format!(
            "Performance Metrics:\n\
             Posters Composed: {}\n\
             Compose Time: {}µs\n\
             Cache Hits: {}\n\
             Cache Misses: {}\n\
             Cache Hit Rate: {:.2}%",
            self.posters_composed.load(Ordering::Relaxed),
            self.compose_time.load(Ordering::Relaxed),
            self.cache_hits(),
            self.cache_misses(),
            self.cache_hit_rate() * 100.0
        )
    }

    fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits() as f64;
        let total = hits + self.cache_misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

// Poster Cache
pub struct PosterCache {
    cache: LruCache<i32, Arc<Poster>>,
}

impl PosterCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    pub fn get_poster(&mut self, year: i32) -> Option<Arc<Poster>> {
        self.cache.get(&year).cloned()
    }

    pub fn put_poster(&mut self, year: i32, poster: Arc<Poster>) {
        self.cache.put(year, poster);
    }
}

/// Outcome of rendering a range of years.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(i32, PosterError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Loads ephemeris files, composes posters and writes them out.
pub struct PosterRenderer {
    composer: PosterComposer,
    data_dir: PathBuf,
    cache: Arc<Mutex<PosterCache>>,
    metrics: Arc<Metrics>,
}

impl PosterRenderer {
    /// Validates the configuration before anything is loaded.
    pub fn new(config: PosterConfig, data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_capacity(config, data_dir, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(
        config: PosterConfig,
        data_dir: impl Into<PathBuf>,
        capacity: usize,
    ) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            composer: PosterComposer::new(config)?,
            data_dir: data_dir.into(),
            cache: Arc::new(Mutex::new(PosterCache::new(capacity))),
            metrics: Arc::new(Metrics::new()),
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn poster(&self, year: i32) -> Result<Arc<Poster>> {
        if let Some(poster) = self.cache.lock().get_poster(year) {
            self.metrics.record_cache_hit();
            return Ok(poster);
        }
        self.metrics.record_cache_miss();

        let ephemeris = load_year(&self.data_dir, year)?;
        let start = Instant::now();
        let poster = Arc::new(self.composer.compose(&ephemeris)?);
        self.metrics.record_compose(start.elapsed());

        self.cache.lock().put_poster(year, Arc::clone(&poster));
        Ok(poster)
    }

    /// Writes `<out_dir>/<year>.svg`.
    pub fn render_year(&self, year: i32, out_dir: &Path) -> Result<PathBuf> {
        let poster = self.poster(year)?;
        let path = out_dir.join(format!("{}.svg", year));
        fs::write(&path, to_svg(&poster.drawing)).map_err(|source| PosterError::WriteError {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Renders every year in parallel; a failing year does not stop the others.
    pub fn render_range(&self, years: RangeInclusive<i32>, out_dir: &Path) -> Result<BatchReport> {
        let start = Instant::now();
        fs::create_dir_all(out_dir).map_err(|source| PosterError::WriteError {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let outcomes: Vec<(i32, Result<PathBuf>)> = years
            .into_par_iter()
            .map(|year| (year, self.render_year(year, out_dir)))
            .collect();

        let mut report = BatchReport::default();
        for (year, outcome) in outcomes {
            match outcome {
                Ok(path) => {
                    info!(target: "batch", "Wrote {} poster to {}", year, path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    error!(target: "batch", "Failed to render {}: {}", year, e);
                    report.failed.push((year, e));
                }
            }
        }

        info!(
            target: "batch",
            "Rendered {} posters ({} failed) in {}ms",
            report.written.len(),
            report.failed.len(),
            start.elapsed().as_millis()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::year_path;

    fn write_year(dir: &Path, year: i32) {
        let text = format!(
            "# test data\n{y}\t1\t1\t0.000000\t2\t3\n{y}\t1\t15\t0.500000\t1\t5\n",
            y = year
        );
        fs::write(year_path(dir, year), text).unwrap();
    }

    #[test]
    fn second_request_hits_the_cache() {
        let data = tempfile::tempdir().unwrap();
        write_year(data.path(), 2025);
        let renderer = PosterRenderer::new(PosterConfig::default(), data.path()).unwrap();

        let first = renderer.poster(2025).unwrap();
        let second = renderer.poster(2025).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(renderer.metrics().cache_misses(), 1);
        assert_eq!(renderer.metrics().cache_hits(), 1);
        assert!(renderer.metrics().report().contains("Cache Hit Rate: 50.00%"));
    }

    #[test]
    fn failing_year_does_not_stop_the_batch() {
        let data = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write_year(data.path(), 2025);
        write_year(data.path(), 2027);
        fs::write(year_path(data.path(), 2026), "2026 1 1 7.0 0 4\n").unwrap();

        let renderer = PosterRenderer::new(PosterConfig::default(), data.path()).unwrap();
        let report = renderer.render_range(2025..=2028, out.path()).unwrap();

        assert_eq!(report.written.len(), 2);
        assert!(out.path().join("2025.svg").exists());
        assert!(out.path().join("2027.svg").exists());
        let mut failed: Vec<i32> = report.failed.iter().map(|(y, _)| *y).collect();
        failed.sort();
        assert_eq!(failed, vec![2026, 2028]);
        assert!(!report.is_success());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = PosterConfig::default();
        config.spiral.ds = 1.0;
        assert!(PosterRenderer::new(config, "unused").is_err());
    }

    #[test]
    fn small_cache_evicts_old_years() {
        let mut cache = PosterCache::new(NonZeroUsize::new(1).unwrap());
        let data = tempfile::tempdir().unwrap();
        write_year(data.path(), 2025);
        write_year(data.path(), 2026);
        let renderer = PosterRenderer::new(PosterConfig::default(), data.path()).unwrap();
        cache.put_poster(2025, renderer.poster(2025).unwrap());
        cache.put_poster(2026, renderer.poster(2026).unwrap());
        assert!(cache.get_poster(2025).is_none());
        assert!(cache.get_poster(2026).is_some());
    }

    #[test]
    fn failed_load_is_not_counted_as_composing() {
        let data = tempfile::tempdir().unwrap();
        let renderer = PosterRenderer::new(PosterConfig::default(), data.path()).unwrap();
        assert!(matches!(renderer.poster(2040), Err(PosterError::FileError { .. })));
        let report = renderer.metrics().report();
        assert!(report.contains("Posters Composed: 0"));
        assert!(report.contains("Compose Time: 0µs"));
        assert_eq!(renderer.metrics().cache_misses(), 1);
    }
}
