//! K-means clustering with k-means++ seeding
//!
//! Regimes are detected by clustering the rolling feature matrix. The engine
//! is pure: randomness is injected through [`rand::Rng`] and progress is
//! reported to an optional [`FitObserver`] supplied by the caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{EngineError, Result};
use crate::matrix::Matrix;

/// Receives progress events from a k-means fit
pub trait FitObserver {
    fn on_iteration(&mut self, _iteration: usize, _inertia: f64, _movement: f64) {}

    fn on_converged(&mut self, _iteration: usize, _inertia: f64) {}

    fn on_max_iters(&mut self, _max_iters: usize, _inertia: f64) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl FitObserver for NoopObserver {}

/// Observer that forwards progress to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FitObserver for TracingObserver {
    fn on_iteration(&mut self, iteration: usize, inertia: f64, movement: f64) {
        tracing::debug!(iteration, inertia, movement, "K-Means iteration");
    }

    fn on_converged(&mut self, iteration: usize, inertia: f64) {
        tracing::info!(iteration, inertia, "K-Means converged at iteration {}", iteration);
    }

    fn on_max_iters(&mut self, max_iters: usize, inertia: f64) {
        tracing::warn!(max_iters, inertia, "K-Means reached max iterations without converging");
    }
}

/// K-means model. Centroids, inertia and the convergence iteration describe
/// the most recent fit.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    max_iters: usize,
    tolerance: f64,
    centroids: Matrix,
    inertia: f64,
    converged_at: Option<usize>,
}

impl KMeans {
    pub fn new(k: usize, max_iters: usize, tolerance: f64) -> Self {
        KMeans {
            k,
            max_iters,
            tolerance,
            centroids: Matrix::zeros(0, 0),
            inertia: 0.0,
            converged_at: None,
        }
    }

    pub fn centroids(&self) -> &Matrix {
        &self.centroids
    }

    /// Sum of squared distances from each row to its assigned centroid
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Iteration at which centroid movement fell below tolerance
    pub fn converged_at(&self) -> Option<usize> {
        self.converged_at
    }

    /// Cluster `x` and return one label in `[0, k)` per row
    pub fn fit_predict<R: Rng + ?Sized>(&mut self, x: &Matrix, rng: &mut R) -> Result<Vec<usize>> {
        self.fit_predict_observed(x, rng, &mut NoopObserver)
    }

    /// Cluster with a deterministic seed
    pub fn fit_predict_seeded(&mut self, x: &Matrix, seed: u64) -> Result<Vec<usize>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.fit_predict(x, &mut rng)
    }

    pub fn fit_predict_observed<R: Rng + ?Sized>(
        &mut self,
        x: &Matrix,
        rng: &mut R,
        observer: &mut dyn FitObserver,
    ) -> Result<Vec<usize>> {
        if self.k == 0 {
            return Err(EngineError::invalid("k must be at least 1"));
        }
        if x.rows() < self.k {
            return Err(EngineError::invalid(format!(
                "number of samples ({}) must be >= k ({})",
                x.rows(),
                self.k
            )));
        }
        if x.cols() == 0 {
            return Err(EngineError::invalid("feature matrix has no columns"));
        }

        self.converged_at = None;
        self.initialize_centroids(x, rng)?;

        for iteration in 0..self.max_iters {
            let labels = self.assign_clusters(x)?;
            let movement = self.update_centroids(x, &labels)?;
            observer.on_iteration(iteration, self.inertia, movement);

            if movement < self.tolerance {
                self.converged_at = Some(iteration);
                observer.on_converged(iteration, self.inertia);
                return Ok(labels);
            }
        }

        let labels = self.assign_clusters(x)?;
        observer.on_max_iters(self.max_iters, self.inertia);
        Ok(labels)
    }

    /// k-means++: each new centroid is drawn with probability proportional
    /// to its squared distance from the nearest centroid chosen so far.
    fn initialize_centroids<R: Rng + ?Sized>(&mut self, x: &Matrix, rng: &mut R) -> Result<()> {
        let rows = x.rows();
        self.centroids = Matrix::zeros(self.k, x.cols());

        let first = rng.gen_range(0..rows);
        self.centroids.row_mut(0)?.copy_from_slice(x.row(first)?);

        let mut nearest = vec![f64::INFINITY; rows];

        for c in 1..self.k {
            let latest = self.centroids.row(c - 1)?;
            for (i, row) in x.iter_rows().enumerate() {
                nearest[i] = nearest[i].min(squared_distance(row, latest));
            }

            let total: f64 = nearest.iter().sum();
            if !total.is_finite() {
                return Err(EngineError::invalid(
                    "squared distances overflow during seeding; rescale the features",
                ));
            }
            // All rows coincide with a centroid: take the last row scanned
            let chosen = if total > 0.0 {
                weighted_pick(&nearest, rng.gen_range(0.0..=total))
            } else {
                rows - 1
            };

            self.centroids.row_mut(c)?.copy_from_slice(x.row(chosen)?);
        }

        Ok(())
    }

    /// Label each row with its nearest centroid; lowest index wins ties
    fn assign_clusters(&mut self, x: &Matrix) -> Result<Vec<usize>> {
        let mut labels = Vec::with_capacity(x.rows());
        self.inertia = 0.0;

        for row in x.iter_rows() {
            let mut best_cluster = 0;
            let mut min_dist = f64::INFINITY;

            for c in 0..self.k {
                let dist = squared_distance(row, self.centroids.row(c)?);
                if dist < min_dist {
                    min_dist = dist;
                    best_cluster = c;
                }
            }

            labels.push(best_cluster);
            self.inertia += min_dist;
        }

        Ok(labels)
    }

    /// Move centroids to the mean of their members and return the total
    /// Euclidean movement. Empty clusters keep their previous centroid.
    fn update_centroids(&mut self, x: &Matrix, labels: &[usize]) -> Result<f64> {
        let cols = x.cols();
        let mut sums = Matrix::zeros(self.k, cols);
        let mut counts = vec![0usize; self.k];

        for (row, &label) in x.iter_rows().zip(labels) {
            counts[label] += 1;
            for (acc, value) in sums.row_mut(label)?.iter_mut().zip(row) {
                *acc += value;
            }
        }

        let mut movement = 0.0;
        for (c, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let sum = sums.row(c)?;
            let centroid = self.centroids.row_mut(c)?;
            let mut shift = 0.0;
            for (coord, total) in centroid.iter_mut().zip(sum) {
                let updated = total / count as f64;
                shift += (updated - *coord).powi(2);
                *coord = updated;
            }
            movement += shift.sqrt();
        }

        Ok(movement)
    }
}

/// First index whose cumulative weight reaches `target`; the last index
/// when rounding leaves the running sum short
fn weighted_pick(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    weights
        .iter()
        .position(|w| {
            cumulative += w;
            cumulative >= target
        })
        .unwrap_or(weights.len().saturating_sub(1))
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}
