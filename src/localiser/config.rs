use crate::error::{CrError, CrResult};

/// Configuration for a single [`super::Localiser::run`] call, following the builder shape of
/// `imlet`'s `SparseSamplerBuilder` (`Option<T>` fields, `.with_x()` chain, fallible `.build()`).
#[derive(Debug, Clone)]
pub struct LocaliserConfig {
    pub bounds: (f64, f64, f64, f64),
    pub cell_density: usize,
    pub depth: usize,
    pub topsort_enabled: bool,
    /// Samples drawn per leaf while building the symbolic image (the reference implementation
    /// hard-codes this to 100; kept configurable here).
    pub samples_per_cell: usize,
    /// Initial subdivision of the root (the reference implementation hard-codes this to
    /// `(40, 40)`; kept configurable here).
    pub initial_fragmentation: (u32, u32),
    /// Seed for the per-run RNG: a per-run instance with an explicit seed, not a global one.
    pub seed: u64,
}

impl Default for LocaliserConfig {
    fn default() -> Self {
        Self {
            bounds: (0.0, 0.0, 1.0, 1.0),
            cell_density: 100,
            depth: 5,
            topsort_enabled: false,
            samples_per_cell: 100,
            initial_fragmentation: (40, 40),
            seed: 0,
        }
    }
}

pub struct LocaliserConfigBuilder {
    bounds: Option<(f64, f64, f64, f64)>,
    cell_density: Option<usize>,
    depth: Option<usize>,
    topsort_enabled: bool,
    samples_per_cell: usize,
    initial_fragmentation: (u32, u32),
    seed: u64,
}

impl Default for LocaliserConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaliserConfigBuilder {
    pub fn new() -> Self {
        let defaults = LocaliserConfig::default();
        Self {
            bounds: None,
            cell_density: None,
            depth: None,
            topsort_enabled: defaults.topsort_enabled,
            samples_per_cell: defaults.samples_per_cell,
            initial_fragmentation: defaults.initial_fragmentation,
            seed: defaults.seed,
        }
    }

    pub fn with_bounds(mut self, bounds: (f64, f64, f64, f64)) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_cell_density(mut self, cell_density: usize) -> Self {
        self.cell_density = Some(cell_density);
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_topsort_enabled(mut self, enabled: bool) -> Self {
        self.topsort_enabled = enabled;
        self
    }

    pub fn with_samples_per_cell(mut self, samples_per_cell: usize) -> Self {
        self.samples_per_cell = samples_per_cell;
        self
    }

    pub fn with_initial_fragmentation(mut self, nx: u32, ny: u32) -> Self {
        self.initial_fragmentation = (nx, ny);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> CrResult<LocaliserConfig> {
        let defaults = LocaliserConfig::default();
        let bounds = self.bounds.unwrap_or(defaults.bounds);
        let cell_density = self.cell_density.unwrap_or(defaults.cell_density);
        let depth = self.depth.unwrap_or(defaults.depth);

        if cell_density < 1 {
            return Err(CrError::InvalidConfig(
                "cell_density must be >= 1".to_string(),
            ));
        }
        if depth < 1 {
            return Err(CrError::InvalidConfig("depth must be >= 1".to_string()));
        }
        if self.samples_per_cell < 1 {
            return Err(CrError::InvalidConfig(
                "samples_per_cell must be >= 1".to_string(),
            ));
        }

        Ok(LocaliserConfig {
            bounds,
            cell_density,
            depth,
            topsort_enabled: self.topsort_enabled,
            samples_per_cell: self.samples_per_cell,
            initial_fragmentation: self.initial_fragmentation,
            seed: self.seed,
        })
    }
}

impl LocaliserConfig {
    pub fn builder() -> LocaliserConfigBuilder {
        LocaliserConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_invalid_counts() {
        assert!(LocaliserConfig::builder().with_cell_density(0).build().is_err());
        assert!(LocaliserConfig::builder().with_depth(0).build().is_err());
        assert!(LocaliserConfig::builder()
            .with_samples_per_cell(0)
            .build()
            .is_err());
    }

    #[test]
    fn builder_applies_defaults() {
        let config = LocaliserConfig::builder().build().unwrap();
        assert_eq!(config.initial_fragmentation, (40, 40));
        assert_eq!(config.samples_per_cell, 100);
        assert_eq!(config.depth, 5);
    }
}
