//! Search configuration.

/// Configuration for a [`Solver`](super::Solver) run.
///
/// # Examples
///
/// ```
/// use u_cpexpr::search::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_max_solutions(0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds.
    pub time_limit_ms: i64,

    /// Stop after this many solutions. `0` enumerates all of them.
    pub max_solutions: usize,

    /// Maximum number of search nodes (variable assignments tried).
    pub node_limit: u64,

    /// Largest number of candidate values a single variable may have.
    pub max_domain_size: usize,

    /// Random seed for value ordering. `None` tries values in ascending order.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            max_solutions: 1,
            node_limit: 10_000_000,
            max_domain_size: 1 << 16,
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: i64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = n;
        self
    }

    pub fn with_node_limit(mut self, n: u64) -> Self {
        self.node_limit = n;
        self
    }

    pub fn with_max_domain_size(mut self, n: usize) -> Self {
        self.max_domain_size = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit_ms <= 0 {
            return Err("time_limit_ms must be positive".into());
        }
        if self.node_limit == 0 {
            return Err("node_limit must be at least 1".into());
        }
        if self.max_domain_size == 0 {
            return Err("max_domain_size must be at least 1".into());
        }
        Ok(())
    }
}
