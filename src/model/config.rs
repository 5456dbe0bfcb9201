//! Model configuration.

/// Configuration for a [`Model`](super::Model).
///
/// Auxiliary variables (the ones allocated when a composite expression has
/// to be materialized) are created with these default domains.
///
/// # Examples
///
/// ```
/// use u_cpexpr::model::ModelConfig;
///
/// let config = ModelConfig::default()
///     .with_name("queens")
///     .with_aux_int_domain(-100, 100)
///     .with_aux_set_bound(0, 15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model name, used in log output.
    pub name: String,

    /// Lower bound of auxiliary integer variables.
    pub aux_int_min: i64,

    /// Upper bound of auxiliary integer variables.
    pub aux_int_max: i64,

    /// Smallest element an auxiliary set variable may contain.
    pub aux_set_lub_min: i64,

    /// Largest element an auxiliary set variable may contain.
    pub aux_set_lub_max: i64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "model".into(),
            aux_int_min: -1_000_000,
            aux_int_max: 1_000_000,
            aux_set_lub_min: 0,
            aux_set_lub_max: 31,
        }
    }
}

impl ModelConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_aux_int_domain(mut self, min: i64, max: i64) -> Self {
        self.aux_int_min = min;
        self.aux_int_max = max;
        self
    }

    pub fn with_aux_set_bound(mut self, min: i64, max: i64) -> Self {
        self.aux_set_lub_min = min;
        self.aux_set_lub_max = max;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.aux_int_min > self.aux_int_max {
            return Err(format!(
                "aux_int_min ({}) must not exceed aux_int_max ({})",
                self.aux_int_min, self.aux_int_max
            ));
        }
        if self.aux_set_lub_min > self.aux_set_lub_max {
            return Err(format!(
                "aux_set_lub_min ({}) must not exceed aux_set_lub_max ({})",
                self.aux_set_lub_min, self.aux_set_lub_max
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.aux_int_min, -1_000_000);
        assert_eq!(config.aux_int_max, 1_000_000);
        assert_eq!(config.aux_set_lub_max, 31);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_int_domain() {
        let config = ModelConfig::default().with_aux_int_domain(5, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_set_bound() {
        let config = ModelConfig::default().with_aux_set_bound(10, 0);
        assert!(config.validate().is_err());
    }
}
