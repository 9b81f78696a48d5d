//! Message bus configuration.

/// Environment variable holding the retry bound.
pub const MAX_RETRIES_PER_ERROR_VAR: &str = "BUS_MAX_RETRIES_PER_ERROR";

/// Bus settings with sensible defaults.
///
/// Reads from environment variables:
/// - `BUS_MAX_RETRIES_PER_ERROR`: how often one error may be remediated and
///   retried within a dispatch (default: `3`; `unbounded` disables the limit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// `None` retries forever, which can loop if a remediation never helps.
    pub max_retries_per_error: Option<u32>,
}

impl BusConfig {
    /// Retry bound used when none is configured.
    pub const DEFAULT_MAX_RETRIES_PER_ERROR: u32 = 3;

    /// Creates a config with the given retry bound.
    pub fn with_max_retries(max_retries_per_error: u32) -> Self {
        Self {
            max_retries_per_error: Some(max_retries_per_error),
        }
    }

    /// Creates a config that never gives up on an error.
    pub fn unbounded() -> Self {
        Self {
            max_retries_per_error: None,
        }
    }

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(MAX_RETRIES_PER_ERROR_VAR) {
            Some(value) if value.trim().eq_ignore_ascii_case("unbounded") => Self::unbounded(),
            Some(value) => value
                .trim()
                .parse()
                .map(Self::with_max_retries)
                .unwrap_or_default(),
            None => Self::default(),
        }
    }

    /// Returns true once an error seen `occurrences` times must not be retried.
    pub fn exhausted(&self, occurrences: u32) -> bool {
        self.max_retries_per_error
            .is_some_and(|max| occurrences > max)
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::with_max_retries(Self::DEFAULT_MAX_RETRIES_PER_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |key| (key == MAX_RETRIES_PER_ERROR_VAR).then(|| value.to_string())
    }

    #[test]
    fn test_default_values() {
        let config = BusConfig::default();
        assert_eq!(config.max_retries_per_error, Some(3));
    }

    #[test]
    fn test_from_lookup_parses_number() {
        let config = BusConfig::from_lookup(lookup("5"));
        assert_eq!(config, BusConfig::with_max_retries(5));
    }

    #[test]
    fn test_from_lookup_accepts_unbounded() {
        let config = BusConfig::from_lookup(lookup("Unbounded"));
        assert_eq!(config, BusConfig::unbounded());
    }

    #[test]
    fn test_from_lookup_falls_back_on_garbage() {
        assert_eq!(BusConfig::from_lookup(lookup("many")), BusConfig::default());
        assert_eq!(BusConfig::from_lookup(|_| None), BusConfig::default());
    }

    #[test]
    fn test_exhausted_after_bound() {
        let config = BusConfig::with_max_retries(2);
        assert!(!config.exhausted(1));
        assert!(!config.exhausted(2));
        assert!(config.exhausted(3));

        assert!(BusConfig::with_max_retries(0).exhausted(1));
        assert!(!BusConfig::unbounded().exhausted(u32::MAX));
    }
}
