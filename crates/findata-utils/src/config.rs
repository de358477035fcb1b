//! Environment secret helpers

/// Read a secret from the environment.
///
/// Unset, non-unicode and whitespace-only values all come back as `None`.
pub fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET: &str = "FINDATA_UTILS_TEST_DEFINITELY_UNSET";

    #[test]
    fn test_unset_secret_is_none() {
        assert_eq!(env_secret(UNSET), None);
    }

    #[test]
    fn test_present_secret_is_read() {
        // PATH is set in every test environment we run in
        let path = env_secret("PATH");
        assert!(path.is_some_and(|p| !p.is_empty()));
    }
}
