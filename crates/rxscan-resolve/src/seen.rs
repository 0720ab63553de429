use std::collections::HashSet;

/// Normalized keys already decided during one scan.
///
/// A key enters the registry whenever its candidate is decided, matched or
/// not, so nothing is considered twice. Owned by exactly one scan.
#[derive(Debug, Default, Clone)]
pub struct SeenRegistry {
    keys: HashSet<String>,
}

impl SeenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects an already-normalized key.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Returns `false` when the key was already present.
    pub fn mark(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_reports_first_insertion() {
        let mut seen = SeenRegistry::new();
        assert!(seen.mark("IBUPROFEN"));
        assert!(!seen.mark("IBUPROFEN"));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn contains_expects_normalized_keys() {
        let mut seen = SeenRegistry::new();
        seen.mark(rxscan_model::normalize_key(" Lipitor "));
        assert!(seen.contains("LIPITOR"));
        assert!(!seen.contains("lipitor"));
    }
}
