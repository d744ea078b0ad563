use std::collections::HashSet;

/// Title ids already handed to the outputs during one crawl.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Returns `false` if the id was already marked.
    pub fn mark_seen(&mut self, id: impl Into<String>) -> bool {
        self.seen.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_mark_reports_duplicate() {
        let mut seen = Deduplicator::new();
        assert!(!seen.is_seen("SLUS_00594"));
        assert!(seen.mark_seen("SLUS_00594"));
        assert!(seen.is_seen("SLUS_00594"));
        assert!(!seen.mark_seen("SLUS_00594".to_string()));
        assert_eq!(seen.len(), 1);
    }
}
