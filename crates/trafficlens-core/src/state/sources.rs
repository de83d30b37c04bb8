use indexmap::IndexSet;

/// Distinct flagged source addresses in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SourcesList {
    addrs: IndexSet<String>,
}

impl SourcesList {
    /// Returns `true` if the address was not already flagged.
    pub fn insert(&mut self, addr: &str) -> bool {
        if self.addrs.contains(addr) {
            return false;
        }
        self.addrs.insert(addr.to_owned())
    }

    /// Empty the list, returning how many addresses it held.
    pub fn clear(&mut self) -> usize {
        let count = self.addrs.len();
        self.addrs.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addrs.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        let mut sources = SourcesList::default();
        assert!(sources.insert("10.0.0.5"));
        assert!(sources.insert("10.0.0.9"));
        assert!(!sources.insert("10.0.0.5"));

        assert_eq!(sources.iter().collect::<Vec<_>>(), ["10.0.0.5", "10.0.0.9"]);
        assert_eq!(sources.clear(), 2);
        assert!(sources.is_empty());
    }
}
