//! The follow list: account ids, comma separated on disk.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowList {
    ids: Vec<String>,
}

impl FollowList {
    /// Parse `"12,34"`. Blank entries are dropped.
    pub fn parse(raw: &str) -> Self {
        Self {
            ids: raw
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Exact id match.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    /// Returns false if `id` was already present.
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// Returns false if `id` was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|known| known != id);
        self.ids.len() != before
    }
}

impl fmt::Display for FollowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ids.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_blanks() {
        let list = FollowList::parse(",12, 34,,");
        assert_eq!(list.to_string(), "12,34");
        assert!(FollowList::parse("").is_empty());
    }

    #[test]
    fn ids_match_exactly() {
        let list = FollowList::parse("123,456");
        assert!(list.contains("123"));
        assert!(!list.contains("12"));
        assert!(!list.contains("1234"));
    }

    #[test]
    fn add_and_remove() {
        let mut list = FollowList::parse("1");
        assert!(list.add("2"));
        assert!(!list.add("1"));
        assert_eq!(list.to_string(), "1,2");

        assert!(!list.remove("12"));
        assert!(list.remove("1"));
        assert_eq!(list.to_string(), "2");

        let mut empty = FollowList::default();
        assert!(empty.add("7"));
        assert_eq!(empty.to_string(), "7");
    }
}
