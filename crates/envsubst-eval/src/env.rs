//! Naming store for variable values.

use std::collections::BTreeMap;

/// Name → value store consulted during rendering.
///
/// Each name has exactly one current value. Bulk construction keeps the
/// first declaration of a name; [`Env::set`] overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    vars: BTreeMap<String, String>,
}

impl Env {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `NAME=VALUE` entries.
    ///
    /// The entry is split at its first `=`. Entries without `=` are
    /// skipped, and later duplicates of a name are ignored.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries
            .into_iter()
            .filter_map(|entry| {
                entry
                    .as_ref()
                    .split_once('=')
                    .map(|(name, value)| (name.to_string(), value.to_string()))
            })
            .collect()
    }

    /// Value of `name`, or the empty string when it is not set.
    pub fn get(&self, name: &str) -> &str {
        self.lookup(name).unwrap_or("")
    }

    /// Value of `name`, distinguishing unset from empty.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is set, even to the empty string.
    pub fn has(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Set `name`, replacing any current value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Env {
    /// First declaration of a name wins.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = BTreeMap::new();
        for (name, value) in iter {
            vars.entry(name.into()).or_insert_with(|| value.into());
        }
        Self { vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_has() {
        let env = Env::from_entries(["HOME=/home/user", "EMPTY="]);
        assert_eq!(env.get("HOME"), "/home/user");
        assert!(env.has("EMPTY"));
        assert_eq!(env.get("EMPTY"), "");
        assert!(!env.has("MISSING"));
        assert_eq!(env.get("MISSING"), "");
        assert_eq!(env.lookup("MISSING"), None);
        assert_eq!(env.lookup("EMPTY"), Some(""));
    }

    #[test]
    fn test_first_declaration_wins() {
        let env = Env::from_entries(["HOME=/home/user", "PATH=/usr/bin", "HOME=/duplicate"]);
        assert_eq!(env.get("HOME"), "/home/user");
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_value_keeps_later_equals_signs() {
        let env = Env::from_entries(["OPTS=a=b=c"]);
        assert_eq!(env.get("OPTS"), "a=b=c");
    }

    #[test]
    fn test_entries_without_equals_are_skipped() {
        let env = Env::from_entries(["GARBAGE", "A=1"]);
        assert_eq!(env.len(), 1);
        assert!(!env.has("GARBAGE"));
    }

    #[test]
    fn test_set_updates_and_appends() {
        let mut env = Env::from_entries(["A=1"]);
        env.set("A", "2");
        env.set("B", "3");
        assert_eq!(env.get("A"), "2");
        assert_eq!(env.get("B"), "3");
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_from_iterator_pairs() {
        let env: Env = [("X", "1"), ("X", "2")].into_iter().collect();
        assert_eq!(env.get("X"), "1");
    }

    #[test]
    fn test_iter_in_name_order() {
        let env = Env::from_entries(["B=2", "A=1"]);
        let names: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
