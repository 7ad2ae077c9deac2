use std::fmt::Write;

use rustc_hash::FxHashMap;

/// Attributes of a node, in insertion order.
///
/// Names are unique. Re-inserting an existing name replaces its value but keeps its position.
/// Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
    index: FxHashMap<String, usize>,
}

impl AttributeMap {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, returning the previous value if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some(&idx) = self.index.get(&name) {
            return Some(std::mem::replace(&mut self.entries[idx].1, value));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let &idx = self.index.get(name)?;
        self.entries.get(idx).map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Append ` name="value"` for every attribute. Values are not escaped.
    pub(crate) fn write_markup(&self, s: &mut String) -> std::fmt::Result {
        for (name, value) in self.iter() {
            write!(s, " {name}=\"{value}\"")?;
        }
        Ok(())
    }
}

impl PartialEq for AttributeMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for AttributeMap {}

impl IntoIterator for AttributeMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for AttributeMap {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = AttributeMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for AttributeMap {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
