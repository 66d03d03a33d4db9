use std::collections::HashMap;

/// Request headers with case-insensitive key lookup.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Inserts a header. An existing entry with the same name (ignoring case)
    /// is replaced and its value returned; the original spelling of the name
    /// is kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        match self.find_key(&key) {
            Some(existing) => self.inner.insert(existing, value.into()),
            None => self.inner.insert(key, value.into()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = self.find_key(key)?;
        self.inner.get(&key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find_key(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.inner.iter()
    }

    fn find_key(&self, key: &str) -> Option<String> {
        self.inner
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(key))
            .cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HeaderMap::new();
        for (key, value) in iter {
            headers.insert(key, value);
        }
        headers
    }
}
