use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Extra environment variables exported to the external runtime.
///
/// Serialized as a plain JSON object. Keys are unique: inserting an existing
/// key replaces its value. An empty `Env` means the child inherits the parent
/// environment unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(BTreeMap<String, String>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set `key` to `value`, returning the previous value if any.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Env
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Env(iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::Env;

    #[test]
    fn new_is_empty() {
        let env = Env::new();
        assert!(env.is_empty());
        assert_eq!(env.len(), 0);
        assert!(env.get("JAVA_OPTS").is_none());
    }

    #[test]
    fn insert_replaces_existing_key() {
        let mut env = Env::new();
        assert_eq!(env.insert("JAVA_OPTS", "-Xmx1g"), None);
        assert_eq!(
            env.insert("JAVA_OPTS", "-Xmx2g"),
            Some("-Xmx1g".to_string())
        );
        assert_eq!(env.get("JAVA_OPTS"), Some("-Xmx2g"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn iter_is_key_ordered() {
        let env: Env = [("B", "2"), ("A", "1"), ("C", "3")].into_iter().collect();
        let keys: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }

    #[test]
    fn serializes_as_json_object() {
        let env: Env = [("FOO", "bar")].into_iter().collect();
        let json = serde_json::to_string(&env).unwrap();
        assert_eq!(json, r#"{"FOO":"bar"}"#);

        let back: Env = serde_json::from_str(r#"{"A":"1","B":"2"}"#).unwrap();
        assert_eq!(back.get("B"), Some("2"));
    }
}
