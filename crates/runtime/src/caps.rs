//! Capability bag handed to the session factory.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability key carrying a physical device identity.
pub const UDID: &str = "appium:udid";

/// JSON capability map with last-write-wins merge semantics.
///
/// The pool never interprets capability values beyond [`UDID`]; everything
/// else passes through to the session factory untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities(Map<String, Value>);

impl Capabilities {
    /// Creates an empty capability map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Sets a capability, replacing any previous value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks a capability up by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns true when the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns a copy with `other`'s entries layered over this map.
    pub fn merge(mut self, other: &Capabilities) -> Self {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    /// Number of capabilities set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no capability is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Capabilities {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_existing_keys() {
        let mut base = Capabilities::new();
        base.insert("browserName", "chrome");
        base.insert("headless", true);

        let mut layered = Capabilities::new();
        layered.insert("headless", false);
        layered.insert(UDID, "emulator-5554");

        let merged = base.merge(&layered);
        assert_eq!(merged.get("browserName").unwrap(), "chrome");
        assert_eq!(merged.get("headless").unwrap(), false);
        assert_eq!(merged.get(UDID).unwrap(), "emulator-5554");
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut base = Capabilities::new();
        base.insert("browserName", "firefox");

        let merged = base.clone().merge(&Capabilities::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn serializes_as_a_plain_json_object() {
        let mut caps = Capabilities::new();
        caps.insert("browserName", "chrome");

        let json = serde_json::to_string(&caps).unwrap();
        assert_eq!(json, r#"{"browserName":"chrome"}"#);

        let back: Capabilities = serde_json::from_str(&json).unwrap();
        assert_eq!(back, caps);
    }
}
