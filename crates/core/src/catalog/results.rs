//! Best-effort collection of per-item outcomes.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::query::Outcome;

/// Insertion-ordered mapping from part number to weight in kilograms.
///
/// Keys are present only for items that resolved to a weight; omission is
/// the only signal of failure at this boundary (reasons are logged by the
/// query loop, never returned). Order follows the input list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(String, f64)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one per-item outcome into the set.
    ///
    /// `Found` inserts; `NotFound` and `Failed` insert nothing. A part
    /// number already present is left untouched, so the set never grows a
    /// duplicate key.
    pub fn record(&mut self, part_number: &str, outcome: &Outcome) {
        if let Outcome::Found(weight_kg) = outcome {
            if !self.contains(part_number) {
                self.entries.push((part_number.to_string(), *weight_kg));
            }
        }
    }

    pub fn get(&self, part_number: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == part_number)
            .map(|(_, weight_kg)| *weight_kg)
    }

    pub fn contains(&self, part_number: &str) -> bool {
        self.get(part_number).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(key, weight_kg)| (key.as_str(), *weight_kg))
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, weight_kg) in &self.entries {
            map.serialize_entry(key, weight_kg)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::super::query::QueryFault;
    use super::*;

    #[test]
    fn found_inserts_and_preserves_order() {
        let mut results = ResultSet::new();
        results.record("77994840", &Outcome::Found(3.4));
        results.record("11111111", &Outcome::Found(0.25));

        let keys: Vec<&str> = results.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["77994840", "11111111"]);
        assert_eq!(results.get("77994840"), Some(3.4));
    }

    #[test]
    fn not_found_and_failed_insert_nothing() {
        let mut results = ResultSet::new();
        results.record("34343424", &Outcome::NotFound);
        results.record("55555555", &Outcome::Failed(QueryFault::Timeout { ms: 50_000 }));
        assert!(results.is_empty());
    }

    #[test]
    fn duplicate_keys_keep_first_resolution() {
        let mut results = ResultSet::new();
        results.record("77994840", &Outcome::Found(3.4));
        results.record("77994840", &Outcome::Found(9.9));
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("77994840"), Some(3.4));
    }

    #[test]
    fn serializes_to_ordered_json_object() {
        let mut results = ResultSet::new();
        results.record("b", &Outcome::Found(2.0));
        results.record("a", &Outcome::Found(1.0));
        let json = serde_json::to_string(&results).unwrap();
        assert_eq!(json, r#"{"b":2.0,"a":1.0}"#);
    }
}
