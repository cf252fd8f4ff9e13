//! Execution results: aggregated counts and per-shot records.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Histogram of measured bitstrings.
///
/// Keys cover every classical bit of the circuit; clbit 0 is the left-most
/// character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(bitstring, count)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, u64)>) -> Self {
        let mut counts = Self::new();
        for (bits, n) in pairs {
            counts.insert(bits, n);
        }
        counts
    }

    /// Add `count` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Observations of `bitstring`; zero when never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots recorded.
    pub fn total_shots(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outcomes by descending count; ties ordered by bitstring.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Relative frequency of each outcome, ordered by bitstring.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return BTreeMap::new();
        }
        self.0
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect()
    }

    /// Iterate over `(bitstring, count)` in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }
}

/// Per-shot bits of every named register.
///
/// `records[key][shot][bit]`; bit `i` is the outcome of the `i`-th qubit
/// measured into the register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    records: BTreeMap<String, Vec<Vec<u8>>>,
}

impl Measurements {
    /// Create an empty record set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one shot for `key`.
    pub fn push_shot(&mut self, key: impl Into<String>, bits: Vec<u8>) {
        self.records.entry(key.into()).or_default().push(bits);
    }

    /// Measurement keys present.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Whether `key` was recorded.
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// All shots for `key`, as a `shots x bits` matrix.
    pub fn bits(&self, key: &str) -> HalResult<&[Vec<u8>]> {
        self.records
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| HalError::UnknownKey(key.to_string()))
    }

    /// Bit `bit` of `key` across every shot.
    pub fn column(&self, key: &str, bit: usize) -> HalResult<Vec<u8>> {
        let shots = self.bits(key)?;
        shots
            .iter()
            .map(|shot| {
                shot.get(bit).copied().ok_or_else(|| {
                    HalError::UnknownKey(format!("{key}[{bit}]"))
                })
            })
            .collect()
    }

    /// Fraction of shots in which bit `bit` of `key` was 1.
    pub fn mean(&self, key: &str, bit: usize) -> HalResult<f64> {
        let column = self.column(key, bit)?;
        if column.is_empty() {
            return Ok(0.0);
        }
        let ones: u64 = column.iter().map(|&b| u64::from(b)).sum();
        Ok(ones as f64 / column.len() as f64)
    }

    /// Number of shots recorded for `key`.
    pub fn shots(&self, key: &str) -> usize {
        self.records.get(key).map_or(0, Vec::len)
    }
}

/// Result of executing a circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Aggregated histogram over all classical bits.
    pub counts: Counts,
    /// Per-shot records by measurement key.
    #[serde(default)]
    pub measurements: Measurements,
    /// Number of shots executed.
    pub shots: u32,
    /// Wall-clock execution time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result with counts only.
    pub fn new(counts: Counts, shots: u32) -> Self {
        Self {
            counts,
            measurements: Measurements::new(),
            shots,
            execution_time_ms: None,
        }
    }

    /// Attach per-shot records.
    #[must_use]
    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = measurements;
        self
    }

    /// Attach the execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut counts = Counts::new();
        counts.insert("01", 3);
        counts.insert("01", 2);
        counts.insert("10", 1);
        assert_eq!(counts.get("01"), 5);
        assert_eq!(counts.get("11"), 0);
        assert_eq!(counts.total_shots(), 6);
    }

    #[test]
    fn test_counts_sorted_and_most_frequent() {
        let counts = Counts::from_pairs([("00", 10), ("11", 30), ("01", 10)]);
        let sorted: Vec<_> = counts.sorted().into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(sorted, ["11", "00", "01"]);
        assert_eq!(counts.most_frequent(), Some((&"11".to_string(), &30)));
        assert!(Counts::new().most_frequent().is_none());
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let counts = Counts::from_pairs([("0", 250), ("1", 750)]);
        let probs = counts.probabilities();
        assert!((probs["1"] - 0.75).abs() < 1e-12);
        assert!((probs.values().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(Counts::new().probabilities().is_empty());
    }

    #[test]
    fn test_measurements_columns() {
        let mut m = Measurements::new();
        m.push_shot("m", vec![1, 0]);
        m.push_shot("m", vec![1, 1]);
        m.push_shot("m", vec![0, 1]);
        m.push_shot("m", vec![1, 1]);

        assert_eq!(m.shots("m"), 4);
        assert_eq!(m.column("m", 0).unwrap(), vec![1, 1, 0, 1]);
        assert!((m.mean("m", 1).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_key() {
        let m = Measurements::new();
        assert!(matches!(m.bits("m"), Err(HalError::UnknownKey(k)) if k == "m"));
    }

    #[test]
    fn test_bit_out_of_range() {
        let mut m = Measurements::new();
        m.push_shot("k", vec![1]);
        assert!(m.column("k", 3).is_err());
    }

    #[test]
    fn test_result_serializes() {
        let result = ExecutionResult::new(Counts::from_pairs([("1", 4)]), 4)
            .with_execution_time(2);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["shots"], 4);
        assert_eq!(json["execution_time_ms"], 2);
    }
}
