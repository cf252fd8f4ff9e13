//! Quantum and classical wire identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Position of this qubit in a statevector basis index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Index of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// Position of this bit in a result bitstring.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A qubit, optionally belonging to a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// Circuit-wide identifier.
    pub id: QubitId,
    /// Register name and offset inside it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register: Option<(String, u32)>,
}

impl Qubit {
    /// A qubit outside any register.
    pub fn new(id: QubitId) -> Self {
        Self { id, register: None }
    }

    /// A qubit at `index` inside `register`.
    pub fn with_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some((register.into(), index)),
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some((reg, idx)) => write!(f, "{reg}[{idx}]"),
            None => write!(f, "{}", self.id),
        }
    }
}

/// A classical bit, optionally belonging to a named register.
///
/// Registers double as measurement keys: pipelines read results back by
/// register name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// Circuit-wide identifier.
    pub id: ClbitId,
    /// Register name and offset inside it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register: Option<(String, u32)>,
}

impl Clbit {
    /// A classical bit outside any register.
    pub fn new(id: ClbitId) -> Self {
        Self { id, register: None }
    }

    /// A classical bit at `index` inside `register`.
    pub fn with_register(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some((register.into(), index)),
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some((reg, idx)) => write!(f, "{reg}[{idx}]"),
            None => write!(f, "{}", self.id),
        }
    }
}
