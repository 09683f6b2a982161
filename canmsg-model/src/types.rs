//! Core types for the CAN message definition model
//!
//! This module defines the error type and the data model for message
//! definition files: messages made of bit-level points (raw wire fields)
//! and net fields (named signals derived from one or more points).
//! The model is immutable once loaded; edits replace whole records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur in the model and codec layers
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Structurally malformed input (missing attribute, wrong shape,
    /// duplicate message ID). Carries the path of the offending element.
    #[error("validation failed at {path}: {reason}")]
    Validation { path: String, reason: String },

    /// Well-formed but semantically inconsistent configuration
    /// (missing endianness on a multi-byte point, invalid sim descriptor)
    #[error("inconsistent configuration: {0}")]
    Config(String),

    /// A value outside the bit-width or declared-range contract
    #[error("value out of range: {0}")]
    Range(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Byte order of a multi-byte point on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// Most-significant byte first (Motorola)
    Big,
    /// Least-significant byte first (Intel)
    Little,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Big => write!(f, "big"),
            Endianness::Little => write!(f, "little"),
        }
    }
}

/// Simulation descriptor for a point - how to synthesize a value
/// when no live transmission is available.
///
/// Two modes share one record: presence of `options` selects the
/// enumerated mode (weighted discrete values) and the sweep bounds are
/// ignored; otherwise the sweep mode applies over `[min, max]` with a
/// per-step increment drawn from `[inc_min, inc_max]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sim {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inc_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inc_max: Option<f64>,
    /// Round sampled values to the nearest integer step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<bool>,
    /// Weighted (value, weight) pairs; weights are relative, not normalized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<(f64, f64)>>,
}

impl Sim {
    /// True if this descriptor is in enumerated mode
    pub fn is_enumerated(&self) -> bool {
        self.options.is_some()
    }
}

/// A raw bit-level field within a message's payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanPoint {
    /// Width in bits
    pub size: u32,
    /// Two's-complement interpretation when `Some(true)`; absent means
    /// "not declared" and decodes as unsigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed: Option<bool>,
    /// Byte order on the wire; required by the codec once the point
    /// spans more than one byte
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endianness: Option<Endianness>,
    /// Scaling transform name, e.g. "divide100" (raw integer / 100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Value used when neither simulation nor transmission supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
    /// Interpret the 32-bit pattern as IEEE-754 single precision;
    /// `signed` and `format` do not apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ieee754_f32: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim: Option<Sim>,
}

impl CanPoint {
    /// Minimal point of a given bit width, everything else undeclared
    pub fn new(size: u32) -> Self {
        Self {
            size,
            signed: None,
            endianness: None,
            format: None,
            default: None,
            ieee754_f32: None,
            sim: None,
        }
    }

    /// True only for an explicit `signed: true` declaration
    pub fn is_signed(&self) -> bool {
        self.signed == Some(true)
    }

    /// True when the raw bits carry an IEEE-754 single-precision float
    pub fn is_float(&self) -> bool {
        self.ieee754_f32 == Some(true)
    }
}

/// A named, unit-carrying logical signal exposed to consumers.
///
/// The name may embed ordinal placeholder tokens of the form `{k}`
/// (single decimal digit) naming the 1-based point indices the field
/// draws its value from; `values` declares point indices independently
/// of the name. Both sources feed the cross-reference index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetField {
    pub name: String,
    /// Display unit, may be empty
    pub unit: String,
    /// Declared 1-based point indices
    pub values: Vec<usize>,
}

/// One CAN identifier's full definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanMessage {
    /// Textual CAN ID, hex ("0x100") or decimal; unique within a file
    pub id: String,
    /// Human-readable description
    pub desc: String,
    /// Raw wire fields; order defines the 1-based index space that
    /// net field placeholders and `values` reference
    pub points: Vec<CanPoint>,
    pub fields: Vec<NetField>,
    /// Grouping/category string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Extended (29-bit) CAN ID flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ext: Option<bool>,
    /// Simulated transmission frequency in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_freq: Option<f64>,
}

impl CanMessage {
    /// True if this message uses the extended 29-bit identifier space
    pub fn is_extended(&self) -> bool {
        self.is_ext == Some(true)
    }
}

/// A named container of messages plus the edit-dirty flag maintained
/// by the application layer (the model itself never mutates it)
#[derive(Debug, Clone, PartialEq)]
pub struct CanFile {
    pub filename: String,
    pub content: Vec<CanMessage>,
    pub is_dirty: bool,
}
