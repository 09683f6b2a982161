//! Simulation descriptor evaluation
//!
//! Validates `Sim` descriptors and samples values from them: either a
//! bounded numeric sweep or a weighted discrete option set. Sampling an
//! invalid descriptor fails with a configuration error; values are never
//! silently clamped into range.

use crate::types::{ModelError, Result, Sim};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::fmt;

/// A single rule violation found by [`validate`]
#[derive(Debug, Clone, PartialEq)]
pub enum SimViolation {
    /// Sweep mode without a required bound
    MissingBound(&'static str),
    /// `min` above `max`
    InvertedRange { min: f64, max: f64 },
    /// `inc_min` above `inc_max`
    InvertedIncrement { inc_min: f64, inc_max: f64 },
    /// A negative per-step increment bound
    NegativeIncrement(f64),
    /// Enumerated mode with no options at all
    EmptyOptions,
    /// An option with a negative weight
    NegativeWeight { index: usize, weight: f64 },
    /// All option weights are zero
    ZeroTotalWeight,
}

impl fmt::Display for SimViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimViolation::MissingBound(name) => write!(f, "sweep mode requires '{}'", name),
            SimViolation::InvertedRange { min, max } => {
                write!(f, "min {} exceeds max {}", min, max)
            }
            SimViolation::InvertedIncrement { inc_min, inc_max } => {
                write!(f, "inc_min {} exceeds inc_max {}", inc_min, inc_max)
            }
            SimViolation::NegativeIncrement(inc) => {
                write!(f, "negative increment {}", inc)
            }
            SimViolation::EmptyOptions => write!(f, "options list is empty"),
            SimViolation::NegativeWeight { index, weight } => {
                write!(f, "option {} has negative weight {}", index, weight)
            }
            SimViolation::ZeroTotalWeight => write!(f, "option weights sum to zero"),
        }
    }
}

/// Check a descriptor against the rules of its active mode
///
/// Returns every violation found, empty for a valid descriptor.
pub fn validate(sim: &Sim) -> Vec<SimViolation> {
    let mut violations = Vec::new();

    if let Some(options) = &sim.options {
        // Enumerated mode: sweep bounds are ignored entirely
        if options.is_empty() {
            violations.push(SimViolation::EmptyOptions);
            return violations;
        }
        let mut total = 0.0;
        for (index, (_, weight)) in options.iter().enumerate() {
            if *weight < 0.0 {
                violations.push(SimViolation::NegativeWeight {
                    index,
                    weight: *weight,
                });
            } else {
                total += *weight;
            }
        }
        if violations.is_empty() && total == 0.0 {
            violations.push(SimViolation::ZeroTotalWeight);
        }
        return violations;
    }

    // Sweep mode
    match (sim.min, sim.max) {
        (Some(min), Some(max)) => {
            if min > max {
                violations.push(SimViolation::InvertedRange { min, max });
            }
        }
        (None, _) => violations.push(SimViolation::MissingBound("min")),
        (_, None) => violations.push(SimViolation::MissingBound("max")),
    }

    let inc_min = sim.inc_min.unwrap_or(0.0);
    let inc_max = sim.inc_max.unwrap_or(inc_min);
    if inc_min > inc_max {
        violations.push(SimViolation::InvertedIncrement { inc_min, inc_max });
    }
    for inc in [inc_min, inc_max] {
        if inc < 0.0 {
            violations.push(SimViolation::NegativeIncrement(inc));
        }
    }

    violations
}

/// Draw a single stateless sample from a descriptor
///
/// Sweep mode draws uniformly from `[min, max]` (rounded to the nearest
/// integer step when `round` is set); enumerated mode draws one option
/// value with probability proportional to its weight.
///
/// # Errors
/// `Config` if the descriptor fails [`validate`].
pub fn sample<R: Rng + ?Sized>(sim: &Sim, rng: &mut R) -> Result<f64> {
    check_valid(sim)?;

    if let Some(options) = &sim.options {
        let dist = WeightedIndex::new(options.iter().map(|(_, weight)| *weight))
            .map_err(|e| ModelError::Config(format!("unsampleable option weights: {}", e)))?;
        return Ok(options[dist.sample(rng)].0);
    }

    // Bounds are present after validation
    let min = sim.min.unwrap_or_default();
    let max = sim.max.unwrap_or_default();
    let value = if min == max {
        min
    } else {
        rng.gen_range(min..=max)
    };
    Ok(apply_round(sim, value))
}

/// Stateful sweep sampler - advances from the previous value by a step
/// drawn from `[inc_min, inc_max]`, wrapping to `min` past `max`.
#[derive(Debug, Clone)]
pub struct Sweeper {
    sim: Sim,
    current: f64,
}

impl Sweeper {
    /// Build a sweeper for a sweep-mode descriptor, starting from
    /// `start` when given (e.g. the point's default value), else `min`.
    ///
    /// # Errors
    /// `Config` if the descriptor is invalid or in enumerated mode.
    pub fn new(sim: &Sim, start: Option<f64>) -> Result<Self> {
        check_valid(sim)?;
        if sim.is_enumerated() {
            return Err(ModelError::Config(
                "sweeper requires a sweep-mode sim descriptor".to_string(),
            ));
        }
        let min = sim.min.unwrap_or_default();
        let max = sim.max.unwrap_or_default();
        let current = match start {
            Some(s) if s >= min && s <= max => s,
            _ => min,
        };
        Ok(Self {
            sim: sim.clone(),
            current,
        })
    }

    /// Advance one step and return the new value
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let inc_min = self.sim.inc_min.unwrap_or(0.0);
        let inc_max = self.sim.inc_max.unwrap_or(inc_min);
        let step = if inc_min == inc_max {
            inc_min
        } else {
            rng.gen_range(inc_min..=inc_max)
        };

        let max = self.sim.max.unwrap_or_default();
        self.current += step;
        if self.current > max {
            self.current = self.sim.min.unwrap_or_default();
        }
        apply_round(&self.sim, self.current)
    }

    /// Value the next step advances from
    pub fn current(&self) -> f64 {
        self.current
    }
}

fn check_valid(sim: &Sim) -> Result<()> {
    let violations = validate(sim);
    if violations.is_empty() {
        return Ok(());
    }
    let reasons: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    Err(ModelError::Config(format!(
        "invalid sim descriptor: {}",
        reasons.join("; ")
    )))
}

fn apply_round(sim: &Sim, value: f64) -> f64 {
    if sim.round == Some(true) {
        value.round()
    } else {
        value
    }
}
