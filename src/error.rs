//! Recoverable input faults reported by the gravity tracker and transforms

use thiserror::Error;

/// A rejected or substituted input.
///
/// Nothing in this crate returns these as `Err`: the offending input is
/// replaced (previous state, default gravity, or a zero delta) and the
/// diagnostic is attached to the result and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// A blend or fusion factor outside `[0, 1]`
    #[error("blend factor outside [0, 1]")]
    InvalidRange,
    /// A vector too short to define a direction
    #[error("vector magnitude below epsilon")]
    DegenerateVector,
    /// A NaN or infinite component in the input
    #[error("input contains NaN or infinity")]
    NanInput,
}

/// Running totals of every [`Diagnostic`] observed since the last clear.
///
/// # Example
/// ```
/// use gyro_space::GravityTracker;
///
/// let mut tracker = GravityTracker::new();
/// tracker.set(0.0, 0.0, 0.0); // too short, previous value kept
///
/// let counts = tracker.diagnostics();
/// assert_eq!(counts.degenerate_vector, 1);
/// assert_eq!(counts.total(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiagnosticCounts {
    /// Factors rejected for being outside `[0, 1]`
    pub invalid_range: u32,
    /// Vectors substituted for being near zero
    pub degenerate_vector: u32,
    /// Inputs rejected for containing NaN
    pub nan_input: u32,
}

impl DiagnosticCounts {
    /// Count one occurrence of `diagnostic`
    pub fn record(&mut self, diagnostic: Diagnostic) {
        let counter = match diagnostic {
            Diagnostic::InvalidRange => &mut self.invalid_range,
            Diagnostic::DegenerateVector => &mut self.degenerate_vector,
            Diagnostic::NanInput => &mut self.nan_input,
        };
        *counter = counter.saturating_add(1);
    }

    /// Total number of diagnostics of any kind
    pub fn total(&self) -> u32 {
        self.invalid_range
            .saturating_add(self.degenerate_vector)
            .saturating_add(self.nan_input)
    }
}
