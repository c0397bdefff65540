//! Semantic unit types for optical lengths
//!
//! Aperture sizes, wavelengths and propagation distances are all lengths, but
//! they live on very different scales (centimeters versus hundreds of
//! nanometers). Wrapping them keeps a wavelength in nanometers from being fed
//! where meters are expected.
//!
//! # Design Philosophy
//! - All lengths use f64: the Fresnel parameter D²/(λN) squares small numbers
//! - Total ordering via `Ord` (NaN handled as greater than all values)
//! - Constructors do not validate; range checks belong to
//!   [`PhysicalParameters`](crate::core_types::PhysicalParameters) so that
//!   they surface as domain errors instead of panics
//!
//! # Usage
//! ```
//! use fresnel_core::core_types::units::{Meters, Nanometers};
//!
//! let green = Nanometers::new(530.0);
//! let meters: Meters = green.into();
//! assert!((*meters - 530e-9).abs() < 1e-18);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Meters(f64);

impl Eq for Meters {}

impl PartialOrd for Meters {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Meters {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Meters {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Meters {
    /// Create a new length in meters
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }

    /// Get the raw f64 value
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert from nanometers
    #[inline]
    #[must_use]
    pub fn from_nanometers(nm: f64) -> Self {
        Meters(nm * 1e-9)
    }

    /// Convert to nanometers
    #[inline]
    #[must_use]
    pub fn to_nanometers(self) -> Nanometers {
        Nanometers(self.0 * 1e9)
    }
}

impl From<f64> for Meters {
    fn from(v: f64) -> Self {
        Meters(v)
    }
}

impl From<Meters> for f64 {
    fn from(m: Meters) -> f64 {
        m.0
    }
}

impl fmt::Display for Meters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} m", self.0)
    }
}

/// Length in nanometers, used for wavelengths
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Nanometers(f64);

impl Deref for Nanometers {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Nanometers {
    /// Create a new length in nanometers
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Nanometers(value)
    }

    /// Convert to meters
    #[inline]
    #[must_use]
    pub fn to_meters(self) -> Meters {
        Meters::from_nanometers(self.0)
    }
}

impl From<Nanometers> for Meters {
    fn from(nm: Nanometers) -> Meters {
        nm.to_meters()
    }
}

impl fmt::Display for Nanometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} nm", self.0)
    }
}
