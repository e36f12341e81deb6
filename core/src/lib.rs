//! Measurement parsing and pattern-reconstruction core for the MSI-to-STL
//! converter.
//!
//! The modules mirror the legacy msiread/patternFromSlices flow while
//! passing explicit stage results instead of figure-global rendering state.

pub mod measurement;
pub mod mesh;
pub mod msi;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{PatternError, PatternResult, RenderOptions};
