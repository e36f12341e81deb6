pub mod metadata;
pub mod slice;

pub use metadata::{Gain, PatternMetadata};
pub use slice::AngularSlice;
