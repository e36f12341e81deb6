pub mod normalize;
pub mod reconstruct;
pub mod render;

pub use normalize::normalize_azimuth;
pub use reconstruct::{
    pattern_from_slices, ReconstructOptions, Reconstruction, ReconstructionMethod,
};
pub use render::{render_pattern, Scene, Surface};
