pub mod stl;

pub use stl::{triangulate_grid, write_stl};
