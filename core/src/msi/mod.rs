pub mod reader;

pub use reader::{parse_msi, read_msi, MsiData};
