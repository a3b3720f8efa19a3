// Utility functions

pub mod encoding;
pub mod filename;
pub mod logger;

pub use encoding::*;
pub use filename::*;
pub use logger::*;
