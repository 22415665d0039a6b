// Process-level helpers shared by both binaries

pub mod logging;
pub mod shutdown;
