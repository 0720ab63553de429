//! Library side of the `rxscan` binary.

pub mod logging;
pub mod setup;
