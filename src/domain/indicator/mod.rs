//! Technical indicators evaluated point-in-time over bar history.

pub mod sma;
