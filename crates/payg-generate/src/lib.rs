//! PAYG Generate - single-code query and period listing
//!
//! Given a key file, a period name and an optional counter, prints either one
//! code or every code of the period in ascending order, one per line.

pub mod commands;

pub use commands::*;
