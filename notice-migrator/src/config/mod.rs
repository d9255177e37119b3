//! Configuration and dependency wiring for the notice migrator.

mod dependencies;

pub use dependencies::Dependencies;
