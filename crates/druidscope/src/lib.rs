//! Top-level facade crate for druidscope.
//!
//! Re-exports the core aggregation engine and the exporter library so users
//! can depend on a single crate.

pub mod core {
    pub use druidscope_core::*;
}

pub mod exporter {
    pub use druidscope_exporter::*;
}
