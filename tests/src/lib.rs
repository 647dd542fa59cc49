//! # Constellation Test Suite
//!
//! Cross-crate integration flows.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # Buses talking over the broadcast hub
//!     └── directory.rs    # Runtime reconciliation against a live HTTP directory
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cn-tests
//! cargo test -p cn-tests integration::directory::
//! ```

pub mod integration;
