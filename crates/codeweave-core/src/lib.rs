//! Codeweave Core Types and Definitions
//!
//! This crate provides the foundational value types shared by the Codeweave
//! model and diagram graphs. It includes:
//!
//! - **Identifiers**: Stable node and relationship ids, interned names and
//!   opaque entity references ([`identifier`] module)
//! - **Stereotypes**: Closed sets of node and relationship kinds together with
//!   the legal-pair table ([`stereotype`] module)
//! - **Connectors**: Presentational connector types ([`connector`] module)
//! - **Geometry**: Points, sizes, bounds and insets in canvas space
//!   ([`geometry`] module)

pub mod connector;
pub mod geometry;
pub mod identifier;
pub mod stereotype;
