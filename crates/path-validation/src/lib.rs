// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The PKIX certification-path state machine (RFC 5280 §6.1): C1's
//! pluggable signature-verification boundary, C2's name/constraint
//! engine, C3's valid-policy tree, and the C4 driver that ties them
//! together. CRL/OCSP revocation (C5/C6) and attribute-certificate
//! validation (C7) are separate crates that depend on this one and
//! satisfy the `RevocationChecker` trait defined here.

#![forbid(unsafe_code)]

pub mod error;
pub mod name_constraints;
pub mod ops;
pub mod params;
pub mod path;
pub mod poe;
pub mod policy_tree;
pub mod revocation;
pub mod state;
pub mod types;
pub mod validate;

pub use error::ValidationError;
pub use params::ValidationParameters;
pub use path::{TrustAnchor, TrustQualifiers, ValidationPath};
pub use revocation::{NoRevocationCheck, RevocationChecker};
pub use state::{PathStackEntry, PathState, ProcessingState};
pub use validate::{PathValidator, QualifiedPolicy};
