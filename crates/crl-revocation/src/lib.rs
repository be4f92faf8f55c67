// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C5 (CRL engine) and C6 (revocation combinator): RFC 5280 §6.3
//! CRL-based revocation, combined with an OCSP oracle per a caller's
//! `RevocationPolicy`.

pub mod combinator;
pub mod engine;
pub mod error;
pub mod policy;
pub mod registry;
pub mod scope;

pub use combinator::{RevocationCombinator, SoftFailSink, TracingSoftFailSink};
pub use engine::{CrlEngine, CrlOutcome, RevocationSubject};
pub use error::{CrlCandidateFailure, CrlError, RevocationError};
pub use policy::{PerPositionRule, RevocationMode, RevocationPolicy};
pub use registry::{CertificateRegistry, CrlSource, NoCrls, NoOcsp, OcspOracle, OcspOutcome};
pub use scope::{CrlReason, ReasonSet};
