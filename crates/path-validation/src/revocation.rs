// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The C4/C6 seam: `PathValidator::validate` calls a `RevocationChecker`
//! at step 2c for every non-trust-anchor certificate, but this crate
//! never depends on the `crl-revocation` crate that implements one. This
//! keeps the cyclic relationship described in spec §9 ("CRL engine (C5)
//! recursively invokes the path state machine (C4) to validate a CRL
//! issuer's own path") a one-way dependency at compile time: the
//! combinator crate depends on this one and implements this trait, never
//! the reverse.

use x509_types::certificate::Certificate;
use x509_types::extensions::CRLDistributionPoints;
use x509_types::name::Name;

use crate::error::ValidationError;
use crate::path::ValidationPath;
use crate::state::ProcessingState;

/// Implemented by the revocation combinator (C6) in the `crl-revocation`
/// crate. Errors returned here are fatal to the enclosing path
/// validation (spec §4.4 step 2c: "failures raised here are fatal").
pub trait RevocationChecker<B: crate::ops::CryptoOps> {
    fn check(
        &self,
        cert: &Certificate<'_>,
        path: &ValidationPath<'_>,
        moment: &asn1::DateTime,
        processing_state: &mut ProcessingState,
        ops: &B,
    ) -> Result<(), ValidationError>;

    /// Spec §4.7: check a revocable identity that isn't a `Certificate`
    /// — an attribute certificate's own issuer/serial/CRL distribution
    /// points — against the same revocation machinery `check` applies to
    /// ordinary certificates. `issuer_path` is the validated path to the
    /// identity's issuer, used the same way `path` is used in `check`.
    /// Defaults to `Ok(())` so checkers that only ever examine ordinary
    /// certificates (like `NoRevocationCheck`) need no changes.
    fn check_identity(
        &self,
        issuer: &Name<'_>,
        serial: &asn1::BigUint<'_>,
        crl_distribution_points: Option<&CRLDistributionPoints<'_>>,
        issuer_path: &ValidationPath<'_>,
        moment: &asn1::DateTime,
        processing_state: &mut ProcessingState,
        ops: &B,
    ) -> Result<(), ValidationError> {
        let _ = (issuer, serial, crl_distribution_points, issuer_path, moment, processing_state, ops);
        Ok(())
    }
}

/// A `RevocationChecker` that never checks anything: useful for tests and
/// for embedders who intentionally run path validation without
/// revocation (spec §4.6 `mode = NO_CHECK` is the policy-level version of
/// this; this is the structural no-op for callers who never wire in a
/// `crl-revocation` combinator at all).
pub struct NoRevocationCheck;

impl<B: crate::ops::CryptoOps> RevocationChecker<B> for NoRevocationCheck {
    fn check(
        &self,
        _cert: &Certificate<'_>,
        _path: &ValidationPath<'_>,
        _moment: &asn1::DateTime,
        _processing_state: &mut ProcessingState,
        _ops: &B,
    ) -> Result<(), ValidationError> {
        Ok(())
    }
}
