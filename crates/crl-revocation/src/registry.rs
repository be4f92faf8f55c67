// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C5/C6's external collaborators (spec §6). Fetching — network, disk,
//! whatever — is entirely the embedder's concern; these traits describe
//! only what the engine consumes once data has arrived.

use x509_types::certificate::Certificate;
use x509_types::crl::CertificateList;
use x509_types::name::Name;

use crate::engine::RevocationSubject;

/// The in-memory certificate store the engine searches for CRL-issuer
/// and AA candidates (spec §3 "Certificate Registry").
pub trait CertificateRegistry {
    /// Certificates whose subject DN matches `name`.
    fn by_subject<'a>(&self, name: &Name<'a>) -> Vec<Certificate<'a>>;

    /// Certificates whose `subjectKeyIdentifier` extension matches
    /// `key_id`.
    fn by_key_identifier<'a>(&self, key_id: &[u8]) -> Vec<Certificate<'a>>;
}

/// Supplies the CRLs that might cover a given revocable identity. This
/// is a pull interface: whether satisfying it involved a network fetch
/// is up to the embedder, not this crate (spec §6 `fetch_crl_issuers`).
/// Takes a `RevocationSubject` rather than a `Certificate` so the same
/// source can also answer for an attribute certificate's own identity
/// (spec §4.7).
pub trait CrlSource {
    fn crls_for<'a>(&self, subject: &RevocationSubject<'a>) -> Vec<CertificateList<'a>>;
}

/// An OCSP oracle (spec §6 `verify_ocsp_response`): this crate never
/// parses a raw OCSP response itself, only asks whether a prior
/// verification found the certificate good, revoked, or indeterminate.
/// The four-outcome shape mirrors spec §6's `ok | OCSPNoMatchesError |
/// OCSPValidationIndeterminateError(failures) | OCSPFetchError` exactly,
/// plus a `Revoked` variant for the one outcome that's immediately fatal
/// regardless of mode (symmetric with `CrlOutcome::Revoked` in C5).
pub trait OcspOracle {
    fn check<'a>(
        &self,
        cert: &Certificate<'a>,
        issuer: &Certificate<'a>,
        moment: &asn1::DateTime,
    ) -> OcspOutcome;
}

#[derive(Debug, Clone)]
pub enum OcspOutcome {
    Good,
    Revoked {
        revocation_time: asn1::DateTime,
        reason: Option<String>,
    },
    /// `OCSPNoMatchesError`: no responder had anything to say about this
    /// certificate. Silent per spec §4.6 step 2.
    NoMatch,
    /// `OCSPValidationIndeterminateError`: a responder answered but the
    /// response itself didn't validate (signature, nonce, thisUpdate...).
    Indeterminate(Vec<String>),
    /// `OCSPFetchError`: no responder was reachable.
    FetchError(String),
}

/// An `OcspOracle` that never has anything to say, for embedders who
/// only want CRL-based revocation checking.
pub struct NoOcsp;

impl OcspOracle for NoOcsp {
    fn check<'a>(
        &self,
        _cert: &Certificate<'a>,
        _issuer: &Certificate<'a>,
        _moment: &asn1::DateTime,
    ) -> OcspOutcome {
        OcspOutcome::NoMatch
    }
}

/// A `CrlSource` with nothing in it, for embedders who only want OCSP.
pub struct NoCrls;

impl CrlSource for NoCrls {
    fn crls_for<'a>(&self, _subject: &RevocationSubject<'a>) -> Vec<CertificateList<'a>> {
        Vec::new()
    }
}
