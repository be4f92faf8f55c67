// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C1: the signature verifier. This crate never touches a concrete
//! cryptography backend directly; callers plug one in via `CryptoOps`
//! (the `openssl-ops` crate in this workspace provides the reference
//! implementation). Keeping the trait here, rather than a concrete
//! OpenSSL/ring dependency, is what lets CRL-issuer chain validation
//! (C5) and attribute-certificate AA validation (C7) reuse the exact
//! same path-validation core without pulling in a second copy of the
//! crypto backend.

use x509_types::certificate::Certificate;
use x509_types::common::{AlgorithmIdentifier, AlgorithmParameters};
use x509_types::oid::DSA_OID;

/// A decoded, algorithm-tagged public key, opaque to this crate.
pub trait PublicKey {}

/// Errors produced while attempting to verify a signature (spec §4.1 / §7).
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("hash algorithm is in the configured weak set")]
    WeakHash,
    #[error("RSASSA-PSS parameters on the envelope do not match key-side constraints")]
    PssParameterMismatch,
    #[error("signature does not verify")]
    InvalidSignature,
    #[error("unsupported signature or public-key algorithm")]
    UnsupportedAlgorithm,
    #[error("malformed public key: {0}")]
    MalformedKey(String),
}

/// C1: pluggable signature-verification backend.
///
/// Implementors own the actual crypto (RSA/EC/EdDSA primitives); this
/// crate only decides *which* algorithm-chain check to run and whether a
/// hash is on the caller's weak list.
pub trait CryptoOps {
    type Key: PublicKey;

    /// Decode `cert`'s `SubjectPublicKeyInfo` into a key this backend can
    /// use for verification.
    fn public_key(&self, cert: &Certificate<'_>) -> Result<Self::Key, SignatureError>;

    /// Verify that `signature` over `tbs` was produced by `key` under
    /// `signature_alg`. This is the one primitive every signed PKIX
    /// structure this workspace verifies boils down to: certificates
    /// (`verify_signed_by`), CRLs (C5) and attribute certificates (C7)
    /// all carry a `tbsCertificate`/`tbsCertList`/`acInfo`-shaped blob, an
    /// `AlgorithmIdentifier`, and a `BIT STRING` signature.
    ///
    /// Implementations must reject before computing any digest if the
    /// hash algorithm implied by `signature_alg` is in
    /// `weak_hash_algorithms`, and must treat an RSASSA-PSS parameter
    /// mismatch (`hashAlgorithm`/`maskGenAlgorithm`/`saltLength` vs. the
    /// key's own constraints) as `SignatureError::PssParameterMismatch`
    /// rather than `InvalidSignature`, so callers can tell the two apart.
    fn verify_tbs_signature(
        &self,
        tbs: &[u8],
        signature_alg: &AlgorithmIdentifier<'_>,
        signature: &[u8],
        key: &Self::Key,
        weak_hash_algorithms: &std::collections::HashSet<String>,
    ) -> Result<(), SignatureError>;

    /// Verify that `child` was signed by `key`, per `child.signature_alg`.
    fn verify_signed_by(
        &self,
        child: &Certificate<'_>,
        key: &Self::Key,
        weak_hash_algorithms: &std::collections::HashSet<String>,
    ) -> Result<(), SignatureError> {
        let tbs = child
            .tbs_cert_bytes()
            .map_err(|e| SignatureError::MalformedKey(format!("{e:?}")))?;
        self.verify_tbs_signature(&tbs, &child.signature_alg, child.signature.as_bytes(), key, weak_hash_algorithms)
    }

    /// SHA-256 digest, used by `PoeMap` registration (spec §3 "POE Map").
    /// The core never links a hash crate directly (spec §1); this is the
    /// one place a `CryptoOps` backend is asked to produce a digest
    /// outside of signature verification itself.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// True when `cert`'s SubjectPublicKeyInfo declares the DSA algorithm
    /// with domain parameters omitted, per RFC 5280 §7.3.3: such a key's
    /// parameters are inherited from the issuer's key. This is the only
    /// DSA-parameter-inheritance behavior this core supports (spec §1
    /// Non-goals: "copying parameters forward verbatim").
    fn is_dsa_key_missing_parameters(&self, cert: &Certificate<'_>) -> bool {
        matches!(
            &cert.tbs_cert.spki.algorithm.params,
            AlgorithmParameters::Other(oid, None) if oid == &DSA_OID
        )
    }

    /// Produce a key equivalent to `child`'s declared key, but with DSA
    /// domain parameters copied forward from `previous` (the issuer's
    /// working key). Only called when `is_dsa_key_missing_parameters`
    /// returned true and `previous` is itself a DSA key; backends that
    /// don't support DSA may return `UnsupportedAlgorithm`.
    fn inherit_dsa_parameters(
        &self,
        child: &Certificate<'_>,
        previous: &Self::Key,
    ) -> Result<Self::Key, SignatureError>;

    /// True if `key` (a previously-decoded working key) is itself a DSA
    /// key, i.e. a candidate source for `inherit_dsa_parameters`.
    fn key_is_dsa(&self, key: &Self::Key) -> bool;
}
