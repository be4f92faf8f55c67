// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! The reference `CryptoOps` backend (C1), implemented on top of the
//! `openssl` crate. This is the only crate in the workspace that links
//! a concrete cryptography implementation; everything in `path-validation`
//! is generic over the `CryptoOps` trait so that other backends can be
//! substituted without touching the state machine.

use std::collections::HashSet;

use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Public};
use openssl::sign::{RsaPssSaltlen, Verifier};

use path_validation::ops::{CryptoOps, PublicKey, SignatureError};
use x509_types::certificate::Certificate;
use x509_types::common::AlgorithmParameters;

/// An openssl-decoded public key, tagged opaque to `path-validation`.
pub struct OpenSslPublicKey(pub(crate) PKey<Public>);

impl PublicKey for OpenSslPublicKey {}

/// `CryptoOps` backed by `openssl`. Stateless; safe to share across
/// concurrent validations.
#[derive(Default, Clone, Copy)]
pub struct OpenSslCryptoOps;

impl CryptoOps for OpenSslCryptoOps {
    type Key = OpenSslPublicKey;

    fn public_key(&self, cert: &Certificate<'_>) -> Result<Self::Key, SignatureError> {
        let spki = &cert.tbs_cert.spki;
        let key = key_parsing::parse_spki(spki, None)
            .map_err(|e| SignatureError::MalformedKey(e.to_string()))?;
        Ok(OpenSslPublicKey(key))
    }

    fn verify_tbs_signature(
        &self,
        tbs: &[u8],
        signature_alg: &x509_types::common::AlgorithmIdentifier<'_>,
        signature: &[u8],
        key: &Self::Key,
        weak_hash_algorithms: &HashSet<String>,
    ) -> Result<(), SignatureError> {
        // Ed25519/Ed448 sign the message directly; openssl's one-shot
        // verifier API is the only way to drive them (no incremental
        // `update`, and no digest of their own to weigh against the
        // caller's weak-hash set).
        if matches!(
            &signature_alg.params,
            AlgorithmParameters::Ed25519 | AlgorithmParameters::Ed448
        ) {
            let verifier = Verifier::new_without_digest(&key.0)
                .map_err(|_| SignatureError::UnsupportedAlgorithm)?;
            return if verifier
                .verify_oneshot(signature, tbs)
                .map_err(|_| SignatureError::InvalidSignature)?
            {
                Ok(())
            } else {
                Err(SignatureError::InvalidSignature)
            };
        }

        let digest = digest_for_params(&signature_alg.params)?;
        if weak_hash_algorithms.contains(digest.name()) {
            return Err(SignatureError::WeakHash);
        }

        let mut verifier =
            Verifier::new(digest, &key.0).map_err(|_| SignatureError::UnsupportedAlgorithm)?;

        if let AlgorithmParameters::RsaPss(params) = &signature_alg.params {
            configure_pss(&mut verifier, params.as_deref())?;
        }

        verifier
            .update(tbs)
            .map_err(|_| SignatureError::InvalidSignature)?;
        if verifier
            .verify(signature)
            .map_err(|_| SignatureError::InvalidSignature)?
        {
            Ok(())
        } else {
            Err(SignatureError::InvalidSignature)
        }
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        let digest = openssl::hash::hash(MessageDigest::sha256(), data)
            .expect("sha256 is always available");
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    fn inherit_dsa_parameters(
        &self,
        child: &Certificate<'_>,
        previous: &Self::Key,
    ) -> Result<Self::Key, SignatureError> {
        let inherited = key_parsing::dsa_domain_parameters(&previous.0)
            .ok_or(SignatureError::UnsupportedAlgorithm)?;
        let key = key_parsing::parse_spki(&child.tbs_cert.spki, Some(&inherited))
            .map_err(|e| SignatureError::MalformedKey(e.to_string()))?;
        Ok(OpenSslPublicKey(key))
    }

    fn key_is_dsa(&self, key: &Self::Key) -> bool {
        key.0.dsa().is_ok()
    }
}

fn digest_for_params(
    params: &AlgorithmParameters<'_>,
) -> Result<MessageDigest, SignatureError> {
    use AlgorithmParameters::*;
    match params {
        RsaWithSha1(_) | RsaWithSha1Alt(_) => Ok(MessageDigest::sha1()),
        RsaWithSha224(_) | EcDsaWithSha224(_) | DsaWithSha224 => Ok(MessageDigest::sha224()),
        RsaWithSha256(_) | EcDsaWithSha256(_) | DsaWithSha256 => Ok(MessageDigest::sha256()),
        RsaWithSha384(_) | EcDsaWithSha384(_) | DsaWithSha384 => Ok(MessageDigest::sha384()),
        RsaWithSha512(_) | EcDsaWithSha512(_) | DsaWithSha512 => Ok(MessageDigest::sha512()),
        Ed25519 | Ed448 => Ok(MessageDigest::null()),
        RsaPss(Some(p)) => digest_for_params(&p.hash_algorithm.params),
        RsaPss(None) => Ok(MessageDigest::sha1()),
        _ => Err(SignatureError::UnsupportedAlgorithm),
    }
}

/// RSASSA-PSS envelope parameters must match the same hash/MGF/salt
/// length the verifier is about to use; a mismatch is reported as
/// `PssParameterMismatch` so callers can distinguish it from a plain
/// signature failure (spec §4.1).
fn configure_pss(
    verifier: &mut Verifier<'_>,
    params: Option<&x509_types::common::RsaPssParameters<'_>>,
) -> Result<(), SignatureError> {
    let params = params.ok_or(SignatureError::PssParameterMismatch)?;
    let mgf_digest = digest_for_params(&params.mask_gen_algorithm.params.params)?;
    let hash_digest = digest_for_params(&params.hash_algorithm.params)?;
    if mgf_digest.type_() != hash_digest.type_() {
        return Err(SignatureError::PssParameterMismatch);
    }
    verifier
        .set_rsa_padding(openssl::rsa::Padding::PKCS1_PSS)
        .map_err(|_| SignatureError::PssParameterMismatch)?;
    verifier
        .set_rsa_mgf1_md(mgf_digest)
        .map_err(|_| SignatureError::PssParameterMismatch)?;
    verifier
        .set_rsa_pss_saltlen(RsaPssSaltlen::custom(params.salt_length.into()))
        .map_err(|_| SignatureError::PssParameterMismatch)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_for_params_rejects_unsupported() {
        let params = AlgorithmParameters::Other(asn1::oid!(1, 2, 3), None);
        assert!(matches!(
            digest_for_params(&params),
            Err(SignatureError::UnsupportedAlgorithm)
        ));
    }

    #[test]
    fn test_digest_for_params_maps_sha256() {
        let digest = digest_for_params(&AlgorithmParameters::RsaWithSha256(Some(()))).unwrap();
        assert_eq!(digest.type_(), MessageDigest::sha256().type_());
    }
}
