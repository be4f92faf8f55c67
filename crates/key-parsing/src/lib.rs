// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Decodes a PKIX `SubjectPublicKeyInfo` into an `openssl::pkey::PKey`,
//! including the RFC 5280 §7.3.3 DSA domain-parameter inheritance case
//! (where a certificate's own SPKI omits `p`/`q`/`g` and the issuer's
//! working key supplies them).

use openssl::bn::BigNum;
use openssl::dsa::Dsa;
use openssl::ec::{EcGroup, EcKey, EcPoint};
use openssl::nid::Nid;
use openssl::pkey::{Id, PKey, Public};
use openssl::rsa::Rsa;
use x509_types::common::{AlgorithmParameters, SubjectPublicKeyInfo};
use x509_types::oid;

#[derive(Debug, thiserror::Error)]
pub enum KeyParsingError {
    #[error("unsupported public-key algorithm")]
    UnsupportedAlgorithm,
    #[error("malformed public key: {0}")]
    InvalidKey(String),
    #[error("DSA key is missing domain parameters and none were provided to inherit")]
    MissingDsaParameters,
}

impl From<openssl::error::ErrorStack> for KeyParsingError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        KeyParsingError::InvalidKey(e.to_string())
    }
}

impl From<asn1::ParseError> for KeyParsingError {
    fn from(e: asn1::ParseError) -> Self {
        KeyParsingError::InvalidKey(format!("ASN.1 parse error: {e:?}"))
    }
}

/// `Dss-Parms` from RFC 3279 §2.3.2, carried either in a DSA SPKI's own
/// `AlgorithmIdentifier` parameters or forwarded from an issuer's key.
#[derive(asn1::Asn1Read, Clone)]
struct DssParms<'a> {
    p: asn1::BigUint<'a>,
    q: asn1::BigUint<'a>,
    g: asn1::BigUint<'a>,
}

/// The `p`/`q`/`g` domain parameters of a DSA key, detached from any
/// particular certificate so they can be copied forward per RFC 5280
/// §7.3.3.
pub struct DsaDomainParameters {
    p: BigNum,
    q: BigNum,
    g: BigNum,
}

/// Parse `spki` into a public key. `inherited_dsa_params`, when present,
/// is used only if `spki` declares the DSA algorithm with its own
/// parameters omitted; it is ignored for every other key type.
pub fn parse_spki(
    spki: &SubjectPublicKeyInfo<'_>,
    inherited_dsa_params: Option<&DsaDomainParameters>,
) -> Result<PKey<Public>, KeyParsingError> {
    let key_bits = spki.subject_public_key.as_bytes();

    match &spki.algorithm.params {
        AlgorithmParameters::Other(alg_oid, _params) if alg_oid == &oid::RSA_OID => {
            let rsa = Rsa::public_key_from_der_pkcs1(key_bits)?;
            Ok(PKey::from_rsa(rsa)?)
        }
        AlgorithmParameters::Other(alg_oid, params) if alg_oid == &oid::EC_OID => {
            let params = params
                .as_ref()
                .ok_or_else(|| KeyParsingError::InvalidKey("EC key missing namedCurve".into()))?;
            let curve_oid = asn1::parse_single::<asn1::ObjectIdentifier>(params.full_data())?;
            let nid = ec_nid_for_oid(&curve_oid)?;
            let group = EcGroup::from_curve_name(nid)?;
            let mut ctx = openssl::bn::BigNumContext::new()?;
            let point = EcPoint::from_bytes(&group, key_bits, &mut ctx)?;
            let ec_key = EcKey::from_public_key(&group, &point)?;
            Ok(PKey::from_ec_key(ec_key)?)
        }
        AlgorithmParameters::Other(alg_oid, params) if alg_oid == &oid::DSA_OID => {
            let (p, q, g) = match params {
                Some(tlv) => {
                    let parms = asn1::parse_single::<DssParms<'_>>(tlv.full_data())?;
                    (
                        BigNum::from_slice(parms.p.as_bytes())?,
                        BigNum::from_slice(parms.q.as_bytes())?,
                        BigNum::from_slice(parms.g.as_bytes())?,
                    )
                }
                None => {
                    let inherited = inherited_dsa_params
                        .ok_or(KeyParsingError::MissingDsaParameters)?;
                    (
                        inherited.p.to_owned()?,
                        inherited.q.to_owned()?,
                        inherited.g.to_owned()?,
                    )
                }
            };
            let y = BigNum::from_slice(key_bits)?;
            let dsa = Dsa::from_public_components(p, q, g, y)?;
            Ok(PKey::from_dsa(dsa)?)
        }
        AlgorithmParameters::Ed25519 => {
            Ok(PKey::public_key_from_raw_bytes(key_bits, Id::ED25519)?)
        }
        AlgorithmParameters::Ed448 => Ok(PKey::public_key_from_raw_bytes(key_bits, Id::ED448)?),
        _ => Err(KeyParsingError::UnsupportedAlgorithm),
    }
}

/// True when `spki` declares DSA with domain parameters omitted, i.e. a
/// candidate for `inherited_dsa_params` on the next `parse_spki` call.
pub fn is_dsa_missing_parameters(spki: &SubjectPublicKeyInfo<'_>) -> bool {
    matches!(
        &spki.algorithm.params,
        AlgorithmParameters::Other(alg_oid, None) if alg_oid == &oid::DSA_OID
    )
}

/// Extract `p`/`q`/`g` from a previously-decoded DSA key, for forwarding
/// to a subject certificate whose own SPKI omits them.
pub fn dsa_domain_parameters(key: &PKey<Public>) -> Option<DsaDomainParameters> {
    let dsa = key.dsa().ok()?;
    Some(DsaDomainParameters {
        p: dsa.p().to_owned().ok()?,
        q: dsa.q().to_owned().ok()?,
        g: dsa.g().to_owned().ok()?,
    })
}

fn ec_nid_for_oid(curve_oid: &asn1::ObjectIdentifier) -> Result<Nid, KeyParsingError> {
    if curve_oid == &oid::EC_SECP256R1 {
        Ok(Nid::X9_62_PRIME256V1)
    } else if curve_oid == &oid::EC_SECP384R1 {
        Ok(Nid::SECP384R1)
    } else if curve_oid == &oid::EC_SECP521R1 {
        Ok(Nid::SECP521R1)
    } else {
        Err(KeyParsingError::UnsupportedAlgorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec_nid_for_oid_rejects_unknown_curve() {
        let unknown = asn1::oid!(1, 2, 3, 4, 5);
        assert!(matches!(
            ec_nid_for_oid(&unknown),
            Err(KeyParsingError::UnsupportedAlgorithm)
        ));
    }

    #[test]
    fn test_ec_nid_for_oid_known_curves() {
        assert_eq!(
            ec_nid_for_oid(&oid::EC_SECP256R1).unwrap(),
            Nid::X9_62_PRIME256V1
        );
        assert_eq!(ec_nid_for_oid(&oid::EC_SECP384R1).unwrap(), Nid::SECP384R1);
        assert_eq!(ec_nid_for_oid(&oid::EC_SECP521R1).unwrap(), Nid::SECP521R1);
    }
}
