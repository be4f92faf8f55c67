// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

use crate::common::{AlgorithmIdentifier, SubjectPublicKeyInfo, Time};
use crate::extensions::{Extension, Extensions, RawExtensions};
use crate::name::Name;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Validity {
    pub not_before: Time,
    pub not_after: Time,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct TbsCertificate<'a> {
    #[explicit(0)]
    #[default(0u8)]
    pub version: u8,
    pub serial: asn1::BigUint<'a>,
    pub signature_alg: AlgorithmIdentifier<'a>,
    pub issuer: Name<'a>,
    pub validity: Validity,
    pub subject: Name<'a>,
    pub spki: SubjectPublicKeyInfo<'a>,
    #[implicit(1)]
    pub issuer_unique_id: Option<asn1::BitString<'a>>,
    #[implicit(2)]
    pub subject_unique_id: Option<asn1::BitString<'a>>,
    #[explicit(3)]
    pub raw_extensions: Option<RawExtensions<'a>>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Certificate<'a> {
    pub tbs_cert: TbsCertificate<'a>,
    pub signature_alg: AlgorithmIdentifier<'a>,
    pub signature: asn1::BitString<'a>,
}

impl<'a> Certificate<'a> {
    pub fn issuer(&self) -> &Name<'a> {
        &self.tbs_cert.issuer
    }

    pub fn subject(&self) -> &Name<'a> {
        &self.tbs_cert.subject
    }

    pub fn is_self_issued(&self) -> bool {
        crate::name::names_equal(self.issuer(), self.subject())
    }

    pub fn extensions(&self) -> asn1::ParseResult<Extensions<'a>> {
        Ok(Extensions::from_raw(self.tbs_cert.raw_extensions.clone()))
    }

    /// Re-encodes the signed portion (`tbsCertificate`) for signature
    /// verification.
    pub fn tbs_cert_bytes(&self) -> Result<Vec<u8>, asn1::WriteError> {
        asn1::write_single(&self.tbs_cert)
    }

    pub fn critical_extension_oids(&self) -> Vec<asn1::ObjectIdentifier> {
        match self.extensions() {
            Ok(exts) => exts
                .iter()
                .filter(|e: &Extension<'_>| e.critical)
                .map(|e| e.extn_id)
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}
