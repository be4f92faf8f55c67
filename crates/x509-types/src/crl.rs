// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! RFC 5280 §5 Certificate Revocation List (CRL) syntax.

use crate::common::{AlgorithmIdentifier, Asn1ReadableOrWritable, Time};
use crate::extensions::{DistributionPointName, Extensions, RawExtensions, ReasonFlags};
use crate::name::{GeneralNames, Name};

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct RevokedCertificate<'a> {
    pub user_certificate: asn1::BigUint<'a>,
    pub revocation_date: Time,
    #[explicit(0)]
    pub raw_crl_entry_extensions: Option<RawExtensions<'a>>,
}

impl<'a> RevokedCertificate<'a> {
    pub fn extensions(&self) -> Extensions<'a> {
        Extensions::from_raw(self.raw_crl_entry_extensions.clone())
    }
}

pub type RevokedCertificates<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, RevokedCertificate<'a>>,
    asn1::SequenceOfWriter<'a, RevokedCertificate<'a>>,
>;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct TBSCertList<'a> {
    #[default(0u8)]
    pub version: u8,
    pub signature: AlgorithmIdentifier<'a>,
    pub issuer: Name<'a>,
    pub this_update: Time,
    pub next_update: Option<Time>,
    pub revoked_certificates: Option<RevokedCertificates<'a>>,
    #[explicit(0)]
    pub raw_crl_extensions: Option<RawExtensions<'a>>,
}

impl<'a> TBSCertList<'a> {
    pub fn extensions(&self) -> Extensions<'a> {
        Extensions::from_raw(self.raw_crl_extensions.clone())
    }

    pub fn revoked_certs(&self) -> Vec<RevokedCertificate<'a>> {
        match &self.revoked_certificates {
            Some(Asn1ReadableOrWritable::Read(v, _)) => v.clone().collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct CertificateList<'a> {
    pub tbs_cert_list: TBSCertList<'a>,
    pub signature_algorithm: AlgorithmIdentifier<'a>,
    pub signature_value: asn1::BitString<'a>,
}

impl<'a> CertificateList<'a> {
    pub fn issuer(&self) -> &Name<'a> {
        &self.tbs_cert_list.issuer
    }

    pub fn tbs_cert_list_bytes(&self) -> Result<Vec<u8>, asn1::WriteError> {
        asn1::write_single(&self.tbs_cert_list)
    }
}

/// RFC 5280 §5.2.5 Issuing Distribution Point.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct IssuingDistributionPoint<'a> {
    #[explicit(0)]
    pub distribution_point: Option<DistributionPointName<'a>>,
    #[implicit(1)]
    #[default(false)]
    pub only_contains_user_certs: bool,
    #[implicit(2)]
    #[default(false)]
    pub only_contains_ca_certs: bool,
    #[implicit(3)]
    pub only_some_reasons: Option<ReasonFlags<'a>>,
    #[implicit(4)]
    #[default(false)]
    pub indirect_crl: bool,
    #[implicit(5)]
    #[default(false)]
    pub only_contains_attribute_certs: bool,
}

/// RFC 5280 §5.3.3 Certificate Issuer (a CRL *entry* extension used by
/// indirect CRLs to carry forward the issuer of the following entries
/// until overridden).
pub type CertificateIssuer<'a> = GeneralNames<'a>;
