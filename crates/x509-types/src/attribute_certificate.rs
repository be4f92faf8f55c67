// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! RFC 5755 §4.1 Attribute Certificate syntax.

use crate::common::{AlgorithmIdentifier, Asn1ReadableOrWritable, RawTlv, Time};
use crate::extensions::{Extensions, RawExtensions};
use crate::name::{GeneralNames, Name};

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct IssuerSerial<'a> {
    pub issuer: GeneralNames<'a>,
    pub serial: asn1::BigUint<'a>,
    pub issuer_uid: Option<asn1::BitString<'a>>,
}

/// RFC 5755 §4.2.2: digest over the holder's public key or another
/// object, used only when neither `base_certificate_id` nor `entity_name`
/// is present. Object-digest-info holder matching is an explicit
/// Non-goal; this type exists only so the ASN.1 shape round-trips.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct ObjectDigestInfo<'a> {
    pub digested_object_type: asn1::Enumerated,
    pub other_object_type_id: Option<asn1::ObjectIdentifier>,
    pub digest_algorithm: AlgorithmIdentifier<'a>,
    pub object_digest: asn1::BitString<'a>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Holder<'a> {
    #[explicit(0)]
    pub base_certificate_id: Option<IssuerSerial<'a>>,
    #[explicit(1)]
    pub entity_name: Option<GeneralNames<'a>>,
    #[explicit(2)]
    pub object_digest_info: Option<ObjectDigestInfo<'a>>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct V2Form<'a> {
    pub issuer_name: Option<GeneralNames<'a>>,
    #[implicit(0)]
    pub base_certificate_id: Option<IssuerSerial<'a>>,
    #[implicit(1)]
    pub object_digest_info: Option<ObjectDigestInfo<'a>>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub enum AttCertIssuer<'a> {
    V1Form(GeneralNames<'a>),
    #[implicit(0)]
    V2Form(V2Form<'a>),
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AttCertValidityPeriod {
    pub not_before_time: Time,
    pub not_after_time: Time,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Attribute<'a> {
    pub attr_type: asn1::ObjectIdentifier,
    pub attr_values: Asn1ReadableOrWritable<
        'a,
        asn1::SetOf<'a, RawTlv<'a>>,
        asn1::SetOfWriter<'a, RawTlv<'a>>,
    >,
}

pub type Attributes<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, Attribute<'a>>,
    asn1::SequenceOfWriter<'a, Attribute<'a>>,
>;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AttCertInfo<'a> {
    #[default(1u8)]
    pub version: u8,
    pub holder: Holder<'a>,
    pub issuer: AttCertIssuer<'a>,
    pub signature: AlgorithmIdentifier<'a>,
    pub serial_number: asn1::BigUint<'a>,
    pub att_cert_validity_period: AttCertValidityPeriod,
    pub attributes: Attributes<'a>,
    pub issuer_unique_id: Option<asn1::BitString<'a>>,
    #[explicit(0)]
    pub raw_extensions: Option<RawExtensions<'a>>,
}

impl<'a> AttCertInfo<'a> {
    pub fn extensions(&self) -> Extensions<'a> {
        Extensions::from_raw(self.raw_extensions.clone())
    }
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AttributeCertificate<'a> {
    pub ac_info: AttCertInfo<'a>,
    pub signature_algorithm: AlgorithmIdentifier<'a>,
    pub signature_value: asn1::BitString<'a>,
}

impl<'a> AttributeCertificate<'a> {
    pub fn holder(&self) -> &Holder<'a> {
        &self.ac_info.holder
    }

    pub fn issuer(&self) -> &AttCertIssuer<'a> {
        &self.ac_info.issuer
    }

    pub fn extensions(&self) -> Extensions<'a> {
        self.ac_info.extensions()
    }

    /// Whether the envelope `signatureAlgorithm` is encoded identically to
    /// `ac_info.signature` (RFC 5755 §4.1 requires these to match exactly).
    pub fn signature_alg_matches(&self) -> bool {
        match (
            asn1::write_single(&self.signature_algorithm),
            asn1::write_single(&self.ac_info.signature),
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    pub fn ac_info_bytes(&self) -> Result<Vec<u8>, asn1::WriteError> {
        asn1::write_single(&self.ac_info)
    }

    pub fn name(&self) -> &'static str {
        "attribute certificate"
    }
}

/// RFC 5755 §4.3.1 Target / Targets / TargetInformation.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub enum Target<'a> {
    #[implicit(0)]
    Name(crate::name::GeneralName<'a>),
    #[implicit(1)]
    Group(crate::name::GeneralName<'a>),
    #[implicit(2)]
    Cert(RawTlv<'a>),
}

pub type Targets<'a> =
    Asn1ReadableOrWritable<'a, asn1::SequenceOf<'a, Target<'a>>, asn1::SequenceOfWriter<'a, Target<'a>>>;

pub type TargetInformation<'a> =
    Asn1ReadableOrWritable<'a, asn1::SequenceOf<'a, Targets<'a>>, asn1::SequenceOfWriter<'a, Targets<'a>>>;
