// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! RFC 5280 §4.2 certificate extensions and RFC 5755 AC controls.

use crate::common::Asn1ReadableOrWritable;
use crate::name::{GeneralName, GeneralNames, Name};

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct Extension<'a> {
    pub extn_id: asn1::ObjectIdentifier,
    #[default(false)]
    pub critical: bool,
    pub extn_value: &'a [u8],
}

impl<'a> Extension<'a> {
    /// Parse this extension's `extnValue` octets as a `T`.
    pub fn value<T: asn1::Asn1Readable<'a>>(&self) -> asn1::ParseResult<T> {
        asn1::parse_single(self.extn_value)
    }
}

pub type RawExtensions<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, Extension<'a>>,
    asn1::SequenceOfWriter<'a, Extension<'a>>,
>;

/// A parsed `Extensions` sequence, with convenience lookup by OID.
///
/// Mirrors the shape the path-validation policy engine expects
/// (`extensions.get_extension(&OID)`, `extensions.iter()`).
pub struct Extensions<'a> {
    raw: Option<RawExtensions<'a>>,
}

impl<'a> Extensions<'a> {
    pub fn from_raw(raw: Option<RawExtensions<'a>>) -> Self {
        Extensions { raw }
    }

    pub fn iter(&self) -> impl Iterator<Item = Extension<'a>> + '_ {
        let items: Vec<Extension<'a>> = match &self.raw {
            Some(Asn1ReadableOrWritable::Read(v, _)) => v.clone().collect(),
            _ => Vec::new(),
        };
        items.into_iter()
    }

    pub fn get_extension(&self, oid: &asn1::ObjectIdentifier) -> Option<Extension<'a>> {
        self.iter().find(|e| &e.extn_id == oid)
    }
}

// 5280 4.2.1.3 Key Usage
#[derive(Clone)]
pub struct KeyUsage<'a>(asn1::BitString<'a>);

impl<'a> asn1::SimpleAsn1Readable<'a> for KeyUsage<'a> {
    const TAG: asn1::Tag = asn1::BitString::TAG;
    fn parse_data(data: &'a [u8]) -> asn1::ParseResult<Self> {
        Ok(KeyUsage(asn1::BitString::parse_data(data)?))
    }
}
impl<'a> asn1::SimpleAsn1Writable for KeyUsage<'a> {
    const TAG: asn1::Tag = asn1::BitString::TAG;
    fn write_data(&self, w: &mut asn1::WriteBuf) -> asn1::WriteResult {
        self.0.write_data(w)
    }
}

macro_rules! key_usage_bit {
    ($name:ident, $bit:literal) => {
        pub fn $name(&self) -> bool {
            self.0.has_bit_set($bit)
        }
    };
}

impl<'a> KeyUsage<'a> {
    key_usage_bit!(digital_signature, 0);
    key_usage_bit!(non_repudiation, 1);
    key_usage_bit!(key_encipherment, 2);
    key_usage_bit!(data_encipherment, 3);
    key_usage_bit!(key_agreement, 4);
    key_usage_bit!(key_cert_sign, 5);
    key_usage_bit!(crl_sign, 6);
    key_usage_bit!(encipher_only, 7);
    key_usage_bit!(decipher_only, 8);
}

// 5280 4.2.1.9 Basic Constraints
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct BasicConstraints {
    #[default(false)]
    pub ca: bool,
    pub path_length: Option<u64>,
}

pub type SubjectAlternativeName<'a> = GeneralNames<'a>;
pub type IssuerAlternativeName<'a> = GeneralNames<'a>;

// 5280 4.2.1.10 Name Constraints
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct GeneralSubtree<'a> {
    pub base: GeneralName<'a>,
    #[explicit(0)]
    #[default(0u64)]
    pub minimum: u64,
    #[explicit(1)]
    pub maximum: Option<u64>,
}

pub type GeneralSubtrees<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, GeneralSubtree<'a>>,
    asn1::SequenceOfWriter<'a, GeneralSubtree<'a>>,
>;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct NameConstraints<'a> {
    #[implicit(0)]
    pub permitted_subtrees: Option<GeneralSubtrees<'a>>,
    #[implicit(1)]
    pub excluded_subtrees: Option<GeneralSubtrees<'a>>,
}

// 5280 4.2.1.4 Certificate Policies
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct PolicyQualifierInfo<'a> {
    pub policy_qualifier_id: asn1::ObjectIdentifier,
    pub qualifier: asn1::Tlv<'a>,
}

pub type PolicyQualifierInfos<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, PolicyQualifierInfo<'a>>,
    asn1::SequenceOfWriter<'a, PolicyQualifierInfo<'a>>,
>;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct PolicyInformation<'a> {
    pub policy_identifier: asn1::ObjectIdentifier,
    pub policy_qualifiers: Option<PolicyQualifierInfos<'a>>,
}

pub type CertificatePolicies<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, PolicyInformation<'a>>,
    asn1::SequenceOfWriter<'a, PolicyInformation<'a>>,
>;

// 5280 4.2.1.5 Policy Mappings
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct PolicyMapping {
    pub issuer_domain_policy: asn1::ObjectIdentifier,
    pub subject_domain_policy: asn1::ObjectIdentifier,
}

pub type PolicyMappings<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, PolicyMapping>,
    asn1::SequenceOfWriter<'a, PolicyMapping>,
>;

// 5280 4.2.1.11 Policy Constraints
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct PolicyConstraints {
    #[implicit(0)]
    pub require_explicit_policy: Option<u64>,
    #[implicit(1)]
    pub inhibit_policy_mapping: Option<u64>,
}

// 5280 4.2.1.14 Inhibit anyPolicy
pub type InhibitAnyPolicy = u64;

// 5280 4.2.1.1 Authority Key Identifier
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AuthorityKeyIdentifier<'a> {
    #[implicit(0)]
    pub key_identifier: Option<&'a [u8]>,
    #[implicit(1)]
    pub authority_cert_issuer: Option<GeneralNames<'a>>,
    #[implicit(2)]
    pub authority_cert_serial_number: Option<asn1::BigUint<'a>>,
}

// 5280 4.2.2.1 Authority Information Access / 4.2.2.2 Subject Information Access
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AccessDescription<'a> {
    pub access_method: asn1::ObjectIdentifier,
    pub access_location: GeneralName<'a>,
}

pub type AuthorityInformationAccess<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, AccessDescription<'a>>,
    asn1::SequenceOfWriter<'a, AccessDescription<'a>>,
>;

// 5280 4.2.1.13 CRL Distribution Points / 4.2.1.15 Freshest CRL
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub enum DistributionPointName<'a> {
    #[implicit(0)]
    FullName(GeneralNames<'a>),
    #[implicit(1)]
    NameRelativeToCRLIssuer(crate::name::RelativeDistinguishedName<'a>),
}

#[derive(Clone)]
pub struct ReasonFlags<'a>(asn1::BitString<'a>);

impl<'a> asn1::SimpleAsn1Readable<'a> for ReasonFlags<'a> {
    const TAG: asn1::Tag = asn1::BitString::TAG;
    fn parse_data(data: &'a [u8]) -> asn1::ParseResult<Self> {
        Ok(ReasonFlags(asn1::BitString::parse_data(data)?))
    }
}
impl<'a> asn1::SimpleAsn1Writable for ReasonFlags<'a> {
    const TAG: asn1::Tag = asn1::BitString::TAG;
    fn write_data(&self, w: &mut asn1::WriteBuf) -> asn1::WriteResult {
        self.0.write_data(w)
    }
}

macro_rules! reason_bit {
    ($name:ident, $bit:literal) => {
        pub fn $name(&self) -> bool {
            self.0.has_bit_set($bit)
        }
    };
}

impl<'a> ReasonFlags<'a> {
    reason_bit!(key_compromise, 1);
    reason_bit!(ca_compromise, 2);
    reason_bit!(affiliation_changed, 3);
    reason_bit!(superseded, 4);
    reason_bit!(cessation_of_operation, 5);
    reason_bit!(certificate_hold, 6);
    reason_bit!(privilege_withdrawn, 7);
    reason_bit!(aa_compromise, 8);
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct DistributionPoint<'a> {
    #[explicit(0)]
    pub distribution_point: Option<DistributionPointName<'a>>,
    #[implicit(1)]
    pub reasons: Option<ReasonFlags<'a>>,
    #[implicit(2)]
    pub crl_issuer: Option<GeneralNames<'a>>,
}

pub type CRLDistributionPoints<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, DistributionPoint<'a>>,
    asn1::SequenceOfWriter<'a, DistributionPoint<'a>>,
>;

pub type FreshestCRL<'a> = CRLDistributionPoints<'a>;

/// RFC 5755 §4.3.2: constrains which attribute types an AA (and any AA
/// it delegates to) is authorized to assert.
#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AttrSpec<'a> {
    pub raw: Asn1ReadableOrWritable<
        'a,
        asn1::SequenceOf<'a, asn1::ObjectIdentifier>,
        asn1::SequenceOfWriter<'a, asn1::ObjectIdentifier>,
    >,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone)]
pub struct AAControls<'a> {
    pub path_len_constraint: Option<u64>,
    pub permitted_attrs: Option<AttrSpec<'a>>,
    pub excluded_attrs: Option<AttrSpec<'a>>,
    #[default(true)]
    pub permit_unspecified: bool,
}

pub fn dns_name_in(san: &GeneralNames<'_>, needle: &str) -> bool {
    match san {
        Asn1ReadableOrWritable::Read(v, _) => v.clone().any(|gn| match gn {
            GeneralName::DNSName(s) => s.as_str().eq_ignore_ascii_case(needle),
            _ => false,
        }),
        Asn1ReadableOrWritable::Write(_, _) => false,
    }
}

pub fn directory_name_in(names: &GeneralNames<'_>, needle: &Name<'_>) -> bool {
    match names {
        Asn1ReadableOrWritable::Read(v, _) => v.clone().any(|gn| match gn {
            GeneralName::DirectoryName(n) => crate::name::names_equal(&n, needle),
            _ => false,
        }),
        Asn1ReadableOrWritable::Write(_, _) => false,
    }
}
