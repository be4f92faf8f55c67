// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! X.501 `Name` and X.509 `GeneralName` (RFC 5280 §4.1.2.4 / §4.2.1.6).

use crate::common::{AttributeTypeValue, Asn1ReadableOrWritable, RawTlv};

pub type UnvalidatedIA5String<'a> = asn1::IA5String<'a>;

#[derive(asn1::Asn1Read, asn1::Asn1Write, Hash, PartialEq, Eq, Clone)]
pub struct RelativeDistinguishedName<'a>(
    pub Asn1ReadableOrWritable<
        'a,
        asn1::SetOf<'a, AttributeTypeValue<'a>>,
        asn1::SetOfWriter<'a, AttributeTypeValue<'a>>,
    >,
);

#[derive(asn1::Asn1Read, asn1::Asn1Write, Hash, PartialEq, Eq, Clone)]
pub struct Name<'a>(
    pub  Asn1ReadableOrWritable<
        'a,
        asn1::SequenceOf<'a, RelativeDistinguishedName<'a>>,
        asn1::SequenceOfWriter<'a, RelativeDistinguishedName<'a>>,
    >,
);

impl<'a> Name<'a> {
    /// The number of RDNs in this name.
    ///
    /// Only meaningful for a name obtained by parsing (the common case
    /// throughout path validation); a freshly-constructed `Name` used only
    /// for encoding reports zero.
    pub fn len(&self) -> usize {
        match &self.0 {
            Asn1ReadableOrWritable::Read(v, _) => v.clone().count(),
            Asn1ReadableOrWritable::Write(_, _) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// DER-level equality: two names are equal iff their encodings are
/// byte-identical. RFC 5280 §7.1 mandates a more forgiving string-prep
/// comparison for conformance, but DER equality is a safe, conservative
/// subset that the path-processing state machine relies on for
/// `working_issuer_name == cert.subject` checks (spec I2).
pub fn names_equal(a: &Name<'_>, b: &Name<'_>) -> bool {
    asn1::write_single(a).ok() == asn1::write_single(b).ok()
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone, Hash, PartialEq, Eq)]
pub struct OtherName<'a> {
    pub type_id: asn1::ObjectIdentifier,
    #[explicit(0)]
    pub value: RawTlv<'a>,
}

#[derive(asn1::Asn1Read, asn1::Asn1Write, Clone, Hash, PartialEq, Eq)]
pub enum GeneralName<'a> {
    #[implicit(0)]
    OtherName(OtherName<'a>),
    #[implicit(1)]
    RFC822Name(UnvalidatedIA5String<'a>),
    #[implicit(2)]
    DNSName(UnvalidatedIA5String<'a>),
    #[implicit(3)]
    X400Address(RawTlv<'a>),
    #[implicit(4)]
    DirectoryName(Name<'a>),
    #[implicit(5)]
    EDIPartyName(RawTlv<'a>),
    #[implicit(6)]
    UniformResourceIdentifier(UnvalidatedIA5String<'a>),
    #[implicit(7)]
    IPAddress(&'a [u8]),
    #[implicit(8)]
    RegisteredID(asn1::ObjectIdentifier),
}

pub type GeneralNames<'a> = Asn1ReadableOrWritable<
    'a,
    asn1::SequenceOf<'a, GeneralName<'a>>,
    asn1::SequenceOfWriter<'a, GeneralName<'a>>,
>;
