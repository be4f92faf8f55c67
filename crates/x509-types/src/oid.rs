// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Object identifiers used throughout the PKIX data model.

use asn1::{oid, ObjectIdentifier};

// Digest algorithms.
pub const SHA1_OID: ObjectIdentifier = oid!(1, 3, 14, 3, 2, 26);
pub const SHA224_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 4);
pub const SHA256_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 1);
pub const SHA384_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 2);
pub const SHA512_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 3);
pub const SHA3_224_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 7);
pub const SHA3_256_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 8);
pub const SHA3_384_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 9);
pub const SHA3_512_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 2, 10);

pub const MGF1_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 8);

// Public-key / signature algorithms.
pub const RSA_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 1);
pub const RSASSA_PSS_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 10);
pub const EC_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 2, 1);
pub const EC_SECP256R1: ObjectIdentifier = oid!(1, 2, 840, 10045, 3, 1, 7);
pub const EC_SECP384R1: ObjectIdentifier = oid!(1, 3, 132, 0, 34);
pub const EC_SECP521R1: ObjectIdentifier = oid!(1, 3, 132, 0, 35);
pub const ED25519_OID: ObjectIdentifier = oid!(1, 3, 101, 112);
pub const ED448_OID: ObjectIdentifier = oid!(1, 3, 101, 113);
pub const DSA_OID: ObjectIdentifier = oid!(1, 2, 840, 10040, 4, 1);

pub const ECDSA_WITH_SHA224_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 4, 3, 1);
pub const ECDSA_WITH_SHA256_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 4, 3, 2);
pub const ECDSA_WITH_SHA384_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 4, 3, 3);
pub const ECDSA_WITH_SHA512_OID: ObjectIdentifier = oid!(1, 2, 840, 10045, 4, 3, 4);
pub const ECDSA_WITH_SHA3_224_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 9);
pub const ECDSA_WITH_SHA3_256_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 10);
pub const ECDSA_WITH_SHA3_384_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 11);
pub const ECDSA_WITH_SHA3_512_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 12);

pub const RSA_WITH_SHA1_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 5);
pub const RSA_WITH_SHA1_ALT_OID: ObjectIdentifier = oid!(1, 3, 14, 3, 2, 29);
pub const RSA_WITH_SHA224_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 14);
pub const RSA_WITH_SHA256_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 11);
pub const RSA_WITH_SHA384_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 12);
pub const RSA_WITH_SHA512_OID: ObjectIdentifier = oid!(1, 2, 840, 113549, 1, 1, 13);
pub const RSA_WITH_SHA3_224_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 13);
pub const RSA_WITH_SHA3_256_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 14);
pub const RSA_WITH_SHA3_384_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 15);
pub const RSA_WITH_SHA3_512_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 16);

pub const DSA_WITH_SHA224_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 1);
pub const DSA_WITH_SHA256_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 2);
pub const DSA_WITH_SHA384_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 3);
pub const DSA_WITH_SHA512_OID: ObjectIdentifier = oid!(2, 16, 840, 1, 101, 3, 4, 3, 4);

// Certificate extensions (RFC 5280 §4.2).
pub const SUBJECT_DIRECTORY_ATTRIBUTES_OID: ObjectIdentifier = oid!(2, 5, 29, 9);
pub const SUBJECT_KEY_IDENTIFIER_OID: ObjectIdentifier = oid!(2, 5, 29, 14);
pub const KEY_USAGE_OID: ObjectIdentifier = oid!(2, 5, 29, 15);
pub const SUBJECT_ALTERNATIVE_NAME_OID: ObjectIdentifier = oid!(2, 5, 29, 17);
pub const ISSUER_ALTERNATIVE_NAME_OID: ObjectIdentifier = oid!(2, 5, 29, 18);
pub const BASIC_CONSTRAINTS_OID: ObjectIdentifier = oid!(2, 5, 29, 19);
pub const NAME_CONSTRAINTS_OID: ObjectIdentifier = oid!(2, 5, 29, 30);
pub const CRL_DISTRIBUTION_POINTS_OID: ObjectIdentifier = oid!(2, 5, 29, 31);
pub const CERTIFICATE_POLICIES_OID: ObjectIdentifier = oid!(2, 5, 29, 32);
pub const ANY_POLICY_OID: ObjectIdentifier = oid!(2, 5, 29, 32, 0);
pub const POLICY_MAPPINGS_OID: ObjectIdentifier = oid!(2, 5, 29, 33);
pub const AUTHORITY_KEY_IDENTIFIER_OID: ObjectIdentifier = oid!(2, 5, 29, 35);
pub const POLICY_CONSTRAINTS_OID: ObjectIdentifier = oid!(2, 5, 29, 36);
pub const EXTENDED_KEY_USAGE_OID: ObjectIdentifier = oid!(2, 5, 29, 37);
pub const FRESHEST_CRL_OID: ObjectIdentifier = oid!(2, 5, 29, 46);
pub const INHIBIT_ANY_POLICY_OID: ObjectIdentifier = oid!(2, 5, 29, 54);
pub const AUTHORITY_INFORMATION_ACCESS_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 1, 1);
pub const SUBJECT_INFORMATION_ACCESS_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 1, 11);
pub const OCSP_NO_CHECK_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 48, 1, 5);
/// RFC 5755 §4.3.2 Attribute Certificate (AA) Controls.
pub const AA_CONTROLS_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 1, 6);

// Extended key usages.
pub const EKU_ANY_OID: ObjectIdentifier = oid!(2, 5, 29, 37, 0);
pub const EKU_SERVER_AUTH_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 3, 1);
pub const EKU_CLIENT_AUTH_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 3, 2);
pub const EKU_CODE_SIGNING_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 3, 3);
pub const EKU_EMAIL_PROTECTION_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 3, 4);
pub const EKU_TIME_STAMPING_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 3, 8);
pub const EKU_OCSP_SIGNING_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 3, 9);

// AIA / SIA access methods.
pub const AD_OCSP_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 48, 1);
pub const AD_CA_ISSUERS_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 48, 2);

// CRL extensions (RFC 5280 §5.2).
pub const CRL_NUMBER_OID: ObjectIdentifier = oid!(2, 5, 29, 20);
pub const DELTA_CRL_INDICATOR_OID: ObjectIdentifier = oid!(2, 5, 29, 27);
pub const ISSUING_DISTRIBUTION_POINT_OID: ObjectIdentifier = oid!(2, 5, 29, 28);

// CRL entry extensions (RFC 5280 §5.3).
pub const CRL_REASON_OID: ObjectIdentifier = oid!(2, 5, 29, 21);
pub const HOLD_INSTRUCTION_CODE_OID: ObjectIdentifier = oid!(2, 5, 29, 23);
pub const INVALIDITY_DATE_OID: ObjectIdentifier = oid!(2, 5, 29, 24);
pub const CERTIFICATE_ISSUER_OID: ObjectIdentifier = oid!(2, 5, 29, 29);

// RFC 5755 attribute-certificate extensions.
pub const TARGET_INFORMATION_OID: ObjectIdentifier = oid!(2, 5, 29, 55);
pub const NO_REV_AVAIL_OID: ObjectIdentifier = oid!(2, 5, 29, 56);
pub const AUDIT_IDENTITY_OID: ObjectIdentifier = oid!(1, 3, 6, 1, 5, 5, 7, 1, 4);
