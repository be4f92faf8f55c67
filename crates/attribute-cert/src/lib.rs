// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C7: RFC 5755 attribute-certificate validation (spec §4.7), built on
//! top of this workspace's C4 path-validation core and C6 revocation
//! combinator.

pub mod attribute_authority;
pub mod error;
pub mod holder;
pub mod targeting;
pub mod validator;

pub use attribute_authority::{find_validated_aa_path, AaPathSource};
pub use error::{AcValidationError, HolderField};
pub use holder::match_holder;
pub use targeting::check_targeting;
pub use validator::{validate_attribute_certificate, AcValidationRequest, AcValidationResult};
