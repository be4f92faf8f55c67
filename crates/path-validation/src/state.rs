// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! Per-traversal state (spec §3 "Path State", "Processing State").

use crate::name_constraints::NameConstraintSet;
use crate::ops::CryptoOps;
use crate::policy_tree::PolicyTree;

/// `PathState`: the RFC 5280 §6.1.2 working state, carried across the
/// per-certificate loop in `PathValidator::validate` (spec I1-I4).
pub struct PathState<B: CryptoOps> {
    pub valid_policy_tree: PolicyTree,
    pub explicit_policy: u32,
    pub inhibit_any_policy: u32,
    pub policy_mapping: u32,
    pub max_path_length: u8,
    pub max_aa_path_length: u8,
    pub working_public_key: B::Key,
    pub working_issuer_name: Vec<u8>,
    pub name_constraints: NameConstraintSet,
    pub aa_controls_used: bool,
}

/// One path on the recursion-guard stack (spec §5 "Recursion bound").
/// CRL-issuer chain validation pushes an entry here so that a candidate
/// CRL-issuer certificate already under validation higher up is skipped
/// rather than recursed into again.
#[derive(Clone)]
pub struct PathStackEntry {
    /// DER-encoded `tbsCertificate.subject` of every certificate in the
    /// path currently being validated, trust anchor first.
    pub subjects: Vec<Vec<u8>>,
    /// SHA-256 digest of each certificate's DER encoding, for the
    /// recursion guard's "already on the stack" test (spec §4.5 step 2b
    /// "PKITS-compatible recursion guard").
    pub cert_digests: Vec<[u8; 32]>,
}

impl PathStackEntry {
    pub fn contains_digest(&self, digest: &[u8; 32]) -> bool {
        self.cert_digests.iter().any(|d| d == digest)
    }
}

/// `ProcessingState`: per-traversal bookkeeping that isn't part of the
/// RFC 5280 working state proper (spec §3 "Processing State").
#[derive(Clone, Default)]
pub struct ProcessingState {
    pub current_index: usize,
    /// Overrides the end-entity name used in diagnostics when this
    /// traversal is a CRL-issuer or AA sub-validation (spec §4.5:
    /// `"<target> CRL issuer"`).
    pub end_entity_name_override: Option<String>,
    pub path_stack: Vec<PathStackEntry>,
    /// True when this traversal is itself a side-validation launched by
    /// C5/C7 rather than the caller's top-level request (spec §3).
    pub side_validation: bool,
}

impl ProcessingState {
    pub fn top_level() -> Self {
        Self::default()
    }

    /// A child processing state for a CRL-issuer or AA sub-validation:
    /// extends the path stack so the new traversal's own recursion guard
    /// sees everything already in progress (spec §4.5, §5).
    pub fn for_side_validation(&self, label: String, extra_stack_entry: PathStackEntry) -> Self {
        let mut path_stack = self.path_stack.clone();
        path_stack.push(extra_stack_entry);
        ProcessingState {
            current_index: 0,
            end_entity_name_override: Some(label),
            path_stack,
            side_validation: true,
        }
    }

    /// Spec §5 "Recursion bound": true if `digest` already appears in any
    /// path on the stack.
    pub fn is_recursive(&self, digest: &[u8; 32]) -> bool {
        self.path_stack.iter().any(|e| e.contains_digest(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_has_empty_stack_and_is_never_recursive() {
        let state = ProcessingState::top_level();
        assert!(state.path_stack.is_empty());
        assert!(!state.is_recursive(&[1u8; 32]));
    }

    #[test]
    fn test_side_validation_extends_stack_and_flags_recursion() {
        let top = ProcessingState::top_level();
        let entry = PathStackEntry {
            subjects: vec![b"root".to_vec(), b"ica".to_vec()],
            cert_digests: vec![[9u8; 32], [7u8; 32]],
        };
        let child = top.for_side_validation("target CRL issuer".to_string(), entry);

        assert!(child.side_validation);
        assert_eq!(child.end_entity_name_override.as_deref(), Some("target CRL issuer"));
        assert!(child.is_recursive(&[7u8; 32]));
        assert!(!child.is_recursive(&[1u8; 32]));

        // Spec §5 "Recursion guard: no certificate is path-validated more
        // than once on any single CRL-resolution stack" — a grandchild
        // side-validation still sees everything the parent pushed.
        let grandchild_entry = PathStackEntry {
            subjects: vec![b"leaf".to_vec()],
            cert_digests: vec![[3u8; 32]],
        };
        let grandchild = child.for_side_validation("nested".to_string(), grandchild_entry);
        assert!(grandchild.is_recursive(&[7u8; 32]));
        assert!(grandchild.is_recursive(&[3u8; 32]));
    }
}
