// This file is dual licensed under the terms of the Apache License, Version
// 2.0, and the BSD License. See the LICENSE file in the root of this repository
// for complete details.

//! C3: the RFC 5280 §6.1.2(a)(1)/§6.1.3(d) valid-policy tree.

use std::collections::HashSet;

use asn1::ObjectIdentifier;

pub const ANY_POLICY: &str = "2.5.29.32.0";

fn any_policy_oid() -> ObjectIdentifier {
    asn1::oid!(2, 5, 29, 32, 0)
}

#[derive(Debug, Clone)]
pub struct PolicyNode {
    pub valid_policy: ObjectIdentifier,
    pub qualifiers: Vec<Vec<u8>>,
    pub expected_policies: HashSet<ObjectIdentifier>,
    pub children: Vec<PolicyNode>,
}

impl PolicyNode {
    fn leaf_any(depth_expected: HashSet<ObjectIdentifier>) -> Self {
        PolicyNode {
            valid_policy: any_policy_oid(),
            qualifiers: Vec::new(),
            expected_policies: depth_expected,
            children: Vec::new(),
        }
    }
}

/// The valid-policy tree, or `None` once it has become null (spec
/// invariant I4: once null, it stays null).
#[derive(Debug, Clone, Default)]
pub struct PolicyTree {
    root: Option<PolicyNode>,
}

impl PolicyTree {
    /// `init()`: root node `{policy = any_policy, qualifiers = ∅, expected = ∅}`.
    pub fn init() -> Self {
        PolicyTree {
            root: Some(PolicyNode::leaf_any(HashSet::new())),
        }
    }

    pub fn is_null(&self) -> bool {
        self.root.is_none()
    }

    fn set_null(&mut self) {
        self.root = None;
    }

    /// Step 2d: process a certificate's `certificatePolicies`. `policies`
    /// is `None` when the extension is absent, which makes the tree null
    /// unconditionally (spec §4.4 step 2f: "if the cert carries no
    /// policies the tree becomes null").
    pub fn update(
        &mut self,
        policies: Option<&[(ObjectIdentifier, Vec<Vec<u8>>)]>,
        _depth: u32,
        any_policy_uninhibited: bool,
    ) {
        let Some(policies) = policies else {
            self.set_null();
            return;
        };
        let Some(root) = self.root.take() else {
            return;
        };

        let has_any_policy = policies.iter().any(|(oid, _)| oid == &any_policy_oid());
        let mut leaves = Vec::new();
        collect_leaves(&root, &mut leaves);

        let mut new_leaves: Vec<PolicyNode> = Vec::new();
        for (oid, qualifiers) in policies {
            if oid == &any_policy_oid() {
                continue;
            }
            // A leaf whose expected_policies contains this OID (via a
            // mapping) becomes its child; otherwise, if any_policy is
            // present in the certificate (or inherited) and unprocessed,
            // attach as a child of any matching any_policy leaf.
            let mut attached = false;
            for leaf in leaves.iter() {
                if leaf.expected_policies.contains(oid) || leaf.valid_policy == *oid {
                    new_leaves.push(PolicyNode {
                        valid_policy: oid.clone(),
                        qualifiers: qualifiers.clone(),
                        expected_policies: HashSet::from([oid.clone()]),
                        children: Vec::new(),
                    });
                    attached = true;
                }
            }
            if !attached && has_any_policy {
                new_leaves.push(PolicyNode {
                    valid_policy: oid.clone(),
                    qualifiers: qualifiers.clone(),
                    expected_policies: HashSet::from([oid.clone()]),
                    children: Vec::new(),
                });
            }
        }

        if has_any_policy && any_policy_uninhibited {
            new_leaves.push(PolicyNode::leaf_any(HashSet::new()));
        }

        if new_leaves.is_empty() {
            self.set_null();
        } else {
            self.root = Some(PolicyNode {
                valid_policy: any_policy_oid(),
                qualifiers: Vec::new(),
                expected_policies: HashSet::new(),
                children: new_leaves,
            });
        }
    }

    /// Step 3b: apply a set of `(issuer_domain_policy, subject_domain_policy)`
    /// mappings to the current leaves' `expected_policies`.
    pub fn apply_mapping(
        &mut self,
        mappings: &[(ObjectIdentifier, ObjectIdentifier)],
        _depth: u32,
        policy_mapping_uninhibited: bool,
    ) {
        if !policy_mapping_uninhibited || mappings.is_empty() {
            return;
        }
        let Some(root) = self.root.as_mut() else {
            return;
        };
        let mut leaves = Vec::new();
        collect_leaves_mut(root, &mut leaves);
        for (issuer_policy, subject_policy) in mappings {
            for leaf in leaves.iter_mut() {
                if leaf.valid_policy == *issuer_policy {
                    leaf.expected_policies.insert(subject_policy.clone());
                }
            }
        }
    }

    /// Step 4g(iii): prune any leaf whose `valid_policy` is not in
    /// `acceptable_set`, and any node left with no surviving children.
    pub fn prune_unacceptable(&mut self, acceptable_set: &HashSet<ObjectIdentifier>) {
        let Some(root) = self.root.take() else {
            return;
        };
        match prune_node(root, acceptable_set) {
            Some(pruned) => self.root = Some(pruned),
            None => self.set_null(),
        }
    }

    /// `enumerate_leaves(depth)`: the current frontier of the tree.
    pub fn enumerate_leaves(&self) -> Vec<&PolicyNode> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            collect_leaves(root, &mut out);
        }
        out
    }

    pub fn root_policy_is_any(&self) -> bool {
        self.root
            .as_ref()
            .map(|r| r.valid_policy == any_policy_oid())
            .unwrap_or(false)
    }
}

fn collect_leaves<'a>(node: &'a PolicyNode, out: &mut Vec<&'a PolicyNode>) {
    if node.children.is_empty() {
        out.push(node);
    } else {
        for child in &node.children {
            collect_leaves(child, out);
        }
    }
}

fn collect_leaves_mut<'a>(node: &'a mut PolicyNode, out: &mut Vec<&'a mut PolicyNode>) {
    if node.children.is_empty() {
        out.push(node);
    } else {
        for child in node.children.iter_mut() {
            collect_leaves_mut(child, out);
        }
    }
}

fn prune_node(mut node: PolicyNode, acceptable: &HashSet<ObjectIdentifier>) -> Option<PolicyNode> {
    if node.children.is_empty() {
        return if node.valid_policy == any_policy_oid() || acceptable.contains(&node.valid_policy) {
            Some(node)
        } else {
            None
        };
    }
    node.children = node
        .children
        .into_iter()
        .filter_map(|c| prune_node(c, acceptable))
        .collect();
    if node.children.is_empty() {
        None
    } else {
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_policy_oid() -> ObjectIdentifier {
        asn1::oid!(1, 2, 3, 4)
    }

    fn other_policy_oid() -> ObjectIdentifier {
        asn1::oid!(9, 9, 9, 9)
    }

    #[test]
    fn test_init_is_any_policy_root() {
        let tree = PolicyTree::init();
        assert!(!tree.is_null());
        assert!(tree.root_policy_is_any());
    }

    #[test]
    fn test_missing_policies_nulls_tree() {
        let mut tree = PolicyTree::init();
        tree.update(None, 1, true);
        assert!(tree.is_null());
    }

    #[test]
    fn test_null_tree_stays_null_through_update() {
        let mut tree = PolicyTree::init();
        tree.update(None, 1, true);
        assert!(tree.is_null());
        tree.update(Some(&[(test_policy_oid(), Vec::new())]), 2, true);
        assert!(tree.is_null());
    }

    #[test]
    fn test_update_with_explicit_policy_attaches_under_any() {
        let mut tree = PolicyTree::init();
        tree.update(Some(&[(test_policy_oid(), Vec::new())]), 1, true);
        assert!(!tree.is_null());
        let leaves = tree.enumerate_leaves();
        assert!(leaves.iter().any(|l| l.valid_policy == test_policy_oid()));
    }

    #[test]
    fn test_prune_unacceptable_nulls_when_nothing_survives() {
        let mut tree = PolicyTree::init();
        tree.update(Some(&[(test_policy_oid(), Vec::new())]), 1, true);
        let acceptable = HashSet::from([other_policy_oid()]);
        tree.prune_unacceptable(&acceptable);
        assert!(tree.is_null());
    }

    proptest::proptest! {
        // Testable property (spec §8): "policy-tree absorption: once null,
        // it stays null for the remainder of the traversal."
        #[test]
        fn prop_null_tree_absorbs_any_subsequent_step(
            has_policies in proptest::bool::ANY,
            any_policy_uninhibited in proptest::bool::ANY,
            policy_mapping_uninhibited in proptest::bool::ANY,
            prune_empty in proptest::bool::ANY,
        ) {
            let mut tree = PolicyTree::init();
            tree.update(None, 1, true);
            proptest::prop_assert!(tree.is_null());

            let policies = [(test_policy_oid(), Vec::new())];
            tree.update(has_policies.then_some(&policies[..]), 2, any_policy_uninhibited);
            proptest::prop_assert!(tree.is_null());

            tree.apply_mapping(&[(test_policy_oid(), other_policy_oid())], 2, policy_mapping_uninhibited);
            proptest::prop_assert!(tree.is_null());

            let acceptable = if prune_empty {
                HashSet::new()
            } else {
                HashSet::from([test_policy_oid()])
            };
            tree.prune_unacceptable(&acceptable);
            proptest::prop_assert!(tree.is_null());
        }
    }
}
