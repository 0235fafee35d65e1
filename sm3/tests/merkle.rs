//! Merkle tree tests.

#![cfg(feature = "alloc")]

use proptest::prelude::*;
use shangmi_sm3::merkle::{MerkleTree, NonMembership};

/// Sorted, unique leaves `leaf-0000`, `leaf-0002`, ... (even numbers only).
fn sorted_leaves(count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("leaf-{:04}", 2 * i).into_bytes())
        .collect()
}

#[test]
fn leaf_count_bounds_proofs() {
    for count in [1, 2, 7, 8] {
        let tree = MerkleTree::new(sorted_leaves(count)).unwrap();
        assert_eq!(tree.leaf_count(), count);
        assert!(tree.prove(count - 1).is_some());
        assert!(tree.prove(count).is_none());
    }
}

#[test]
fn proof_rejects_wrong_index() {
    let leaves = sorted_leaves(10);
    let tree = MerkleTree::new(&leaves).unwrap();
    let proof = tree.prove(3).unwrap();

    assert!(proof.verify(&tree.root(), &leaves[3]));
    assert!(!proof.verify(&tree.root(), &leaves[4]));
}

#[test]
fn proof_rejects_wrong_root() {
    let leaves = sorted_leaves(10);
    let tree = MerkleTree::new(&leaves).unwrap();
    let other = MerkleTree::new(sorted_leaves(11)).unwrap();

    assert!(!tree.prove(0).unwrap().verify(&other.root(), &leaves[0]));
}

#[test]
fn absence_between_neighbours() {
    let leaves = sorted_leaves(100);
    let tree = MerkleTree::new(&leaves).unwrap();
    let target = b"leaf-0051";

    let proof = tree.prove_absence(&leaves, target);
    match &proof {
        NonMembership::Absent {
            left: Some(left),
            right: Some(right),
        } => {
            assert_eq!(left.leaf, b"leaf-0050");
            assert_eq!(right.leaf, b"leaf-0052");
        }
        other => panic!("unexpected proof: {other:?}"),
    }
    assert!(proof.verify(&tree.root(), target));

    // the same proof says nothing about a value outside the gap
    assert!(!proof.verify(&tree.root(), b"leaf-0053"));
}

#[test]
fn absence_before_first_and_after_last() {
    let leaves = sorted_leaves(7);
    let tree = MerkleTree::new(&leaves).unwrap();

    let before = tree.prove_absence(&leaves, b"leaf");
    assert!(matches!(before, NonMembership::Absent { left: None, right: Some(_) }));
    assert!(before.verify(&tree.root(), b"leaf"));

    let after = tree.prove_absence(&leaves, b"leaf-9999");
    assert!(matches!(after, NonMembership::Absent { left: Some(_), right: None }));
    assert!(after.verify(&tree.root(), b"leaf-9999"));
}

#[test]
fn absence_proof_cannot_skip_leaves() {
    let leaves = sorted_leaves(8);
    let tree = MerkleTree::new(&leaves).unwrap();

    // claim nothing lies between leaf-0002 and leaf-0008
    let forged = NonMembership::Absent {
        left: match tree.prove_absence(&leaves, b"leaf-0003") {
            NonMembership::Absent { left, .. } => left,
            NonMembership::Present(_) => None,
        },
        right: match tree.prove_absence(&leaves, b"leaf-0007") {
            NonMembership::Absent { right, .. } => right,
            NonMembership::Present(_) => None,
        },
    };
    assert!(!forged.verify(&tree.root(), b"leaf-0005"));
}

#[test]
fn last_leaf_must_really_be_last() {
    let leaves = sorted_leaves(8);
    let tree = MerkleTree::new(&leaves).unwrap();

    // leaf 5 is not the greatest leaf, so it cannot bound values after it
    let forged = NonMembership::Absent {
        left: match tree.prove_absence(&leaves, b"leaf-0011") {
            NonMembership::Absent { left, .. } => left,
            NonMembership::Present(_) => None,
        },
        right: None,
    };
    assert!(!forged.verify(&tree.root(), b"leaf-0011"));
}

#[test]
fn present_value_yields_membership() {
    let leaves = sorted_leaves(5);
    let tree = MerkleTree::new(&leaves).unwrap();

    let proof = tree.prove_absence(&leaves, b"leaf-0004");
    match &proof {
        NonMembership::Present(inclusion) => {
            assert_eq!(inclusion.index(), 2);
            assert!(inclusion.verify(&tree.root(), b"leaf-0004"));
        }
        other => panic!("unexpected proof: {other:?}"),
    }
    assert!(!proof.verify(&tree.root(), b"leaf-0004"));
}

proptest! {
    #[test]
    fn all_inclusion_proofs_verify(count in 1usize..70) {
        let leaves = sorted_leaves(count);
        let tree = MerkleTree::new(&leaves).unwrap();
        for (index, leaf) in leaves.iter().enumerate() {
            prop_assert!(tree.prove(index).unwrap().verify(&tree.root(), leaf));
        }
    }

    #[test]
    fn odd_values_are_provably_absent(count in 1usize..70, probe in 0usize..140) {
        let leaves = sorted_leaves(count);
        let tree = MerkleTree::new(&leaves).unwrap();
        let target = format!("leaf-{:04}", 2 * probe + 1).into_bytes();
        prop_assert!(tree.prove_absence(&leaves, &target).verify(&tree.root(), &target));
    }
}
