//! Merkle trees over SM3 with [RFC 6962] domain separation.
//!
//! ```text
//! leaf hash = SM3(0x00 || leaf)
//! node hash = SM3(0x01 || left || right)
//! ```
//!
//! A level with an odd number of nodes pairs its last node with itself.
//!
//! ## Usage
//!
//! ```
//! use shangmi_sm3::merkle::MerkleTree;
//!
//! let leaves: [&[u8]; 3] = [b"alpha", b"bravo", b"charlie"];
//! let tree = MerkleTree::new(leaves).unwrap();
//!
//! let proof = tree.prove(2).unwrap();
//! assert!(proof.verify(&tree.root(), b"charlie"));
//! assert!(!proof.verify(&tree.root(), b"delta"));
//! ```
//!
//! [RFC 6962]: https://datatracker.ietf.org/doc/html/rfc6962#section-2.1

use crate::{Hash, Sm3};
use alloc::vec::Vec;

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

/// Hash a leaf.
pub fn leaf_hash(leaf: &[u8]) -> Hash {
    Sm3::new().chain([LEAF_PREFIX]).chain(leaf).finalize()
}

/// Hash an interior node from its children.
pub fn node_hash(left: &Hash, right: &Hash) -> Hash {
    Sm3::new()
        .chain([NODE_PREFIX])
        .chain(left)
        .chain(right)
        .finalize()
}

/// Merkle tree holding every level from the leaf hashes up to the root.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Build a tree over `leaves`.
    ///
    /// Returns `None` if there are no leaves.
    pub fn new<I>(leaves: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let base: Vec<Hash> = leaves
            .into_iter()
            .map(|leaf| leaf_hash(leaf.as_ref()))
            .collect();

        if base.is_empty() {
            return None;
        }

        let mut levels = Vec::new();
        levels.push(base);

        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let parent = level
                .chunks(2)
                .map(|pair| node_hash(&pair[0], pair.get(1).unwrap_or(&pair[0])))
                .collect();
            levels.push(parent);
        }

        Some(Self { levels })
    }

    /// Root hash.
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Produce an inclusion proof for the leaf at `index`.
    pub fn prove(&self, index: usize) -> Option<InclusionProof> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.levels.len() - 1);
        let mut position = index;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = if position % 2 == 0 {
                // an unpaired node is its own sibling
                level.get(position + 1).unwrap_or(&level[position])
            } else {
                &level[position - 1]
            };
            siblings.push(*sibling);
            position /= 2;
        }

        Some(InclusionProof { index, siblings })
    }

    /// Prove that `target` is absent from a tree built over `leaves`.
    ///
    /// `leaves` must be the lexicographically sorted, deduplicated leaves the
    /// tree was built from. If `target` is one of them its inclusion proof is
    /// returned instead.
    pub fn prove_absence<T: AsRef<[u8]>>(&self, leaves: &[T], target: &[u8]) -> NonMembership {
        let position = leaves.partition_point(|leaf| leaf.as_ref() < target);

        if leaves.get(position).is_some_and(|leaf| leaf.as_ref() == target) {
            return match self.prove(position) {
                Some(proof) => NonMembership::Present(proof),
                None => NonMembership::Absent {
                    left: None,
                    right: None,
                },
            };
        }

        let neighbour = |index: usize| {
            let leaf = leaves.get(index)?;
            let proof = self.prove(index)?;
            Some(Neighbour {
                leaf: leaf.as_ref().to_vec(),
                proof,
            })
        };

        NonMembership::Absent {
            left: position.checked_sub(1).and_then(neighbour),
            right: neighbour(position),
        }
    }
}

/// Proof that a leaf is included in a tree with a given root.
///
/// The sibling order is implied by the bits of the leaf index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InclusionProof {
    index: usize,
    siblings: Vec<Hash>,
}

impl InclusionProof {
    /// Index of the leaf this proof is for.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sibling hashes from the leaf level upwards.
    pub fn siblings(&self) -> &[Hash] {
        &self.siblings
    }

    /// Check that `leaf` sits at [`InclusionProof::index`] in the tree with
    /// the given `root`.
    pub fn verify(&self, root: &Hash, leaf: &[u8]) -> bool {
        self.fold(leaf).is_some_and(|(node, _)| node == *root)
    }

    /// Recompute the root, also reporting whether the leaf is the last one
    /// of its tree.
    ///
    /// A node is the last one of its level exactly when its parent is the
    /// last one and, when it is a left child, it was paired with itself.
    fn fold(&self, leaf: &[u8]) -> Option<(Hash, bool)> {
        let mut node = leaf_hash(leaf);
        let mut position = self.index;
        let mut last = true;

        for sibling in &self.siblings {
            node = if position % 2 == 0 {
                last &= *sibling == node;
                node_hash(&node, sibling)
            } else {
                node_hash(sibling, &node)
            };
            position /= 2;
        }

        // index bits beyond the path length are not covered by the proof
        (position == 0).then_some((node, last))
    }
}

/// A leaf adjacent to an absent value, with its inclusion proof.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Neighbour {
    /// Leaf bytes.
    pub leaf: Vec<u8>,

    /// Inclusion proof for [`Neighbour::leaf`].
    pub proof: InclusionProof,
}

/// Membership or non-membership proof for a sorted tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NonMembership {
    /// The value is a leaf of the tree.
    Present(InclusionProof),

    /// The value falls strictly between two adjacent leaves, or before the
    /// first leaf, or after the last one.
    Absent {
        /// Greatest leaf smaller than the value.
        left: Option<Neighbour>,

        /// Smallest leaf greater than the value.
        right: Option<Neighbour>,
    },
}

impl NonMembership {
    /// Check that this proves `target` absent from the tree with `root`.
    ///
    /// Returns `false` for a [`NonMembership::Present`] proof.
    pub fn verify(&self, root: &Hash, target: &[u8]) -> bool {
        let (left, right) = match self {
            Self::Present(_) => return false,
            Self::Absent { left, right } => (left, right),
        };

        let check = |neighbour: &Neighbour| {
            neighbour
                .proof
                .fold(&neighbour.leaf)
                .filter(|(node, _)| node == root)
                .map(|(_, last)| last)
        };

        match (left, right) {
            (Some(left), Some(right)) => {
                check(left).is_some()
                    && check(right).is_some()
                    && right.proof.index == left.proof.index + 1
                    && left.leaf.as_slice() < target
                    && target < right.leaf.as_slice()
            }
            (None, Some(right)) => {
                check(right).is_some() && right.proof.index == 0 && target < right.leaf.as_slice()
            }
            (Some(left), None) => {
                check(left) == Some(true) && left.leaf.as_slice() < target
            }
            (None, None) => false,
        }
    }
}
