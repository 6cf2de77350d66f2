//! NodeMask — a fixed-width bitmap over cluster node indices.
//!
//! Availability and membership sets are passed around as `NodeMask`
//! values: one bit per node slot in the [`crate::types::NodeTable`].
//! Masks are plain values; intersecting or unioning them never touches
//! the node table itself.

use serde::{Deserialize, Serialize};

const BITS_PER_BLOCK: usize = 64;

/// Bitmap over node indices `0..len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMask {
    blocks: Vec<u64>,
    len: usize,
}

impl NodeMask {
    /// An empty mask covering `len` node slots.
    pub fn new(len: usize) -> Self {
        Self {
            blocks: vec![0; len.div_ceil(BITS_PER_BLOCK)],
            len,
        }
    }

    /// A mask covering `len` node slots with every bit set.
    pub fn full(len: usize) -> Self {
        let mut mask = Self::new(len);
        for idx in 0..len {
            mask.set(idx);
        }
        mask
    }

    /// Number of node slots this mask covers (not the number of set bits).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Set the bit for `idx`. Out-of-range indices are ignored.
    pub fn set(&mut self, idx: usize) {
        if idx < self.len {
            self.blocks[idx / BITS_PER_BLOCK] |= 1 << (idx % BITS_PER_BLOCK);
        }
    }

    /// Clear the bit for `idx`. Out-of-range indices are ignored.
    pub fn clear(&mut self, idx: usize) {
        if idx < self.len {
            self.blocks[idx / BITS_PER_BLOCK] &= !(1 << (idx % BITS_PER_BLOCK));
        }
    }

    /// Whether the bit for `idx` is set.
    pub fn test(&self, idx: usize) -> bool {
        idx < self.len && (self.blocks[idx / BITS_PER_BLOCK] >> (idx % BITS_PER_BLOCK)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Keep only the bits also set in `other`.
    pub fn intersect(&mut self, other: &NodeMask) {
        for (block, o) in self.blocks.iter_mut().zip(&other.blocks) {
            *block &= o;
        }
        for block in self.blocks.iter_mut().skip(other.blocks.len()) {
            *block = 0;
        }
    }

    /// Add every bit set in `other`.
    pub fn union(&mut self, other: &NodeMask) {
        for (block, o) in self.blocks.iter_mut().zip(&other.blocks) {
            *block |= o;
        }
    }

    /// Clear every bit set in `other`.
    pub fn subtract(&mut self, other: &NodeMask) {
        for (block, o) in self.blocks.iter_mut().zip(&other.blocks) {
            *block &= !o;
        }
    }

    /// Iterator over set bit indices, ascending.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|idx| self.test(*idx))
    }

    /// A mask holding the first `n` set bits of this one, or `None` if
    /// fewer than `n` bits are set.
    pub fn first_set(&self, n: usize) -> Option<NodeMask> {
        let mut out = NodeMask::new(self.len);
        let mut taken = 0;
        for idx in self.iter_set() {
            if taken == n {
                break;
            }
            out.set(idx);
            taken += 1;
        }
        (taken == n).then_some(out)
    }
}
