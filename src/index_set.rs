use super::{Chunk, ChunkRead};
use crate::index_count_to_chunk_count;
use crate::ChunkBitAddr;
use crate::Ordinal;
use crate::CHUNK_BITS;
use core::fmt::Debug;
use core::ops::RangeTo;
use smallvec::SmallVec;

/// Stores a set of indices in a contiguous array of bits packed into Chunks.
///
/// The index capacity is fixed at construction. Sets whose capacity fits one
/// Chunk keep it inline, larger ones on the heap.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct IndexSet {
    // invariants:
    // chunks.len() == index_count_to_chunk_count(index_capacity)
    // no bit at or beyond index_capacity is set
    chunks: SmallVec<[Chunk; 1]>,
    index_capacity: usize,
}
impl Debug for IndexSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_set().entries(self.iter_indexes()).finish()
    }
}
impl IndexSet {
    /// Creates an empty IndexSet able to hold indices in `..index_capacity`.
    pub fn with_capacity(index_capacity: usize) -> Self {
        let chunks = SmallVec::from_elem(0, index_count_to_chunk_count(index_capacity));
        Self { chunks, index_capacity }
    }
    /// Creates an IndexSet from a sequence of contiguous chunks.
    /// Chunks beyond the capacity, and bits at or beyond it, are dropped.
    pub fn from_chunk_iter<I: IntoIterator<Item = Chunk>>(index_capacity: usize, it: I) -> Self {
        let mut me = Self::with_capacity(index_capacity);
        for (dest, src) in me.chunks.iter_mut().zip(it) {
            *dest = src;
        }
        me.mask_tail();
        me
    }
    /// Returns the IndexSet's index capacity.
    pub fn capacity(&self) -> RangeTo<usize> {
        ..self.index_capacity
    }
    /// Returns the IndexSet's chunk capacity
    pub fn chunk_capacity(&self) -> usize {
        self.chunks.len()
    }
    /// Returns an immutable slice of the stored Chunks
    pub fn as_chunks(&self) -> &[Chunk] {
        &self.chunks
    }
    /// Adds the given index to the set. Returns whether it was absent before i.e. the set has changed.
    pub fn insert(&mut self, bit_idx: Ordinal) -> bool {
        assert!(bit_idx < self.index_capacity, "index {bit_idx} beyond capacity {}", self.index_capacity);
        let cba = ChunkBitAddr::from_bit_idx(bit_idx);
        let chunk = &mut self.chunks[cba.idx_of_chunk];
        let was_unset = *chunk & cba.chunk_mask() == 0;
        *chunk |= cba.chunk_mask();
        was_unset
    }
    /// Removes the given index from the set. Returns whether it was present before i.e. the set has changed.
    pub fn remove(&mut self, index: Ordinal) -> bool {
        let cba = ChunkBitAddr::from_bit_idx(index);
        self.chunks
            .get_mut(cba.idx_of_chunk)
            .map(|chunk| {
                let was_set = *chunk & cba.chunk_mask() != 0;
                *chunk &= !cba.chunk_mask();
                was_set
            })
            .unwrap_or(false)
    }
    /// Leaves capacity unchanged. Afterwards, contains no indexes
    pub fn clear(&mut self) {
        for chunk in self.chunks.iter_mut() {
            *chunk = 0;
        }
    }
    /// Inserts every index below the capacity.
    pub fn fill(&mut self) {
        for chunk in self.chunks.iter_mut() {
            *chunk = !0;
        }
        self.mask_tail();
    }
    // restores the invariant that no bit at or beyond index_capacity is set
    fn mask_tail(&mut self) {
        let used_in_last = self.index_capacity % CHUNK_BITS;
        if used_in_last != 0 {
            if let Some(last) = self.chunks.last_mut() {
                *last &= !(Chunk::MAX << used_in_last);
            }
        }
    }
}
impl ChunkRead for IndexSet {
    fn get_chunk(&self, idx_of_chunk: usize) -> Option<Chunk> {
        self.chunks.get(idx_of_chunk).copied()
    }
}
