use super::*;

/// External iteration over a collection of enumerated values.
///
/// The cursor is not part of a collection's contents: moving it never changes
/// what the collection holds. `rewind` may be called from any state,
/// including after exhaustion.
pub trait Cursor {
    /// Moves the cursor back to the first position.
    fn rewind(&mut self);
    /// Whether the cursor rests on an element. May move the cursor forward.
    fn valid(&mut self) -> bool;
    /// The cursor's position. May move the cursor forward.
    fn key(&mut self) -> usize;
    /// The element under the cursor, or `None` once exhausted. May move the cursor forward.
    fn current(&mut self) -> Option<EnumValue>;
    /// Advances the cursor by one position.
    fn next(&mut self);
}

/// Read access to a bit sequence stored as contiguous chunks.
/// Chunks past the last one returned are implicitly zero.
pub trait ChunkRead {
    fn get_chunk(&self, idx_of_chunk: usize) -> Option<Chunk>;
    ///////
    /// Subset order: `Less` if self is a proper subset of other, `None` if incomparable.
    fn index_cmp<A: ChunkRead + ?Sized>(&self, other: &A) -> Option<core::cmp::Ordering> {
        let mut ord = core::cmp::Ordering::Equal;
        use core::cmp::Ordering as O;
        for idx_of_chunk in 0.. {
            let s = self.get_chunk(idx_of_chunk);
            let o = other.get_chunk(idx_of_chunk);
            if s.is_none() && o.is_none() {
                return Some(ord);
            }
            let s = s.unwrap_or(0);
            let o = o.unwrap_or(0);

            let snoto = s & !o != 0;
            if snoto {
                // self has 1+ indices that other does not have
                ord = match ord {
                    O::Equal | O::Greater => O::Greater,
                    O::Less => return None,
                };
            }
            let onots = o & !s != 0;
            if onots {
                // other has 1+ indices that self does not have
                ord = match ord {
                    O::Equal | O::Less => O::Less,
                    O::Greater => return None,
                };
            }
        }
        unreachable!()
    }
    fn is_empty(&self) -> bool {
        self.iter_chunks().all(|chunk| chunk == 0)
    }
    fn iter_indexes(&self) -> IndexIter<'_, Self> {
        IndexIter::new(self)
    }
    fn iter_chunks(&self) -> ChunkIter<'_, Self> {
        ChunkIter::new(self)
    }
    fn count_indexes(&self) -> usize {
        self.iter_chunks().map(|chunk: Chunk| chunk.count_ones() as usize).sum()
    }
    fn contains_index(&self, bit_idx: Ordinal) -> bool {
        let cba = ChunkBitAddr::from_bit_idx(bit_idx);
        match self.get_chunk(cba.idx_of_chunk) {
            None => false,
            Some(chunk) => chunk & cba.chunk_mask() != 0,
        }
    }
    /// Smallest set index `>= from`, if any.
    fn next_index_from(&self, from: Ordinal) -> Option<Ordinal> {
        let cba = ChunkBitAddr::from_bit_idx(from);
        // drop the bits below `from` in its own chunk
        let mut chunk = self.get_chunk(cba.idx_of_chunk)? & !(cba.chunk_mask() - 1);
        let mut idx_of_chunk = cba.idx_of_chunk;
        while chunk == 0 {
            idx_of_chunk += 1;
            chunk = self.get_chunk(idx_of_chunk)?;
        }
        Some(ChunkBitAddr { idx_of_chunk, idx_in_chunk: chunk.trailing_zeros() }.to_bit_idx())
    }
    fn display(&self) -> DisplayableIndexSet<'_, Self> {
        DisplayableIndexSet(self)
    }
    fn combine_chunks<'a, B: ChunkRead + ?Sized, O: BinChunkOp>(
        &'a self,
        b: &'a B,
        op: O,
    ) -> CombinedChunks<'a, Self, B, O> {
        op.combine_readers(self, b)
    }
}
