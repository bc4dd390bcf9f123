use super::*;

#[derive(Debug, Clone)]
pub struct ChunkIter<'a, A: ChunkRead + ?Sized> {
    a: &'a A,
    idx_of_next_chunk: usize,
}

#[derive(Debug, Clone)]
pub struct IndexIter<'a, A: ChunkRead + ?Sized> {
    pub(crate) wi: ChunkIter<'a, A>,
    pub(crate) cached: Chunk,
}

/// Members of an [`EnumSet`] in ascending ordinal order.
#[derive(Clone)]
pub struct EnumSetIter<'a> {
    pub(crate) ty: &'a EnumType,
    pub(crate) indexes: IndexIter<'a, IndexSet>,
}

/// Entries of an [`EnumList`] in list order.
#[derive(Clone)]
pub struct EnumListIter<'a> {
    pub(crate) ty: &'a EnumType,
    pub(crate) entries: core::slice::Iter<'a, Ordinal>,
}

impl<'a, A: ChunkRead + ?Sized> ChunkIter<'a, A> {
    pub fn new(a: &'a A) -> Self {
        Self { a, idx_of_next_chunk: 0 }
    }
}

impl<A: ChunkRead + ?Sized> Iterator for ChunkIter<'_, A> {
    type Item = Chunk;
    fn next(&mut self) -> Option<Chunk> {
        let next = self.a.get_chunk(self.idx_of_next_chunk)?;
        self.idx_of_next_chunk += 1;
        Some(next)
    }
}

impl<'a, A: ChunkRead + ?Sized> IndexIter<'a, A> {
    pub fn new(a: &'a A) -> Self {
        Self { wi: ChunkIter::new(a), cached: 0 }
    }
}
impl<A: ChunkRead + ?Sized> Iterator for IndexIter<'_, A> {
    type Item = Ordinal;
    fn next(&mut self) -> Option<Ordinal> {
        while self.cached == 0 {
            self.cached = self.wi.next()?;
        }
        // self.cached is NONZERO
        let idx_in_chunk = self.cached.trailing_zeros();
        self.cached &= !(1 << idx_in_chunk);
        let cba = ChunkBitAddr { idx_in_chunk, idx_of_chunk: self.wi.idx_of_next_chunk - 1 };
        Some(cba.to_bit_idx())
    }
}

// set and list only ever hold in-range ordinals
fn value_at(ty: &EnumType, ordinal: Ordinal) -> Option<EnumValue> {
    ty.by_ordinal(ordinal).ok()
}

impl Iterator for EnumSetIter<'_> {
    type Item = EnumValue;
    fn next(&mut self) -> Option<EnumValue> {
        value_at(self.ty, self.indexes.next()?)
    }
}

impl Iterator for EnumListIter<'_> {
    type Item = EnumValue;
    fn next(&mut self) -> Option<EnumValue> {
        value_at(self.ty, *self.entries.next()?)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}
impl ExactSizeIterator for EnumListIter<'_> {}
