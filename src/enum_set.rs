use crate::combinators::bin_ops::{And, Diff, Or, Xor};
use crate::iterators::EnumSetIter;
use crate::*;
use core::cmp::Ordering;
use core::fmt::{self, Debug};

/// A set of values of one enumeration, one bit per ordinal.
///
/// Iterating with [`Cursor`] visits members in ascending ordinal order.
/// `next` moves the cursor exactly one ordinal; skipping over absent ordinals
/// happens lazily, in whichever of `valid`, `key` or `current` runs next.
#[derive(Clone)]
pub struct EnumSet {
    ty: EnumType,
    // invariant: bit i is set iff the value with ordinal i is a member
    bits: IndexSet,
    // invariant: cursor <= ty.ordinal_count(); equality means exhausted
    cursor: Ordinal,
}

/// Where the cursor rests relative to the members.
enum Position {
    Member(Ordinal),
    // on an absent ordinal with members possibly ahead
    Gap,
    End,
}

impl EnumSet {
    /// Creates an empty set sized to the enumeration.
    pub fn new(ty: EnumType) -> Self {
        let bits = IndexSet::with_capacity(ty.ordinal_count());
        Self { ty, bits, cursor: 0 }
    }
    /// Creates an empty set holding at most `capacity` distinct ordinals.
    /// Fails if the enumeration declares more values than that.
    pub fn with_capacity(ty: EnumType, capacity: usize) -> Result<Self> {
        let count = ty.ordinal_count();
        if count > capacity {
            return Err(EnumError::CapacityExceeded { ty: ty.shared_name(), count, capacity });
        }
        tracing::trace!(enumeration = %ty.name(), count, capacity, "sized enum set");
        Ok(Self { ty, bits: IndexSet::with_capacity(capacity), cursor: 0 })
    }
    /// Creates an empty set for the enumeration registered as `name`.
    pub fn from_catalog(catalog: &EnumCatalog, name: &str) -> Result<Self> {
        Ok(Self::new(catalog.get(name)?))
    }
    pub fn enum_type(&self) -> &EnumType {
        &self.ty
    }
    /// Number of distinct ordinals the set can hold.
    pub fn capacity(&self) -> usize {
        self.bits.capacity().end
    }

    /// Adds a value. Returns whether it was absent before.
    pub fn attach<V: IntoEnumValue>(&mut self, v: V) -> Result<bool> {
        let ordinal = self.ty.canonical_instance(v)?.ordinal();
        Ok(self.bits.insert(ordinal))
    }
    /// Adds every value; nothing is added if any of them fails to resolve.
    pub fn attach_all<I, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: IntoEnumValue,
    {
        let ordinals = values
            .into_iter()
            .map(|v| Ok(self.ty.canonical_instance(v)?.ordinal()))
            .collect::<Result<Vec<_>>>()?;
        for ordinal in ordinals {
            self.bits.insert(ordinal);
        }
        Ok(())
    }
    /// Removes a value. Returns whether it was present before.
    pub fn detach<V: IntoEnumValue>(&mut self, v: V) -> Result<bool> {
        let ordinal = self.ty.canonical_instance(v)?.ordinal();
        Ok(self.bits.remove(ordinal))
    }
    pub fn contains<V: IntoEnumValue>(&self, v: V) -> Result<bool> {
        let ordinal = self.ty.canonical_instance(v)?.ordinal();
        Ok(self.bits.contains_index(ordinal))
    }
    /// Number of members, counted from the bits on every call.
    pub fn count(&self) -> usize {
        self.bits.count_indexes()
    }
    pub fn len(&self) -> usize {
        self.count()
    }
    pub fn is_empty(&self) -> bool {
        ChunkRead::is_empty(&self.bits)
    }
    pub fn clear(&mut self) {
        self.bits.clear();
    }
    /// Adds every declared value.
    pub fn fill(&mut self) {
        self.bits.fill();
        // capacity may exceed the declared values
        for ordinal in self.ty.ordinal_count()..self.capacity() {
            self.bits.remove(ordinal);
        }
    }
    /// Members in ascending ordinal order. Does not touch the cursor.
    pub fn iter(&self) -> EnumSetIter<'_> {
        EnumSetIter { ty: &self.ty, indexes: self.bits.iter_indexes() }
    }
    /// Ordinals of the members, ascending.
    pub fn ordinals(&self) -> IndexIter<'_, IndexSet> {
        self.bits.iter_indexes()
    }

    /// Members of either set.
    pub fn union(&self, other: &EnumSet) -> Result<EnumSet> {
        self.combined(other, Or)
    }
    /// Members of both sets.
    pub fn intersect(&self, other: &EnumSet) -> Result<EnumSet> {
        self.combined(other, And)
    }
    /// Members of this set absent from `other`.
    pub fn diff(&self, other: &EnumSet) -> Result<EnumSet> {
        self.combined(other, Diff)
    }
    /// Members of exactly one of the sets.
    pub fn sym_diff(&self, other: &EnumSet) -> Result<EnumSet> {
        self.combined(other, Xor)
    }
    /// Same enumeration and same members. Cursors are ignored.
    pub fn is_equal(&self, other: &EnumSet) -> bool {
        self.subset_order(other) == Some(Ordering::Equal)
    }
    pub fn is_subset(&self, other: &EnumSet) -> bool {
        matches!(self.subset_order(other), Some(Ordering::Less | Ordering::Equal))
    }
    pub fn is_superset(&self, other: &EnumSet) -> bool {
        matches!(self.subset_order(other), Some(Ordering::Greater | Ordering::Equal))
    }

    fn subset_order(&self, other: &EnumSet) -> Option<Ordering> {
        if self.ty != other.ty {
            return None;
        }
        self.bits.index_cmp(&other.bits)
    }
    fn combined<O: BinChunkOp>(&self, other: &EnumSet, op: O) -> Result<EnumSet> {
        self.ty.check_same(&other.ty)?;
        let combined = self.bits.combine_chunks(&other.bits, op);
        let bits = IndexSet::from_chunk_iter(self.capacity(), combined.iter_chunks());
        tracing::trace!(enumeration = %self.ty.name(), members = %bits.display(), "combined enum sets");
        Ok(EnumSet { ty: self.ty.clone(), bits, cursor: 0 })
    }
    fn ordinal_max(&self) -> Ordinal {
        self.ty.ordinal_count()
    }
    fn position(&self) -> Position {
        if self.cursor < self.ordinal_max() && self.bits.contains_index(self.cursor) {
            Position::Member(self.cursor)
        } else if self.cursor >= self.ordinal_max() || ChunkRead::is_empty(&self.bits) {
            Position::End
        } else {
            Position::Gap
        }
    }
    /// Moves the cursor onto the next member at or after it, or to the end.
    /// A cursor already on a member stays put, so repeated calls are cheap.
    fn resolve(&mut self) -> Option<Ordinal> {
        match self.position() {
            Position::Member(ordinal) => Some(ordinal),
            Position::End => None,
            Position::Gap => {
                let max = self.ordinal_max();
                match self.bits.next_index_from(self.cursor + 1).filter(|&o| o < max) {
                    Some(ordinal) => {
                        self.cursor = ordinal;
                        Some(ordinal)
                    }
                    None => {
                        self.cursor = max;
                        None
                    }
                }
            }
        }
    }
}

impl Cursor for EnumSet {
    fn rewind(&mut self) {
        self.cursor = 0;
    }
    fn valid(&mut self) -> bool {
        self.resolve().is_some()
    }
    fn key(&mut self) -> usize {
        self.resolve();
        self.cursor
    }
    fn current(&mut self) -> Option<EnumValue> {
        let ordinal = self.resolve()?;
        self.ty.by_ordinal(ordinal).ok()
    }
    fn next(&mut self) {
        self.cursor = (self.cursor + 1).min(self.ordinal_max());
    }
}

impl PartialEq for EnumSet {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}
impl Eq for EnumSet {}

impl Debug for EnumSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a EnumSet {
    type Item = EnumValue;
    type IntoIter = EnumSetIter<'a>;
    fn into_iter(self) -> EnumSetIter<'a> {
        self.iter()
    }
}
