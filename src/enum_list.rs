use crate::iterators::EnumListIter;
use crate::*;
use core::fmt::{self, Debug};

bitflags::bitflags! {
    /// Behavior of an [`EnumList`], fixed at construction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ListFlags: u8 {
        /// Attaching a value already present is a no-op.
        const UNIQUE = 1 << 0;
        /// Entries are kept sorted by ordinal; equal ordinals keep attach order.
        const ORDERED = 1 << 1;
    }
}

/// A sequence of values of one enumeration.
///
/// Without flags it keeps every attach, in attach order. The cursor is a plain
/// index into the entries: a `detach` before or at the cursor shifts what it
/// points at without moving it, so callers must re-read `current()` afterwards.
#[derive(Clone)]
pub struct EnumList {
    ty: EnumType,
    // invariant: UNIQUE => no ordinal twice; ORDERED => sorted ascending
    entries: Vec<Ordinal>,
    flags: ListFlags,
    cursor: usize,
}

impl EnumList {
    pub fn new(ty: EnumType, flags: ListFlags) -> Self {
        Self { ty, entries: Vec::new(), flags, cursor: 0 }
    }
    /// Creates an empty list for the enumeration registered as `name`.
    pub fn from_catalog(catalog: &EnumCatalog, name: &str, flags: ListFlags) -> Result<Self> {
        Ok(Self::new(catalog.get(name)?, flags))
    }
    pub fn enum_type(&self) -> &EnumType {
        &self.ty
    }
    pub fn flags(&self) -> ListFlags {
        self.flags
    }

    /// Adds a value. Returns false if it was skipped as a duplicate under UNIQUE.
    pub fn attach<V: IntoEnumValue>(&mut self, v: V) -> Result<bool> {
        let ordinal = self.ty.canonical_instance(v)?.ordinal();
        Ok(self.push_ordinal(ordinal))
    }
    /// Adds every value in order; nothing is added if any of them fails to resolve.
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
            self.push_ordinal(ordinal);
        }
        Ok(())
    }
    /// Removes every entry of the value. Returns how many were removed.
    pub fn detach<V: IntoEnumValue>(&mut self, v: V) -> Result<usize> {
        let ordinal = self.ty.canonical_instance(v)?.ordinal();
        let before = self.entries.len();
        self.entries.retain(|&o| o != ordinal);
        Ok(before - self.entries.len())
    }
    pub fn contains<V: IntoEnumValue>(&self, v: V) -> Result<bool> {
        let ordinal = self.ty.canonical_instance(v)?.ordinal();
        Ok(self.position_of(ordinal).is_some())
    }
    /// Number of entries, duplicates included.
    pub fn count(&self) -> usize {
        self.entries.len()
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn clear(&mut self) {
        self.entries.clear();
    }
    /// Entries in list order. Does not touch the cursor.
    pub fn iter(&self) -> EnumListIter<'_> {
        EnumListIter { ty: &self.ty, entries: self.entries.iter() }
    }

    fn push_ordinal(&mut self, ordinal: Ordinal) -> bool {
        if self.flags.contains(ListFlags::UNIQUE) && self.position_of(ordinal).is_some() {
            return false;
        }
        if self.flags.contains(ListFlags::ORDERED) {
            // after any equal entries
            let at = self.entries.partition_point(|&o| o <= ordinal);
            self.entries.insert(at, ordinal);
        } else {
            self.entries.push(ordinal);
        }
        true
    }
    fn position_of(&self, ordinal: Ordinal) -> Option<usize> {
        if self.flags.contains(ListFlags::ORDERED) {
            self.entries.binary_search(&ordinal).ok()
        } else {
            self.entries.iter().position(|&o| o == ordinal)
        }
    }
}

impl Cursor for EnumList {
    fn rewind(&mut self) {
        self.cursor = 0;
    }
    fn valid(&mut self) -> bool {
        self.cursor < self.entries.len()
    }
    fn key(&mut self) -> usize {
        self.cursor
    }
    fn current(&mut self) -> Option<EnumValue> {
        let &ordinal = self.entries.get(self.cursor)?;
        self.ty.by_ordinal(ordinal).ok()
    }
    fn next(&mut self) {
        self.cursor = self.cursor.saturating_add(1);
    }
}

impl Debug for EnumList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a EnumList {
    type Item = EnumValue;
    type IntoIter = EnumListIter<'a>;
    fn into_iter(self) -> EnumListIter<'a> {
        self.iter()
    }
}
