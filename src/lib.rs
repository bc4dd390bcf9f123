//! Enumerated types declared at runtime, with a dense ordinal per value and
//! exactly one instance per value, plus two collections over them:
//! [`EnumSet`] (bitset membership) and [`EnumList`] (ordered, optionally unique).
use core::fmt::Display;
pub use traits::{ChunkRead, Cursor};

mod traits;

mod error;
pub use error::{EnumError, Result};

mod scalar;
pub use scalar::Scalar;

mod registry;
pub use registry::{EnumCatalog, EnumType, EnumTypeId, EnumValue, IntoEnumValue};

mod index_set;
pub use index_set::IndexSet;

mod enum_set;
pub use enum_set::EnumSet;

mod enum_list;
pub use enum_list::{EnumList, ListFlags};

pub mod combinators;
use combinators::{BinChunkOp, CombinedChunks};

pub mod iterators;
use iterators::{ChunkIter, IndexIter};

#[cfg(test)]
mod tests;

/////////////////////////////////////////////
pub type Chunk = usize; // stores up to usize::BITS ordinals
pub type Ordinal = usize; // BIT index

pub struct DisplayableIndexSet<'a, A: ChunkRead + ?Sized>(&'a A);

#[derive(Debug, Copy, Clone)]
struct ChunkBitAddr {
    idx_of_chunk: usize, // CHUNK index not BIT index
    idx_in_chunk: u32,   // invariant: in 0..usize::BITs
}
///////////////////////////////////////////////////////////////////////
const CHUNK_BITS: usize = Chunk::BITS as usize;

impl<A: ChunkRead + ?Sized> Display for DisplayableIndexSet<'_, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.0.iter_indexes()).finish()
    }
}
impl ChunkBitAddr {
    fn from_bit_idx(bit_idx: Ordinal) -> Self {
        Self {
            idx_of_chunk: bit_idx / CHUNK_BITS,
            idx_in_chunk: (bit_idx % CHUNK_BITS) as u32,
        }
    }
    const fn chunk_mask(&self) -> Chunk {
        1 << self.idx_in_chunk
    }
    fn to_bit_idx(self) -> Ordinal {
        self.idx_of_chunk * CHUNK_BITS + self.idx_in_chunk as usize
    }
}

/// Number of chunks needed to hold `index_count` bits.
pub(crate) const fn index_count_to_chunk_count(index_count: usize) -> usize {
    index_count.div_ceil(CHUNK_BITS)
}
