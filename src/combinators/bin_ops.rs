use crate::{BinChunkOp, Chunk};

/// In either.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Or;
/// In exactly one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Xor;
/// In both.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct And;
/// In the first, not the second.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Diff;

//////////

#[inline]
fn z(chunk: Option<Chunk>) -> Chunk {
    chunk.unwrap_or(0)
}

impl BinChunkOp for Or {
    fn combine_chunks(self, a: Option<Chunk>, b: Option<Chunk>) -> Option<Chunk> {
        if a.is_none() && b.is_none() {
            None
        } else {
            Some(z(a) | z(b))
        }
    }
}
impl BinChunkOp for Xor {
    fn combine_chunks(self, a: Option<Chunk>, b: Option<Chunk>) -> Option<Chunk> {
        if a.is_none() && b.is_none() {
            None
        } else {
            Some(z(a) ^ z(b))
        }
    }
}
impl BinChunkOp for And {
    fn combine_chunks(self, a: Option<Chunk>, b: Option<Chunk>) -> Option<Chunk> {
        if let [Some(a), Some(b)] = [a, b] {
            Some(a & b)
        } else {
            None
        }
    }
}
impl BinChunkOp for Diff {
    fn combine_chunks(self, a: Option<Chunk>, b: Option<Chunk>) -> Option<Chunk> {
        a.map(|a| a & !z(b))
    }
}
