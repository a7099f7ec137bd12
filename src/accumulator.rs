
// imports
use hashbrown::HashMap;
use hashbrown::hash_map::Iter;
use log::warn;


/// Unordered pair of token ids stored as `(lo, hi)` with `lo <= hi`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub lo: u32,
    pub hi: u32,
}

impl PairKey {

    pub fn new(a: u32, b: u32) -> PairKey {
        if a <= b { PairKey { lo: a, hi: b } } else { PairKey { lo: b, hi: a } }
    }

    // both halves fit in 32 bits, so the packed key never collides
    fn pack(self) -> u64 {
        (u64::from(self.lo) << 32) | u64::from(self.hi)
    }

    fn unpack(key: u64) -> PairKey {
        PairKey { lo: (key >> 32) as u32, hi: key as u32 }
    }

}


/// Sparse upper triangle of the cooccurrence matrix.
#[derive(Clone, Debug, Default)]
pub struct Accumulator {
    tup2cooc: HashMap<u64, f32>,
}

impl Accumulator {

    pub const DEFAULT_RESERVE: usize = 1_000_000;

    pub fn new() -> Accumulator {
        Accumulator::default()
    }

    /// Pre-sizes the map. A reservation the allocator refuses is logged and
    /// skipped, the map then grows on demand.
    pub fn with_capacity(capacity: usize) -> Accumulator {

        let mut tup2cooc = HashMap::new();
        if let Err(e) = tup2cooc.try_reserve(capacity) {
            warn!("could not reserve {} pairs ({:?}), growing on demand", capacity, e);
        }
        Accumulator { tup2cooc }
    }

    /// Adds `delta` to the pair `{a, b}`, creating the entry if needed.
    /// Arguments may come in either order, the key is always stored as `(lo, hi)`.
    #[inline]
    pub fn add(&mut self, a: u32, b: u32, delta: f32) {
        *self.tup2cooc.entry(PairKey::new(a, b).pack()).or_insert(0.0) += delta;
    }

    pub fn merge(&mut self, other: Accumulator) {

        // keep the larger map and fold the smaller one into it
        let (mut big, small) = if self.tup2cooc.len() >= other.tup2cooc.len() {
            (std::mem::take(&mut self.tup2cooc), other.tup2cooc)
        } else {
            (other.tup2cooc, std::mem::take(&mut self.tup2cooc))
        };
        for (k, v) in small {
            *big.entry(k).or_insert(0.0) += v;
        }
        self.tup2cooc = big;
    }

    pub fn get(&self, a: u32, b: u32) -> Option<f32> {
        self.tup2cooc.get(&PairKey::new(a, b).pack()).copied()
    }

    pub fn len(&self) -> usize {
        self.tup2cooc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tup2cooc.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tup2cooc.capacity()
    }

    // hash order
    pub fn iter(&self) -> Pairs<'_> {
        Pairs { inner: self.tup2cooc.iter() }
    }

}

pub struct Pairs<'a> {
    inner: Iter<'a, u64, f32>,
}

impl Iterator for Pairs<'_> {
    type Item = (PairKey, f32);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (PairKey::unpack(*k), *v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Accumulator {
    type Item = (PairKey, f32);
    type IntoIter = Pairs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
