//! Coarsened parallel-for over fixed-size tiles of an index range.

use super::scope::scope;
use std::ops::Range;

/// One contiguous piece of `0..len`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Position of the tile in the tiling
    pub index: usize,
    /// First index covered
    pub start: usize,
    /// One past the last index covered
    pub end: usize,
}

impl Tile {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Number of tiles needed to cover `len` indices with tiles of `grain`.
///
/// # Panics
/// Panics if `grain` is zero.
pub fn tile_count(len: usize, grain: usize) -> usize {
    assert!(grain > 0, "tile size must be at least 1");
    len.div_ceil(grain)
}

/// Iterator over the tiles of `0..len`.
///
/// Every tile holds `grain` indices except the last, which holds
/// `len - (count - 1) * grain` and never extends past `len`.
#[derive(Clone, Debug)]
pub struct Tiles {
    len: usize,
    grain: usize,
    next: usize,
    count: usize,
}

impl Tiles {
    /// # Panics
    /// Panics if `grain` is zero.
    pub fn new(len: usize, grain: usize) -> Self {
        Self {
            len,
            grain,
            next: 0,
            count: tile_count(len, grain),
        }
    }
}

impl Iterator for Tiles {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.next == self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let start = index * self.grain;
        let end = self.len.min(start + self.grain);
        Some(Tile { index, start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles {}

/// Run `body` once per tile, each tile as its own task.
///
/// Returns after every tile has been processed.
pub fn for_each_tile<F>(len: usize, grain: usize, body: F)
where
    F: Fn(Tile) + Sync,
{
    let tiles = Tiles::new(len, grain);
    let body = &body;
    scope(move |s| {
        for tile in tiles {
            s.spawn(move |_| body(tile));
        }
    });
}

/// Compute `f(tile)` for every tile in parallel, collecting the results in
/// tile order.
///
/// Each task writes only its own slot of the result buffer, so no
/// synchronisation is needed beyond the join.
pub fn map_tiles<T, F>(len: usize, grain: usize, f: F) -> Vec<T>
where
    T: Default + Send,
    F: Fn(Tile) -> T + Sync,
{
    let tiles = Tiles::new(len, grain);
    let mut slots: Vec<T> = std::iter::repeat_with(T::default)
        .take(tiles.len())
        .collect();

    let f = &f;
    let work = slots.iter_mut().zip(tiles);
    scope(move |s| {
        for (slot, tile) in work {
            s.spawn(move |_| *slot = f(tile));
        }
    });
    slots
}
