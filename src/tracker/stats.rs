//! Per-pixel change statistics.

use std::collections::TryReserveError;

/// Change tally for one analyzed pixel.
///
/// All fields start at zero. `first_change_ms` is written exactly once,
/// the first time the pixel changes, and never overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelStat {
    /// Number of committed frames in which this pixel differed.
    pub change_count: u32,
    /// Timestamp of the most recent committed change.
    pub last_change_ms: u32,
    /// Timestamp of the first committed change.
    pub first_change_ms: u32,
}

/// Statistics for every pixel of the cropped rectangle, row-major.
///
/// Sized exactly `analyzed_width * analyzed_height`; pixels outside the
/// crop region have no entry.
#[derive(Debug, Clone)]
pub struct StatGrid {
    stats: Vec<PixelStat>,
    width: u32,
    height: u32,
}

impl StatGrid {
    /// Allocates a zero-filled grid for a cropped rectangle of
    /// `width * height` pixels.
    ///
    /// Allocation failure is reported rather than aborting, so a huge
    /// frame cannot take the whole process down.
    pub fn allocate(width: u32, height: u32) -> Result<Self, TryReserveError> {
        let len = (width as usize) * (height as usize);
        let mut stats = Vec::new();
        stats.try_reserve_exact(len)?;
        stats.resize(len, PixelStat::default());
        Ok(Self {
            stats,
            width,
            height,
        })
    }

    /// Width of the analyzed rectangle in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the analyzed rectangle in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of analyzed pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Returns true if the cropped rectangle is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Returns the stat at cropped-rectangle coordinates `(col, row)`.
    #[inline]
    pub fn get(&self, col: u32, row: u32) -> PixelStat {
        self.stats[self.index(col, row)]
    }

    /// Mutable access by cropped-rectangle coordinates.
    #[inline]
    pub fn get_mut(&mut self, col: u32, row: u32) -> &mut PixelStat {
        let i = self.index(col, row);
        &mut self.stats[i]
    }

    /// Iterates over all stats in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &PixelStat> {
        self.stats.iter()
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        debug_assert!(col < self.width && row < self.height);
        (row as usize) * (self.width as usize) + (col as usize)
    }
}
