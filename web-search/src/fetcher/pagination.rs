//! Page window arithmetic for offset-paged search APIs.
//!
//! Both supported APIs serve at most 10 items per call and refuse offsets
//! past 91, so a single query can reach at most 10 pages (100 results).

/// Items requested per upstream call.
pub const WINDOW_SIZE: usize = 10;

/// Highest offset the upstream APIs accept.
pub const MAX_OFFSET: u32 = 91;

/// Iterator over page offsets, starting at a provider's first offset and
/// advancing by [`WINDOW_SIZE`] until [`MAX_OFFSET`] is passed.
#[derive(Debug, Clone)]
pub struct PageWindows {
    next: u32,
}

impl PageWindows {
    pub fn new(first_offset: u32) -> Self {
        Self { next: first_offset }
    }
}

impl Iterator for PageWindows {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.next > MAX_OFFSET {
            return None;
        }
        let offset = self.next;
        self.next += WINDOW_SIZE as u32;
        Some(offset)
    }
}
