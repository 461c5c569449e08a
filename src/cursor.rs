//! The pagination cursor: how much of a working set has been materialized
//! into the page. Created once per view, advanced only by the load step, and
//! never reset short of a full page reload.

/// Number of posts materialized per load.
pub const PAGE_SIZE: usize = 20;

/// Tracks pagination over a working set. The cursor does not own the posts;
/// [`Cursor::next`] slices whatever working set the caller paginates over,
/// which must not shrink between calls.
#[derive(Debug)]
pub struct Cursor {
    offset: usize,
    limit: usize,
    exhausted: bool,
    in_flight: bool,
}

impl Cursor {
    pub fn new() -> Cursor {
        Cursor::with_limit(PAGE_SIZE)
    }

    pub fn with_limit(limit: usize) -> Cursor {
        Cursor {
            offset: 0,
            limit,
            exhausted: false,
            in_flight: false,
        }
    }

    /// Count of items already materialized.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Latched true once the working set is fully materialized; no further
    /// loads should be attempted.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Acquires the in-flight guard. Returns false when a load is already in
    /// progress, in which case the caller must treat its call as a no-op (not
    /// queue it).
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Releases the in-flight guard. Must run on failure paths too, so a
    /// failed load never wedges future scroll-triggered loads.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Returns the next page `[offset, offset+limit)` of `items` and advances
    /// by the number actually returned. An empty result, or advancing to the
    /// end of the set, latches exhaustion.
    pub fn next<'a, T>(&mut self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let stop = (self.offset + self.limit).min(items.len());
        let page = &items[start..stop];
        self.offset += page.len();
        if page.is_empty() || self.offset >= items.len() {
            self.exhausted = true;
        }
        page
    }
}

impl Default for Cursor {
    fn default() -> Cursor {
        Cursor::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn drain(cursor: &mut Cursor, items: &[u32]) -> Vec<Vec<u32>> {
        let mut batches = Vec::new();
        while !cursor.is_exhausted() {
            batches.push(cursor.next(items).to_vec());
        }
        batches
    }

    #[test]
    fn test_batches_cover_set_without_gaps_or_duplicates() {
        let items: Vec<u32> = (0..45).collect();
        let mut cursor = Cursor::new();
        let batches = drain(&mut cursor, &items);

        assert_eq!(
            batches.iter().map(Vec::len).collect::<Vec<_>>(),
            [20, 20, 5]
        );
        let union: Vec<u32> = batches.into_iter().flatten().collect();
        assert_eq!(union, items);
    }

    #[test]
    fn test_exhaustion_after_ceil_n_over_l_calls() {
        for (n, calls) in [(1usize, 1usize), (19, 1), (20, 1), (21, 2), (40, 2), (45, 3)] {
            let items: Vec<u32> = (0..n as u32).collect();
            let mut cursor = Cursor::new();
            let mut made = 0;
            while !cursor.is_exhausted() {
                cursor.next(&items);
                made += 1;
            }
            assert_eq!(made, calls, "n={}", n);
        }
    }

    #[test]
    fn test_exhaustion_latches_only_at_end() {
        let items: Vec<u32> = (0..45).collect();
        let mut cursor = Cursor::new();
        cursor.next(&items);
        assert!(!cursor.is_exhausted());
        cursor.next(&items);
        assert!(!cursor.is_exhausted());
        cursor.next(&items);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_exhausted_cursor_yields_empty() {
        let items = [1u32, 2];
        let mut cursor = Cursor::new();
        cursor.next(&items);
        assert!(cursor.is_exhausted());
        assert!(cursor.next(&items).is_empty());
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn test_in_flight_guard_suppresses_reentry() {
        let mut cursor = Cursor::new();
        assert!(cursor.try_begin());
        assert!(!cursor.try_begin());
        cursor.finish();
        assert!(cursor.try_begin());
    }
}
