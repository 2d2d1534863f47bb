//! Fixed-size pagination with clamped page numbers.

use std::num::NonZeroUsize;

/// One page of a sequence plus the bounds needed to navigate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based offset of the first item in the full sequence.
    pub start_index: usize,
    /// Always at least 1, even for an empty sequence.
    pub total_pages: usize,
    /// The requested page number clamped into `1..=total_pages`.
    pub page_number: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// Maps each item, keeping the page bounds.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            start_index: self.start_index,
            total_pages: self.total_pages,
            page_number: self.page_number,
        }
    }
}

/// Slices `sequence` into the requested page.
///
/// Out-of-range page numbers never fail: `0` becomes the first page and
/// anything past the end becomes the last one.
pub fn paginate<T: Clone>(sequence: &[T], page_size: NonZeroUsize, page_number: usize) -> Page<T> {
    let size = page_size.get();
    let total_pages = sequence.len().div_ceil(size).max(1);
    let page_number = page_number.clamp(1, total_pages);
    let start_index = (page_number - 1) * size;
    let end = (start_index + size).min(sequence.len());

    Page {
        items: sequence[start_index..end].to_vec(),
        start_index,
        total_pages,
        page_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn first_page() {
        let seq: Vec<u32> = (1..=12).collect();
        let page = paginate(&seq, size(5), 1);

        assert_eq!(page.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(page.start_index, 0);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn partial_last_page() {
        let seq: Vec<u32> = (1..=12).collect();
        let page = paginate(&seq, size(5), 3);

        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.start_index, 10);
        assert!(!page.has_next());
    }

    #[test]
    fn page_past_end_clamps_to_last() {
        let seq: Vec<u32> = (1..=12).collect();
        let page = paginate(&seq, size(5), 99);

        assert_eq!(page.page_number, 3);
        assert_eq!(page.items, vec![11, 12]);
    }

    #[test]
    fn page_zero_clamps_to_first() {
        let seq: Vec<u32> = (1..=12).collect();
        let page = paginate(&seq, size(5), 0);

        assert_eq!(page.page_number, 1);
        assert_eq!(page.start_index, 0);
    }

    #[test]
    fn empty_sequence_has_one_empty_page() {
        let seq: Vec<u32> = Vec::new();
        let page = paginate(&seq, size(10), 4);

        assert!(page.items.is_empty());
        assert_eq!(page.start_index, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_number, 1);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let seq: Vec<u32> = (1..=10).collect();
        let page = paginate(&seq, size(5), 3);

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.items, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn bounds_hold_for_every_length_and_page() {
        for len in 0..25 {
            let seq: Vec<usize> = (0..len).collect();
            for page_size in 1..8 {
                for requested in 0..10 {
                    let page = paginate(&seq, size(page_size), requested);
                    assert!(page.start_index <= len);
                    assert!(page.items.len() <= page_size);
                    assert!((1..=page.total_pages).contains(&page.page_number));
                }
            }
        }
    }
}
