/// Returns the `page`-th (1-indexed) window of `per_page` items.
/// Pages past the end, and page 0, yield an empty slice.
pub fn page_slice<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(items.len());
    let end = page.saturating_mul(per_page).min(items.len());
    if page == 0 || start >= end {
        return &[];
    }
    &items[start..end]
}

pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_twenty_five_has_ten() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(page_slice(&items, 1, 10), &items[..10]);
        assert_eq!(page_slice(&items, 3, 10), &items[20..]);
    }

    #[test]
    fn pages_beyond_the_end_are_empty() {
        let items: Vec<u32> = (1..=25).collect();
        assert!(page_slice(&items, 4, 10).is_empty());
        assert!(page_slice(&items, usize::MAX, 10).is_empty());
        assert!(page_slice(&items, 0, 10).is_empty());
        assert!(page_slice::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn counts_partial_last_page() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(0, 10), 0);
    }
}
