use super::CharMap;

/// Ordered, duplicate-free list of character codes to attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    codes: Vec<u32>,
}

impl RenderRequest {
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl From<Vec<u32>> for RenderRequest {
    /// Sorts and deduplicates.
    fn from(mut codes: Vec<u32>) -> Self {
        codes.sort_unstable();
        codes.dedup();
        Self { codes }
    }
}

/// Map keys when a non-empty map is given, otherwise `0..=max_char` (at least `0..=1`).
/// Availability is not checked here.
pub fn enumerate_codes(map: Option<&CharMap>, max_char: u32) -> RenderRequest {
    match map {
        Some(m) if !m.is_empty() => RenderRequest {
            codes: m.unicode_keys().collect(),
        },
        _ => RenderRequest {
            codes: (0..=max_char.max(1)).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_inclusive() {
        let r = enumerate_codes(None, 127);
        assert_eq!(r.len(), 128);
        assert_eq!(r.codes()[0], 0);
        assert_eq!(*r.codes().last().unwrap(), 127);
    }

    #[test]
    fn zero_max_still_tries_two_codes() {
        assert_eq!(enumerate_codes(None, 0).codes(), &[0, 1]);
    }

    #[test]
    fn map_keys_win_over_range() {
        let map: CharMap = [(0x20AC, 0x80), (0x41, 0x41)].into_iter().collect();
        let r = enumerate_codes(Some(&map), 255);
        assert_eq!(r.codes(), &[0x41, 0x20AC]);
    }

    #[test]
    fn empty_map_falls_back_to_range() {
        let r = enumerate_codes(Some(&CharMap::default()), 3);
        assert_eq!(r.codes(), &[0, 1, 2, 3]);
    }

    #[test]
    fn from_vec_dedups() {
        let r = RenderRequest::from(vec![5, 1, 5, 3]);
        assert_eq!(r.codes(), &[1, 3, 5]);
    }
}
