//! Sequence-number arithmetic modulo `LimitSeqNo`.
//!
//! Sequence numbers wrap at twice the window size, so raw integer ordering
//! is meaningless near the boundary. Every comparison here goes through the
//! forward distance between two numbers on the ring.

/// The sequence number following `seq`, wrapping at `limit`.
pub fn next(seq: u16, limit: u16) -> u16 {
    debug_assert!(seq < limit);
    if seq + 1 == limit {
        0
    } else {
        seq + 1
    }
}

/// The number of forward steps from `from` to reach `to` on the ring of
/// integers modulo `limit`.
pub fn distance(from: u16, to: u16, limit: u16) -> u16 {
    debug_assert!(from < limit && to < limit);
    let from = u32::from(from);
    let to = u32::from(to);
    let limit = u32::from(limit);
    ((to + limit - from) % limit) as u16
}

/// Whether `seq` lies within the window of `len` slots starting at `start`,
/// accounting for wraparound.
pub fn in_window(start: u16, len: u16, seq: u16, limit: u16) -> bool {
    distance(start, seq, limit) < len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_wraps() {
        assert_eq!(next(0, 8), 1);
        assert_eq!(next(6, 8), 7);
        assert_eq!(next(7, 8), 0);
    }

    #[test]
    fn forward_distance() {
        assert_eq!(distance(0, 0, 8), 0);
        assert_eq!(distance(0, 3, 8), 3);
        assert_eq!(distance(3, 0, 8), 5);
        assert_eq!(distance(7, 0, 8), 1);
        assert_eq!(distance(7, 2, 8), 3);
    }

    #[test]
    fn window_membership() {
        // A window of 4 starting at 6 on a ring of 8 covers 6, 7, 0, 1.
        assert!(in_window(6, 4, 6, 8));
        assert!(in_window(6, 4, 7, 8));
        assert!(in_window(6, 4, 0, 8));
        assert!(in_window(6, 4, 1, 8));
        assert!(!in_window(6, 4, 2, 8));
        assert!(!in_window(6, 4, 5, 8));
    }

    #[test]
    fn window_at_the_seam() {
        // The slot just behind the window start is the farthest away.
        assert_eq!(distance(0, 7, 8), 7);
        assert!(!in_window(0, 7, 7, 8));
        assert!(in_window(0, 8, 7, 8));
    }
}
