//! Short-run reversal patterns over the last four points.
//!
//! Up: three strictly falling moves, then a rise.
//! Down: three strictly rising moves, then a fall.
//! Fewer than four points never match.

pub fn detect_reversal_up(closes: &[f64]) -> bool {
    match last_four(closes) {
        Some([a, b, c, d]) => a > b && b > c && d > c,
        None => false,
    }
}

pub fn detect_reversal_down(closes: &[f64]) -> bool {
    match last_four(closes) {
        Some([a, b, c, d]) => a < b && b < c && d < c,
        None => false,
    }
}

fn last_four(closes: &[f64]) -> Option<[f64; 4]> {
    let tail = closes.get(closes.len().checked_sub(4)?..)?;
    tail.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversal_up_matches() {
        assert!(detect_reversal_up(&[10.0, 9.0, 8.0, 8.5]));
        assert!(detect_reversal_up(&[1.0, 2.0, 10.0, 9.0, 8.0, 8.5]));
    }

    #[test]
    fn reversal_up_requires_strict_declines() {
        assert!(!detect_reversal_up(&[10.0, 10.0, 8.0, 8.5]));
        assert!(!detect_reversal_up(&[10.0, 9.0, 8.0, 8.0]));
    }

    #[test]
    fn reversal_down_matches() {
        assert!(detect_reversal_down(&[8.0, 9.0, 10.0, 9.5]));
    }

    #[test]
    fn reversal_down_rejects_continuation() {
        assert!(!detect_reversal_down(&[8.0, 9.0, 10.0, 11.0]));
    }

    #[test]
    fn patterns_are_exclusive() {
        let up = [10.0, 9.0, 8.0, 8.5];
        let down = [8.0, 9.0, 10.0, 9.5];
        assert!(!detect_reversal_down(&up));
        assert!(!detect_reversal_up(&down));
    }

    #[test]
    fn short_input_is_false() {
        assert!(!detect_reversal_up(&[3.0, 2.0, 1.0]));
        assert!(!detect_reversal_down(&[]));
    }
}
