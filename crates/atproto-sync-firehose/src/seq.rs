//! Sequence monotonicity.

/// Whether `next` is acceptable given the last accepted sequence `last`.
///
/// True when there is no prior sequence yet, when `next` is absent (events
/// like `#info` carry no sequence), or when `next` strictly increases on
/// `last`. False otherwise — a rewind or repeat.
pub fn valid_seq(last: Option<i64>, next: Option<i64>) -> bool {
    match (last, next) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(last), Some(next)) => next > last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_first_sequence_seen() {
        assert!(valid_seq(None, Some(5)));
    }

    #[test]
    fn accepts_absent_sequence() {
        assert!(valid_seq(Some(10), None));
        assert!(valid_seq(None, None));
    }

    #[test]
    fn accepts_strictly_increasing() {
        assert!(valid_seq(Some(10), Some(11)));
    }

    #[test]
    fn rejects_repeat_or_rewind() {
        assert!(!valid_seq(Some(10), Some(10)));
        assert!(!valid_seq(Some(10), Some(5)));
    }
}
