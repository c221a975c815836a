//! `InternalKeyComparator` configured for the multi-version layout.

#[cfg(test)]
mod tests {
    use crate::comparator::{BytewiseComparator, Comparator, InternalKeyComparator};
    use crate::key::{
        KeyFormat, MAX_SEQUENCE_NUMBER, MAX_VALID_TIME, MvInternalKey, VALUE_TYPE_FOR_SEEK,
        ValueType, parse_mv_internal_key,
    };
    use std::cmp::Ordering;

    fn mvkey(user_key: &[u8], seq: u64, t: ValueType, vt: u64) -> Vec<u8> {
        MvInternalKey::new_with(user_key, seq, t, vt).encode().to_vec()
    }

    /// `user_key` followed by the earliest-sorting MV suffix.
    fn max_suffix_key(user_key: &[u8]) -> Vec<u8> {
        let seq = MAX_SEQUENCE_NUMBER;
        mvkey(user_key, seq, VALUE_TYPE_FOR_SEEK, MAX_VALID_TIME)
    }

    fn mv_cmp() -> InternalKeyComparator<'static> {
        InternalKeyComparator::with_format(&BytewiseComparator, KeyFormat::MultiVersion)
    }

    #[test]
    fn user_key_excludes_valid_time() {
        let cmp = mv_cmp();
        // With the standard layout "a" + tag would be read as the user key;
        // here only "a" vs "b" decides.
        assert_eq!(
            cmp.compare(
                &mvkey(b"a", 1, ValueType::Value, u64::MAX),
                &mvkey(b"b", 1, ValueType::Value, 0)
            ),
            Ordering::Less
        );
    }

    #[test]
    fn sequence_descends_regardless_of_valid_time() {
        let cmp = mv_cmp();
        assert_eq!(
            cmp.compare(
                &mvkey(b"k", 10, ValueType::Value, 1),
                &mvkey(b"k", 9, ValueType::Value, 1000)
            ),
            Ordering::Less
        );
    }

    #[test]
    fn valid_time_breaks_full_tag_tie_descending() {
        let cmp = mv_cmp();
        let later = mvkey(b"k", 5, ValueType::Value, 200);
        let earlier = mvkey(b"k", 5, ValueType::Value, 100);
        assert_eq!(cmp.compare(&later, &earlier), Ordering::Less);
        assert_eq!(cmp.compare(&earlier, &later), Ordering::Greater);
        assert_eq!(cmp.compare(&later, &later.clone()), Ordering::Equal);
    }

    #[test]
    fn separator_appends_mv_suffix() {
        let cmp = mv_cmp();
        let start = mvkey(b"foo", 100, ValueType::Value, 5);
        let limit = mvkey(b"hello", 200, ValueType::Value, 5);
        let mut sep = start.clone();
        cmp.find_shortest_separator(&mut sep, &limit);

        assert_eq!(sep, max_suffix_key(b"g"));
        let parsed = parse_mv_internal_key(&sep).unwrap();
        assert_eq!(parsed.user_key, b"g");
        assert_eq!(cmp.compare(&start, &sep), Ordering::Less);
        assert_eq!(cmp.compare(&sep, &limit), Ordering::Less);
    }

    #[test]
    fn successor_appends_mv_suffix() {
        let cmp = mv_cmp();
        let mut key = mvkey(b"foo", 1, ValueType::Deletion, 9);
        cmp.find_short_successor(&mut key);
        assert_eq!(key, max_suffix_key(b"g"));
    }

    #[test]
    fn compare_owned_mv_keys() {
        let cmp = mv_cmp();
        let a = MvInternalKey::new_with(b"x", 3, ValueType::Value, 1);
        let b = MvInternalKey::new_with(b"x", 3, ValueType::Deletion, 1);
        assert_eq!(cmp.compare_mv_keys(&a, &b), Ordering::Less);
    }
}
