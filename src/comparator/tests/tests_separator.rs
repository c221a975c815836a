//! Separator and successor generation on internal keys.

#[cfg(test)]
mod tests {
    use crate::comparator::{BytewiseComparator, Comparator, InternalKeyComparator};
    use crate::key::{
        InternalKey, MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK, ValueType, parse_internal_key,
    };
    use std::cmp::Ordering;
    use tracing::Level;
    use tracing_subscriber::fmt::Subscriber;

    fn init_tracing() {
        let _ = Subscriber::builder()
            .with_max_level(Level::TRACE)
            .try_init();
    }

    fn ikey(user_key: &[u8], seq: u64, t: ValueType) -> Vec<u8> {
        InternalKey::new_with(user_key, seq, t).encode().to_vec()
    }

    fn shorten(start: Vec<u8>, limit: &[u8]) -> Vec<u8> {
        let cmp = InternalKeyComparator::new(&BytewiseComparator);
        let mut s = start;
        cmp.find_shortest_separator(&mut s, limit);
        s
    }

    fn short_successor(key: Vec<u8>) -> Vec<u8> {
        let cmp = InternalKeyComparator::new(&BytewiseComparator);
        let mut k = key;
        cmp.find_short_successor(&mut k);
        k
    }

    #[test]
    fn separator_same_user_key_unchanged() {
        init_tracing();
        let start = ikey(b"foo", 100, ValueType::Value);
        assert_eq!(
            shorten(start.clone(), &ikey(b"foo", 99, ValueType::Value)),
            start
        );
        assert_eq!(
            shorten(start.clone(), &ikey(b"foo", 101, ValueType::Value)),
            start
        );
        assert_eq!(
            shorten(start.clone(), &ikey(b"foo", 100, ValueType::Deletion)),
            start
        );
    }

    #[test]
    fn separator_misordered_user_keys_unchanged() {
        init_tracing();
        let start = ikey(b"foo", 100, ValueType::Value);
        assert_eq!(
            shorten(start.clone(), &ikey(b"bar", 99, ValueType::Value)),
            start
        );
    }

    #[test]
    fn separator_shortens_user_key() {
        init_tracing();
        let start = ikey(b"foo", 100, ValueType::Value);
        let limit = ikey(b"hello", 200, ValueType::Value);
        let sep = shorten(start.clone(), &limit);
        assert_eq!(sep, ikey(b"g", MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK));

        let cmp = InternalKeyComparator::new(&BytewiseComparator);
        assert_eq!(cmp.compare(&start, &sep), Ordering::Less);
        assert_eq!(cmp.compare(&sep, &limit), Ordering::Less);
        let parsed = parse_internal_key(&sep).unwrap();
        assert_eq!(parsed.user_key, b"g");
    }

    #[test]
    fn separator_start_is_prefix_of_limit_unchanged() {
        init_tracing();
        let start = ikey(b"foo", 100, ValueType::Value);
        assert_eq!(
            shorten(start.clone(), &ikey(b"foobar", 200, ValueType::Value)),
            start
        );
    }

    #[test]
    fn separator_limit_is_prefix_of_start_unchanged() {
        init_tracing();
        let start = ikey(b"foobar", 100, ValueType::Value);
        assert_eq!(
            shorten(start.clone(), &ikey(b"foo", 200, ValueType::Value)),
            start
        );
    }

    #[test]
    fn successor_shortens_user_key() {
        init_tracing();
        let key = ikey(b"foo", 100, ValueType::Value);
        let succ = short_successor(key.clone());
        assert_eq!(succ, ikey(b"g", MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK));

        let cmp = InternalKeyComparator::new(&BytewiseComparator);
        assert_eq!(cmp.compare(&key, &succ), Ordering::Less);
    }

    #[test]
    fn successor_all_ff_unchanged() {
        init_tracing();
        let key = ikey(b"\xff\xff", 100, ValueType::Value);
        assert_eq!(short_successor(key.clone()), key);
    }
}
