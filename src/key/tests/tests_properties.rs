//! Randomised round-trip checks over the full sequence range.

#[cfg(test)]
mod tests {
    use crate::key::*;
    use rand::Rng;

    fn random_user_key(rng: &mut impl Rng) -> Vec<u8> {
        let len = rng.random_range(0..64);
        (0..len).map(|_| rng.random()).collect()
    }

    #[test]
    fn standard_roundtrip_random() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let user_key = random_user_key(&mut rng);
            let sequence = rng.random_range(0..=MAX_SEQUENCE_NUMBER);
            let value_type = if rng.random() {
                ValueType::Value
            } else {
                ValueType::Deletion
            };
            let original = ParsedInternalKey::new(&user_key, sequence, value_type);

            let mut buf = Vec::new();
            append_internal_key(&mut buf, &original);
            assert_eq!(parse_internal_key(&buf).unwrap(), original);
            assert_eq!(extract_user_key(&buf), user_key.as_slice());
        }
    }

    #[test]
    fn mv_roundtrip_random() {
        let mut rng = rand::rng();
        for _ in 0..500 {
            let user_key = random_user_key(&mut rng);
            let original = ParsedMvInternalKey::new(
                &user_key,
                rng.random_range(0..=MAX_SEQUENCE_NUMBER),
                if rng.random() {
                    ValueType::Value
                } else {
                    ValueType::Deletion
                },
                rng.random(),
            );

            let owned = MvInternalKey::from_parsed(&original);
            assert_eq!(owned.parsed().unwrap(), original);
            assert_eq!(owned.user_key(), user_key.as_slice());
        }
    }
}
