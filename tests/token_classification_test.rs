use ci_helpers::{ClassificationError, TokenType, classify};

#[test]
fn test_known_token_types() {
    let cases = [
        ("dp.pt.abcdef", TokenType::PersonalToken),
        ("dp.st.abcdef", TokenType::ServiceToken),
        ("dp.sa.abcdef", TokenType::ServiceAccountToken),
    ];

    for (raw, expected) in cases {
        assert_eq!(classify(Some(raw)), Ok(expected), "{}", raw);
    }
}

#[test]
fn test_anything_without_dp_prefix_is_invalid() {
    let inputs = [
        "x", "pt.st.sa", "Dp.pt.abc", "pd.pt.abc", "ghp_abcdef", "..", " ", "d.p.t",
    ];

    for raw in inputs {
        assert!(
            matches!(classify(Some(raw)), Err(ClassificationError::InvalidFormat { .. })),
            "{}",
            raw
        );
    }
}

#[test]
fn test_dp_prefix_with_fewer_than_three_segments_is_invalid() {
    let inputs = ["dp", "dp.", "dp.pt", "dp.sa", "dpstabcdef", "dp_pt_abcdef"];

    for raw in inputs {
        assert!(
            matches!(classify(Some(raw)), Err(ClassificationError::InvalidFormat { .. })),
            "{}",
            raw
        );
    }
}

#[test]
fn test_unknown_type_code_is_not_silently_accepted() {
    for raw in ["dp.xx.abcdef", "dp.PT.abcdef", "dp.ptx.abcdef", "dp.p.t"] {
        assert!(
            matches!(classify(Some(raw)), Err(ClassificationError::UnrecognizedType { .. })),
            "{}",
            raw
        );
    }
}

#[test]
fn test_absent_or_empty_is_missing() {
    assert_eq!(classify(None), Err(ClassificationError::MissingToken));
    assert_eq!(classify(Some("")), Err(ClassificationError::MissingToken));
}

#[test]
fn test_classification_is_idempotent() {
    let inputs = ["dp.pt.a", "dp.st.b", "dp.sa.c", "dp.xx.d", "dp.pt", "nope", ""];

    for raw in inputs {
        let first = classify(Some(raw));
        let second = classify(Some(raw));
        assert_eq!(first, second, "{}", raw);
    }
}
