//! Domain-specific assertion macros for genrex harnesses.
//!
//! These wrap `pretty_assertions` and add failure messages that name the
//! search invariant that was violated.

// ---------------------------------------------------------------------------
// Result assertions
// ---------------------------------------------------------------------------

/// Assert that a result list equals the expected genres, in order.
///
/// ```rust
/// assert_genres!(explorer.search(&any_of(&["improvised"])).unwrap(), ["jazz", "blues"]);
/// ```
#[macro_export]
macro_rules! assert_genres {
    ($actual:expr, [$($genre:expr),* $(,)?]) => {{
        let actual: Vec<String> = $actual;
        let expected: Vec<String> = vec![$($genre.to_string()),*];
        pretty_assertions::assert_eq!(actual, expected, "genre list differs (order matters)");
    }};
}

/// Assert that every genre in `$sub` also appears in `$sup`.
#[macro_export]
macro_rules! assert_subset {
    ($sub:expr, $sup:expr) => {{
        let sub: &[String] = &$sub;
        let sup: &[String] = &$sup;
        let stray: Vec<&String> = sub.iter().filter(|g| !sup.contains(g)).collect();
        if !stray.is_empty() {
            panic!(
                "assert_subset! failed: {:?} not in superset.\n  subset:   {:?}\n  superset: {:?}",
                stray, sub, sup
            );
        }
    }};
}

/// Assert that `$results` keeps the relative order of `$enumeration`.
#[macro_export]
macro_rules! assert_enumeration_order {
    ($results:expr, $enumeration:expr) => {{
        let results: &[String] = &$results;
        let enumeration: &[String] = &$enumeration;
        let positions: Vec<usize> = results
            .iter()
            .map(|g| {
                enumeration
                    .iter()
                    .position(|e| e == g)
                    .unwrap_or_else(|| panic!("result {:?} is not an enumerated genre", g))
            })
            .collect();
        if positions.windows(2).any(|w| w[0] >= w[1]) {
            panic!(
                "assert_enumeration_order! failed:\n  results:     {:?}\n  enumeration: {:?}",
                results, enumeration
            );
        }
    }};
}
