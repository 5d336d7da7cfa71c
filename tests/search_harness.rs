//! Search layer integration harness.
//!
//! # What this covers
//!
//! - **Scenarios**: the rock/jazz/blues catalogue answers ALL and ANY
//!   searches with exactly the expected genres, in enumeration order, both
//!   from a scripted store and from a frame table.
//! - **Cascade fallback**: when the direct and formatted membership queries
//!   have no solution, the manual scan of frame records still finds the
//!   genre. A failing membership query is recovered the same way.
//! - **Empty selection**: rejected before a single goal reaches the store.
//! - **Property: single-property degeneracy**: for one property, ALL, ANY
//!   and the cascade agree.
//! - **Property: ALL ⊆ ANY** for random taxonomies and property pairs.
//! - **Property: idempotence**: the same search twice gives the same list.
//! - **Failure downgrade**: an unreachable store yields zero results, never
//!   an error.
//!
//! # Running
//!
//! ```sh
//! cargo test --test search_harness
//! ```

mod common;
use common::*;

use genrex_core::{
    cascade, search, Explorer, Goal, KbError, MatchMode, QueryGateway, RequestError,
    SearchRequest,
};
use proptest::prelude::*;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[rstest]
#[case::improvised_any(&["improvised"], MatchMode::Any, &["jazz", "blues"])]
#[case::improvised_all(&["improvised"], MatchMode::All, &["jazz", "blues"])]
#[case::electronic_and_improvised_all(&["electronic", "improvised"], MatchMode::All, &[])]
#[case::electronic_and_improvised_any(
    &["electronic", "improvised"],
    MatchMode::Any,
    &["rock", "jazz", "blues"]
)]
#[case::slow_and_improvised_all(&["slow_tempo", "improvised"], MatchMode::All, &["blues"])]
#[case::unknown_property(&["polka"], MatchMode::Any, &[])]
fn scenario_catalogue(
    #[case] properties: &[&str],
    #[case] mode: MatchMode,
    #[case] expected: &[&str],
) {
    let request = SearchRequest::from_properties(properties.iter().copied(), mode).unwrap();

    let mut scripted = Explorer::from_store(ScriptedStore::catalogue(SCENARIO));
    pretty_assertions::assert_eq!(scripted.search(&request).unwrap(), names(expected));

    let mut frames = flat_taxonomy(SCENARIO).explorer();
    pretty_assertions::assert_eq!(frames.search(&request).unwrap(), names(expected));
}

#[test]
fn results_follow_enumeration_not_selection_order() {
    let mut explorer = flat_taxonomy(SCENARIO).explorer();
    let found = explorer.search(&any_of(&["improvised", "electronic"])).unwrap();
    assert_enumeration_order!(found, explorer.genres());
    assert_genres!(found, ["rock", "jazz", "blues"]);
}

#[test]
fn search_results_serialize_stably() {
    let mut explorer = flat_taxonomy(SCENARIO).explorer();
    let found = explorer.search(&any_of(&["improvised"])).unwrap();
    insta::assert_json_snapshot!(found, @r#"
    [
      "jazz",
      "blues"
    ]
    "#);
}

// ---------------------------------------------------------------------------
// Cascade fallback
// ---------------------------------------------------------------------------

/// Direct and formatted queries have no solution; the frame record of `g`
/// contains the property text, so the manual scan finds it.
#[test]
fn manual_scan_finds_what_the_queries_miss() {
    let store = ScriptedStore::new()
        .answer(Goal::AllGenres, "[rock,g]")
        .answer(Goal::FrameOf("rock".into()), "[electric_guitar]")
        .answer(Goal::FrameOf("g".into()), "[tempo(fast), 'rare_groove']");
    let mut gateway = QueryGateway::new(store);

    let found = gateway.genres_with_property("rare_groove");
    assert_genres!(found, ["g"]);

    let store = gateway.store();
    assert_eq!(store.calls_to(&Goal::GenresWithProperty("rare_groove".into())), 1);
    assert_eq!(
        store.calls_to(&Goal::GenresWithFormattedProperty("rare_groove".into())),
        1
    );
}

#[test]
fn compound_properties_match_type_and_value_independently() {
    let store = ScriptedStore::new()
        .answer(Goal::AllGenres, "[house]")
        .answer(Goal::FrameOf("house".into()), "[origin(chicago), 'tempo( fast )']");
    let mut gateway = QueryGateway::new(store);
    assert_genres!(gateway.genres_with_property("tempo(fast)"), ["house"]);
}

/// Type and value found in unrelated properties still match.
#[test]
fn compound_scan_keeps_known_false_positives() {
    let store = ScriptedStore::new()
        .answer(Goal::AllGenres, "[odd]")
        .answer(Goal::FrameOf("odd".into()), "[era_tempo_notes, fast_food]");
    let mut gateway = QueryGateway::new(store);
    assert_genres!(gateway.genres_with_property("tempo(fast)"), ["odd"]);
}

#[test]
fn a_failing_membership_query_is_recovered_by_scanning() {
    let store = ScriptedStore::catalogue(SCENARIO).fail(
        Goal::GenresWithProperty("improvised".into()),
        KbError::query("tiene_propiedad(improvised, GenreList)", "syntax error"),
    );
    let mut gateway = QueryGateway::new(store);

    assert_genres!(gateway.genres_with_property("improvised"), ["jazz", "blues"]);
    // recovery skips the formatted query
    assert_eq!(
        gateway
            .store()
            .calls_to(&Goal::GenresWithFormattedProperty("improvised".into())),
        0
    );
}

#[test]
fn the_first_non_empty_strategy_wins() {
    let store = ScriptedStore::new()
        .answer(Goal::AllGenres, "[rock,jazz]")
        .answer(Goal::GenresWithFormattedProperty("fast tempo".into()), "[rock]")
        .answer(Goal::FrameOf("jazz".into()), "[fast tempo]");
    let mut gateway = QueryGateway::new(store);

    assert_genres!(cascade::resolve(&mut gateway, "fast tempo"), ["rock"]);
    assert_eq!(gateway.store().calls_to(&Goal::FrameOf("jazz".into())), 0);
}

// ---------------------------------------------------------------------------
// Input validation and failure downgrade
// ---------------------------------------------------------------------------

#[rstest]
#[case(MatchMode::All)]
#[case(MatchMode::Any)]
fn empty_selection_never_reaches_the_store(#[case] mode: MatchMode) {
    let mut store = ScriptedStore::catalogue(SCENARIO);
    let mut gateway = QueryGateway::new(&mut store);

    let err = search::search(&mut gateway, &SearchRequest::new(mode)).unwrap_err();
    assert_eq!(err, RequestError::EmptySelection);
    assert!(err.to_string().contains("select at least one property"));
    assert_eq!(store.call_count(), 0);
}

#[test]
fn an_unreachable_store_reads_as_no_matches() {
    let store = ScriptedStore::new().fail(
        Goal::AllGenres,
        KbError::Connection("swipl exited".into()),
    );
    let mut explorer = Explorer::from_store(store);
    assert_genres!(explorer.search(&any_of(&["improvised"])).unwrap(), []);
    assert_genres!(explorer.genres(), []);
    assert_eq!(explorer.genre_count(), 0);
}

#[test]
fn holders_are_resolved_once_per_property() {
    let mut store = ScriptedStore::catalogue(SCENARIO);
    {
        let mut gateway = QueryGateway::new(&mut store);
        search::search(&mut gateway, &all_of(&["electronic", "improvised"])).unwrap();
    }
    assert_eq!(store.calls_to(&Goal::GenresWithProperty("electronic".into())), 1);
    assert_eq!(store.calls_to(&Goal::GenresWithProperty("improvised".into())), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

const POOL: &[&str] = &["acoustic", "electric", "fast", "slow", "loud", "swing"];

/// Random flat taxonomies: up to 8 genres, each with a subset of POOL.
fn taxonomy() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(prop::sample::subsequence(POOL.to_vec(), 0..=POOL.len()), 1..8)
}

fn explorer_for(genres: &[Vec<&'static str>]) -> Explorer<genrex_kb::FrameStore> {
    let builder = genres
        .iter()
        .enumerate()
        .fold(TaxonomyBuilder::new(), |b, (i, props)| b.genre(&format!("g{i}"), props));
    builder.explorer()
}

proptest! {
    #[test]
    fn all_results_are_a_subset_of_any_results(
        genres in taxonomy(),
        pair in prop::sample::subsequence(POOL.to_vec(), 2),
    ) {
        let mut explorer = explorer_for(&genres);
        let all = explorer.search(&all_of(&pair)).unwrap();
        let any = explorer.search(&any_of(&pair)).unwrap();
        assert_subset!(all, any);
    }

    #[test]
    fn single_property_search_degenerates_to_the_cascade(
        genres in taxonomy(),
        property in prop::sample::select(POOL.to_vec()),
    ) {
        let mut explorer = explorer_for(&genres);
        let all = explorer.search(&all_of(&[property])).unwrap();
        let any = explorer.search(&any_of(&[property])).unwrap();
        let direct = explorer.gateway().genres_with_property(property);
        prop_assert_eq!(&all, &any);
        prop_assert_eq!(&all, &direct);
    }

    #[test]
    fn repeated_searches_are_identical(
        genres in taxonomy(),
        selection in prop::sample::subsequence(POOL.to_vec(), 1..=3),
        use_any in any::<bool>(),
    ) {
        let mut explorer = explorer_for(&genres);
        let request = if use_any { any_of(&selection) } else { all_of(&selection) };
        let first = explorer.search(&request).unwrap();
        let second = explorer.search(&request).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_result_is_an_enumerated_genre(
        genres in taxonomy(),
        selection in prop::sample::subsequence(POOL.to_vec(), 1..=3),
    ) {
        let mut explorer = explorer_for(&genres);
        let found = explorer.search(&any_of(&selection)).unwrap();
        let enumeration = explorer.genres();
        assert_enumeration_order!(found, enumeration);
    }
}
