//! Frame store integration harness.
//!
//! # What this covers
//!
//! - **Goal coverage**: every goal kind the gateway issues gets an answer
//!   the list parser accepts, read back through [`QueryGateway`].
//! - **Inheritance**: a genre's properties are its own followed by its
//!   ancestors', with the nearer frame overriding a compound property of
//!   the same type.
//! - **Root exclusion**: the root never appears as a genre or an ancestor.
//! - **Knowledge files**: round trip through disk, and every broken file is
//!   rejected with a readable reason.
//! - **Bundled taxonomy**: loads, is non-trivial, and is searchable.
//!
//! # Running
//!
//! ```sh
//! cargo test --test store_harness
//! ```

mod common;
use common::*;

use genrex_core::{Explorer, Goal, KbError, KnowledgeStore, QueryGateway};
use genrex_kb::FrameStore;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

#[fixture]
fn family() -> QueryGateway<FrameStore> {
    QueryGateway::new(FrameStore::from_toml_str(FAMILY_TOML).unwrap())
}

// ---------------------------------------------------------------------------
// Goal coverage
// ---------------------------------------------------------------------------

#[rstest]
fn enumeration_keeps_file_order_without_the_root(mut family: QueryGateway<FrameStore>) {
    assert_genres!(
        family.list_all_genres().unwrap(),
        ["rock", "hard_rock", "heavy_metal", "jazz"]
    );
}

#[rstest]
fn ancestors_are_nearest_first(mut family: QueryGateway<FrameStore>) {
    assert_genres!(family.list_ancestors("heavy_metal").unwrap(), ["hard_rock", "rock"]);
    assert_genres!(family.list_ancestors("jazz").unwrap(), []);
    assert_genres!(family.list_ancestors("top").unwrap(), []);
}

#[rstest]
fn the_store_itself_ends_ancestor_chains_with_the_root(mut family: QueryGateway<FrameStore>) {
    let raw = family
        .list(&Goal::AncestorsOf("hard_rock".into()))
        .unwrap();
    assert_genres!(raw, ["rock", "top"]);
}

#[rstest]
fn properties_inherit_with_nearer_compounds_winning(mut family: QueryGateway<FrameStore>) {
    assert_genres!(
        family.list_properties("heavy_metal").unwrap(),
        ["loud", "era(1970s)", "distortion", "tempo(fast)", "electric_guitar"]
    );
}

#[rstest]
fn frame_records_hold_declared_properties_only(mut family: QueryGateway<FrameStore>) {
    let record = family.frame_record("hard_rock").unwrap().unwrap();
    assert_eq!(record, "[distortion,tempo(fast)]");
}

#[rstest]
fn all_properties_in_first_seen_order(mut family: QueryGateway<FrameStore>) {
    assert_genres!(
        family.list_all_properties().unwrap(),
        [
            "electric_guitar",
            "tempo(medium)",
            "era(1950s)",
            "distortion",
            "tempo(fast)",
            "loud",
            "era(1970s)",
            "improvised",
            "swing"
        ]
    );
}

#[rstest]
#[case::declared("distortion", &["hard_rock", "heavy_metal"])]
#[case::inherited("electric_guitar", &["rock", "hard_rock", "heavy_metal"])]
#[case::overridden("tempo(medium)", &["rock"])]
#[case::unknown("polka", &[])]
fn membership_uses_resolved_properties(
    mut family: QueryGateway<FrameStore>,
    #[case] property: &str,
    #[case] expected: &[&str],
) {
    assert_eq!(family.genres_with_property(property), names(expected));
}

#[rstest]
fn formatted_membership_tolerates_display_spelling(mut family: QueryGateway<FrameStore>) {
    let found = family
        .list(&Goal::GenresWithFormattedProperty("Electric Guitar".into()))
        .unwrap();
    assert_genres!(found, ["rock", "hard_rock", "heavy_metal"]);
}

#[rstest]
fn descriptions_are_quoted_text(mut family: QueryGateway<FrameStore>) {
    assert_eq!(family.describe("rock"), "Guitar_driven popular music.");
    assert_eq!(family.describe("hard_rock"), "");
    assert_eq!(family.describe("polka"), "");
}

#[rstest]
#[case(Goal::PropertiesOf("polka".into()))]
#[case(Goal::AncestorsOf("polka".into()))]
#[case(Goal::DescriptionOf("polka".into()))]
#[case(Goal::FrameOf("polka".into()))]
fn unknown_genres_have_no_solution(#[case] goal: Goal) {
    let mut store = FrameStore::from_toml_str(FAMILY_TOML).unwrap();
    assert_eq!(store.solve(&goal), Ok(None));
}

// ---------------------------------------------------------------------------
// Knowledge files
// ---------------------------------------------------------------------------

#[test]
fn knowledge_files_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mini.toml");
    let text = TaxonomyBuilder::new()
        .root("music")
        .genre("folk", &["acoustic", "origin(anywhere)"])
        .described("Songs of the people.")
        .child("anti_folk", "folk", &["irony"])
        .toml();
    std::fs::write(&path, text).unwrap();

    let store = FrameStore::load(&path).unwrap();
    assert_eq!(store.declared_root(), Some("music"));
    assert!(store.describe_backend().contains("mini.toml"));

    let mut explorer = Explorer::new(QueryGateway::new(store).with_root("music"));
    assert_genres!(explorer.ancestors("anti_folk"), ["folk"]);
    assert_genres!(
        explorer.properties("anti_folk"),
        ["irony", "acoustic", "origin(anywhere)"]
    );
    assert_eq!(explorer.description("folk"), "Songs of the people.");
}

#[rstest]
fn broken_files_are_rejected(#[values(0, 1, 2, 3, 4, 5, 6)] case: usize) {
    let (text, reason) = BROKEN_FILES[case];
    let err = FrameStore::from_toml_str(text).unwrap_err();
    assert!(
        err.to_string().contains(reason),
        "expected {reason:?} in {err}"
    );
    assert!(matches!(KbError::from(err), KbError::Connection(_)));
}

#[test]
fn names_that_would_split_or_mangle_in_answers_are_refused() {
    let taxonomy = TaxonomyBuilder::new()
        .genre("rock'n'roll", &["shuffle"])
        .genre("rhythm, blues", &["shuffle"])
        .toml();
    let err = FrameStore::from_toml_str(&taxonomy).unwrap_err();
    assert!(err.to_string().contains("rock'n'roll"), "{err}");
}

#[test]
fn a_missing_file_names_the_path() {
    let err = FrameStore::load(std::path::Path::new("/nonexistent/kb.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/kb.toml"));
}

// ---------------------------------------------------------------------------
// Bundled taxonomy
// ---------------------------------------------------------------------------

#[test]
fn bundled_taxonomy_is_searchable() {
    let mut explorer = Explorer::from_store(FrameStore::bundled().unwrap());
    assert_eq!(explorer.genre_count(), 20);
    assert!(!explorer.available_properties().is_empty());

    // trap inherits the drum machine from hip hop
    let found = explorer.search(&all_of(&["drum_machine", "808_bass"])).unwrap();
    assert_genres!(found, ["trap"]);

    let chicago = explorer.search(&any_of(&["origin(chicago)"])).unwrap();
    assert_genres!(chicago, ["chicago_blues", "house"]);
}
