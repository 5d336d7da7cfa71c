//! Static taxonomies used across harnesses.

/// Three unrelated genres, straight from the search scenarios.
pub const SCENARIO: &[(&str, &[&str])] = &[
    ("rock", &["electronic", "fast_tempo"]),
    ("jazz", &["improvised"]),
    ("blues", &["slow_tempo", "improvised"]),
];

/// A small hierarchy exercising inheritance and compound overrides.
pub const FAMILY_TOML: &str = r#"
root = "top"

[[genre]]
name = "rock"
properties = ["electric_guitar", "tempo(medium)", "era(1950s)"]
description = "Guitar_driven popular music."

[[genre]]
name = "hard_rock"
parent = "rock"
properties = ["distortion", "tempo(fast)"]

[[genre]]
name = "heavy_metal"
parent = "hard_rock"
properties = ["loud", "era(1970s)"]

[[genre]]
name = "jazz"
properties = ["improvised", "swing"]
description = "Improvised music with swing."
"#;

/// Knowledge files that must be rejected, with the error text they produce.
pub const BROKEN_FILES: &[(&str, &str)] = &[
    (
        "[[genre]]\nname = \"rock\"\n[[genre]]\nname = \"rock\"\n",
        "declared more than once",
    ),
    (
        "[[genre]]\nname = \"grunge\"\nparent = \"rokc\"\n",
        "unknown parent",
    ),
    (
        "[[genre]]\nname = \"a\"\nparent = \"b\"\n[[genre]]\nname = \"b\"\nparent = \"a\"\n",
        "its own ancestor",
    ),
    ("[[genre]]\nname = \"top\"\n", "root's name"),
    ("[[genre]\nname = \"rock\"\n", "invalid knowledge file"),
    (
        "[[genre]]\nname = \"rhythm, blues\"\nproperties = [\"shuffle\"]\n",
        "list answers cannot carry",
    ),
    (
        "[[genre]]\nname = \"rock'n'roll\"\nproperties = [\"shuffle\"]\n",
        "list answers cannot carry",
    ),
];
