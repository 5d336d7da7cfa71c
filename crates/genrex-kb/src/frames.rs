//! In-memory frame table loaded from a TOML knowledge file.
//!
//! A knowledge file is a flat list of genre frames:
//!
//! ```toml
//! root = "top"
//!
//! [[genre]]
//! name = "hard_rock"
//! parent = "rock"
//! properties = ["distortion", "tempo(fast)"]
//! description = "Louder, heavier rock."
//! ```
//!
//! Frames inherit their ancestors' properties. A compound property
//! (`type(value)`) declared on a frame hides any inherited property of the
//! same type, so `hard_rock` above reports `tempo(fast)` even when `rock`
//! declares `tempo(medium)`.

use genrex_core::{
    error::KbError,
    gateway::DEFAULT_ROOT,
    parse::{render_list, strip_quotes},
    query::{normalize_spacing, quoted},
    Goal, KnowledgeStore, Property,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The sample taxonomy compiled into the binary.
pub const BUNDLED: &str = include_str!("../data/genres.toml");

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct KnowledgeFile {
    #[serde(default = "default_root")]
    root: String,
    #[serde(default, rename = "genre")]
    genres: Vec<GenreEntry>,
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

/// One `[[genre]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreEntry {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Why a knowledge file was rejected.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid knowledge file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("genre `{0}` is declared more than once")]
    Duplicate(String),

    #[error("genre `{0}` has the root's name")]
    ShadowsRoot(String),

    #[error("genre `{genre}` names unknown parent `{parent}`")]
    UnknownParent { genre: String, parent: String },

    #[error("genre `{0}` is its own ancestor")]
    Cycle(String),

    #[error("{what} `{name}` contains one of , ' \" [ ] which list answers cannot carry")]
    Unlistable { what: &'static str, name: String },
}

/// Characters the list answer format splits or strips on.
const UNLISTABLE: [char; 5] = [',', '\'', '"', '[', ']'];

fn listable(what: &'static str, name: &str) -> Result<(), LoadError> {
    if name.contains(UNLISTABLE) {
        return Err(LoadError::Unlistable {
            what,
            name: name.to_string(),
        });
    }
    Ok(())
}

impl From<LoadError> for KbError {
    fn from(err: LoadError) -> Self {
        KbError::Connection(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// FrameStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Frame {
    name: String,
    parent: String,
    properties: Vec<String>,
    description: Option<String>,
}

/// A [`KnowledgeStore`] answering goals from an in-memory frame table.
#[derive(Debug, Clone)]
pub struct FrameStore {
    root: String,
    frames: Vec<Frame>,
    index: HashMap<String, usize>,
    source: String,
}

impl FrameStore {
    /// Parse and validate a knowledge file held in memory.
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        let file: KnowledgeFile = toml::from_str(text)?;
        Self::from_entries(file.root, file.genres)
    }

    /// Read a knowledge file from disk.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::from_toml_str(&text)?;
        store.source = path.display().to_string();
        tracing::debug!(path = %path.display(), genres = store.frames.len(), "loaded knowledge file");
        Ok(store)
    }

    /// The sample taxonomy shipped with genrex.
    pub fn bundled() -> Result<Self, LoadError> {
        let mut store = Self::from_toml_str(BUNDLED)?;
        store.source = "bundled".to_string();
        Ok(store)
    }

    /// Build a store from already-parsed entries.
    pub fn from_entries(
        root: impl Into<String>,
        entries: Vec<GenreEntry>,
    ) -> Result<Self, LoadError> {
        let root = root.into().trim().to_string();
        listable("root", &root)?;
        let mut frames = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());

        for entry in entries {
            let name = entry.name.trim().to_string();
            listable("genre", &name)?;
            if name == root {
                return Err(LoadError::ShadowsRoot(name));
            }
            if index.insert(name.clone(), frames.len()).is_some() {
                return Err(LoadError::Duplicate(name));
            }
            let parent = entry
                .parent
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| root.clone());
            let properties: Vec<String> = entry
                .properties
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            for property in &properties {
                listable("property", property)?;
            }
            frames.push(Frame {
                name,
                parent,
                properties,
                description: entry.description,
            });
        }

        let store = Self {
            root,
            frames,
            index,
            source: "inline".to_string(),
        };
        store.validate()?;
        Ok(store)
    }

    fn validate(&self) -> Result<(), LoadError> {
        for frame in &self.frames {
            if frame.parent != self.root && !self.index.contains_key(&frame.parent) {
                return Err(LoadError::UnknownParent {
                    genre: frame.name.clone(),
                    parent: frame.parent.clone(),
                });
            }
        }

        for frame in &self.frames {
            let mut seen = HashSet::new();
            let mut current = frame;
            while current.parent != self.root {
                if !seen.insert(current.name.as_str()) {
                    return Err(LoadError::Cycle(frame.name.clone()));
                }
                current = &self.frames[self.index[&current.parent]];
            }
        }
        Ok(())
    }

    /// Root sentinel of this taxonomy.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Genre names in file order.
    pub fn genre_names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.name.as_str())
    }

    fn frame(&self, name: &str) -> Option<&Frame> {
        self.index.get(name.trim()).map(|&i| &self.frames[i])
    }

    /// Frames from `frame`'s parent up to the last frame below the root.
    fn ancestors<'a>(&'a self, frame: &'a Frame) -> impl Iterator<Item = &'a Frame> + 'a {
        std::iter::successors(self.frame(&frame.parent), move |f| self.frame(&f.parent))
    }

    /// Own properties followed by inherited ones, nearest frame first.
    fn resolved_properties(&self, frame: &Frame) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();
        let mut kinds: HashSet<String> = HashSet::new();

        for current in std::iter::once(frame).chain(self.ancestors(frame)) {
            for property in &current.properties {
                if resolved.contains(property) {
                    continue;
                }
                if let Property::Compound { kind, .. } = Property::parse(property) {
                    if !kinds.insert(kind.to_string()) {
                        continue;
                    }
                }
                resolved.push(property.clone());
            }
        }
        resolved
    }

    fn all_properties(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.frames
            .iter()
            .flat_map(|f| f.properties.iter())
            .filter(|p| seen.insert(p.as_str()))
            .cloned()
            .collect()
    }

    fn holders(&self, mut predicate: impl FnMut(&str) -> bool) -> Vec<&str> {
        self.frames
            .iter()
            .filter(|f| self.resolved_properties(f).iter().any(|p| predicate(p.as_str())))
            .map(|f| f.name.as_str())
            .collect()
    }
}

/// Spelling-insensitive form used by the formatted-property goal.
fn formatted(token: &str) -> String {
    normalize_spacing(&strip_quotes(token.trim()).replace(['\'', '"'], "")).to_lowercase()
}

impl KnowledgeStore for FrameStore {
    fn solve(&mut self, goal: &Goal) -> Result<Option<String>, KbError> {
        let answer = match goal {
            Goal::AllGenres => Some(render_list(&self.genre_names().collect::<Vec<_>>())),
            Goal::AllProperties => Some(render_list(&self.all_properties())),
            Goal::PropertiesOf(genre) => self
                .frame(genre)
                .map(|f| render_list(&self.resolved_properties(f))),
            Goal::AncestorsOf(genre) => self.frame(genre).map(|f| {
                let mut chain: Vec<&str> = self.ancestors(f).map(|a| a.name.as_str()).collect();
                chain.push(&self.root);
                render_list(&chain)
            }),
            Goal::DescriptionOf(genre) => self
                .frame(genre)
                .and_then(|f| f.description.as_deref())
                .map(quoted),
            Goal::GenresWithProperty(property) => {
                let property = property.trim();
                Some(render_list(&self.holders(|p| p == property)))
            }
            Goal::GenresWithFormattedProperty(property) => {
                let wanted = formatted(property);
                Some(render_list(&self.holders(|p| formatted(p) == wanted)))
            }
            Goal::FrameOf(genre) => self.frame(genre).map(|f| render_list(&f.properties)),
        };
        Ok(answer)
    }

    fn describe_backend(&self) -> String {
        format!("frames ({})", self.source)
    }

    fn declared_root(&self) -> Option<&str> {
        Some(&self.root)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SMALL: &str = r#"
        [[genre]]
        name = "rock"
        properties = ["electric_guitar", "tempo(medium)"]
        description = "Loud."

        [[genre]]
        name = "hard_rock"
        parent = "rock"
        properties = ["distortion", "tempo(fast)"]

        [[genre]]
        name = "hip hop"
        properties = ["rapping"]
    "#;

    fn small() -> FrameStore {
        FrameStore::from_toml_str(SMALL).unwrap()
    }

    fn ask(store: &mut FrameStore, goal: Goal) -> Option<String> {
        store.solve(&goal).unwrap()
    }

    #[rstest]
    #[case(Goal::AllGenres, Some("[rock,hard_rock,'hip hop']"))]
    #[case(Goal::AllProperties, Some("[electric_guitar,tempo(medium),distortion,tempo(fast),rapping]"))]
    #[case(Goal::PropertiesOf("hard_rock".into()), Some("[distortion,tempo(fast),electric_guitar]"))]
    #[case(Goal::AncestorsOf("hard_rock".into()), Some("[rock,top]"))]
    #[case(Goal::AncestorsOf("rock".into()), Some("[top]"))]
    #[case(Goal::DescriptionOf("rock".into()), Some("'Loud.'"))]
    #[case(Goal::DescriptionOf("hard_rock".into()), None)]
    #[case(Goal::GenresWithProperty("electric_guitar".into()), Some("[rock,hard_rock]"))]
    #[case(Goal::GenresWithProperty("tempo(medium)".into()), Some("[rock]"))]
    #[case(Goal::GenresWithProperty("polka".into()), Some("[]"))]
    #[case(Goal::GenresWithFormattedProperty("Electric Guitar".into()), Some("[rock,hard_rock]"))]
    #[case(Goal::FrameOf("hard_rock".into()), Some("[distortion,tempo(fast)]"))]
    #[case(Goal::PropertiesOf("polka".into()), None)]
    #[case(Goal::FrameOf("polka".into()), None)]
    fn answers_goals(#[case] goal: Goal, #[case] expected: Option<&str>) {
        assert_eq!(ask(&mut small(), goal).as_deref(), expected);
    }

    #[test]
    fn root_comes_from_the_file() {
        let store = FrameStore::from_toml_str(
            "root = \"raiz\"\n[[genre]]\nname = \"rock\"\n",
        )
        .unwrap();
        assert_eq!(store.root(), "raiz");
        assert_eq!(store.declared_root(), Some("raiz"));
    }

    #[test]
    fn rejects_duplicates() {
        let err = FrameStore::from_toml_str(
            "[[genre]]\nname = \"rock\"\n[[genre]]\nname = \"rock\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Duplicate(name) if name == "rock"));
    }

    #[test]
    fn rejects_unknown_parents() {
        let err = FrameStore::from_toml_str(
            "[[genre]]\nname = \"bebop\"\nparent = \"jazz\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::UnknownParent { .. }));
    }

    #[test]
    fn rejects_cycles() {
        let err = FrameStore::from_toml_str(
            "[[genre]]\nname = \"a\"\nparent = \"b\"\n[[genre]]\nname = \"b\"\nparent = \"a\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Cycle(_)));
    }

    #[test]
    fn rejects_genres_named_like_the_root() {
        let err = FrameStore::from_toml_str("[[genre]]\nname = \"top\"\n").unwrap_err();
        assert!(matches!(err, LoadError::ShadowsRoot(_)));
    }

    #[rstest]
    #[case::comma_in_genre("[[genre]]\nname = \"rhythm, blues\"\n", "rhythm, blues")]
    #[case::quote_in_genre("[[genre]]\nname = \"rock'n'roll\"\n", "rock'n'roll")]
    #[case::bracket_in_property(
        "[[genre]]\nname = \"rock\"\nproperties = [\"tags[live]\"]\n",
        "tags[live]"
    )]
    #[case::two_argument_property(
        "[[genre]]\nname = \"jazz\"\nproperties = [\"origin(new_orleans, usa)\"]\n",
        "origin(new_orleans, usa)"
    )]
    #[case::root("root = \"\\\"top\\\"\"\n", "\"top\"")]
    fn rejects_names_list_answers_cannot_carry(#[case] text: &str, #[case] name: &str) {
        let err = FrameStore::from_toml_str(text).unwrap_err();
        assert!(
            matches!(&err, LoadError::Unlistable { name: n, .. } if n == name),
            "{err}"
        );
    }

    #[test]
    fn load_errors_become_connection_errors() {
        let err: KbError = LoadError::Duplicate("rock".into()).into();
        assert!(matches!(err, KbError::Connection(msg) if msg.contains("rock")));
    }

    #[test]
    fn bundled_taxonomy_is_valid() {
        let mut store = FrameStore::bundled().unwrap();
        assert_eq!(store.describe_backend(), "frames (bundled)");
        let genres = ask(&mut store, Goal::AllGenres).unwrap();
        assert!(genres.contains("hard_rock"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kb.toml");
        std::fs::write(&path, SMALL).unwrap();
        let store = FrameStore::load(&path).unwrap();
        assert_eq!(store.genre_names().count(), 3);

        let missing = FrameStore::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));
    }
}
