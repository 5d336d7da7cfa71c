//! Typed goals for the knowledge base.
//!
//! Callers never build query text. They construct a [`Goal`] and the
//! [`Display`](std::fmt::Display) implementation renders it to the reasoner's
//! predicate syntax. The predicate names below are the contract with the
//! external knowledge files.

use std::fmt;

/// One request against the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Every genre, in enumeration order.
    AllGenres,
    /// Every property used anywhere in the taxonomy.
    AllProperties,
    /// A genre's property list, inheritance resolved by the knowledge base.
    PropertiesOf(String),
    /// A genre's parent chain, nearest first.
    AncestorsOf(String),
    /// A genre's free-text description.
    DescriptionOf(String),
    /// Genres holding exactly this property token.
    GenresWithProperty(String),
    /// Genres holding this property, compared in normalized form.
    GenresWithFormattedProperty(String),
    /// The raw property list stored in a genre's frame.
    FrameOf(String),
}

impl Goal {
    /// Name of the variable whose binding answers this goal.
    pub fn result_var(&self) -> &'static str {
        match self {
            Goal::AllGenres | Goal::GenresWithProperty(_) | Goal::GenresWithFormattedProperty(_) => {
                "GenreList"
            }
            Goal::AllProperties | Goal::PropertiesOf(_) => "PropertyList",
            Goal::AncestorsOf(_) => "HierarchyList",
            Goal::DescriptionOf(_) => "Description",
            Goal::FrameOf(_) => "Properties",
        }
    }

    /// The property token of a direct membership query, if this is one.
    ///
    /// A failing membership query is recovered by scanning frames for this
    /// token directly.
    pub fn membership_property(&self) -> Option<&str> {
        match self {
            Goal::GenresWithProperty(property) => Some(property),
            _ => None,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let var = self.result_var();
        match self {
            Goal::AllGenres => write!(f, "obtener_todos_los_generos({var})"),
            Goal::AllProperties => write!(f, "todas_propiedades({var})"),
            Goal::PropertiesOf(genre) => write!(f, "propiedadesc({}, {var})", term(genre)),
            Goal::AncestorsOf(genre) => write!(f, "jerarquia_clase({}, {var})", term(genre)),
            Goal::DescriptionOf(genre) => {
                write!(f, "obtiene_descripcion({}, {var})", term(genre))
            }
            Goal::GenresWithProperty(property) => {
                write!(f, "tiene_propiedad({}, {var})", term(property))
            }
            Goal::GenresWithFormattedProperty(property) => write!(
                f,
                "buscar_propiedad_formateada({}, {var})",
                quoted(&normalize_spacing(property))
            ),
            Goal::FrameOf(genre) => write!(f, "frame({}, _, {var}, _)", term(genre)),
        }
    }
}

// ---------------------------------------------------------------------------
// Term rendering
// ---------------------------------------------------------------------------

/// Render an identifier as a term: unchanged when it is a bare atom or a
/// compound term, single-quoted otherwise.
pub fn term(identifier: &str) -> String {
    let identifier = identifier.trim();
    if is_bare_atom(identifier) || is_compound(identifier) {
        identifier.to_string()
    } else {
        quoted(identifier)
    }
}

/// Single-quote `text`, escaping backslashes and quotes.
pub fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Replace runs of whitespace with a single underscore.
pub fn normalize_spacing(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join("_")
}

/// `true` for tokens the reasoner reads as an atom without quotes:
/// a lowercase letter followed by letters, digits or underscores.
pub fn is_bare_atom(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `true` for `name(args)` terms with a bare-atom name whose arguments are
/// each a bare atom or a number. `tempo(Fast)` would pass a variable and
/// `era(1980s)` is a syntax error, so both get quoted instead.
pub fn is_compound(token: &str) -> bool {
    let Some(args) = token
        .strip_suffix(')')
        .and_then(|rest| rest.split_once('('))
        .filter(|(name, _)| is_bare_atom(name))
        .map(|(_, args)| args)
    else {
        return false;
    };
    args.split(',').map(str::trim).all(|arg| is_bare_atom(arg) || is_number(arg))
}

/// Integers and decimals, optionally negative.
fn is_number(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "0"));
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && all_digits(fraction)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
