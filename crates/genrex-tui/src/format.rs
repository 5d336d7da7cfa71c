//! Text rendering for genres, properties and search results.
//!
//! Knowledge-base identifiers are snake_case atoms; everything shown to the
//! user goes through [`format_display_text`] (underscores to spaces, words
//! capitalised). The builders here return plain text so the same output can
//! be printed by the CLI or drawn in a ratatui pane.

use genrex_core::{Explorer, KnowledgeStore, MatchMode, SearchRequest};
use serde::Serialize;

/// Upper-case the first letter of each whitespace-separated word and
/// lower-case the rest. Runs of whitespace collapse to one space.
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Display form of a genre name.
pub fn format_display_text(text: &str) -> String {
    capitalize_words(&text.replace('_', " "))
}

/// Display form of a property. Properties containing `:` keep their case.
pub fn format_property_text(property: &str) -> String {
    let property = property.trim();
    if property.is_empty() {
        return String::new();
    }
    if property.contains(':') {
        return property.replace('_', " ");
    }
    format_display_text(property)
}

/// Display form of a description.
pub fn format_description(description: &str) -> String {
    description.replace('_', " ")
}

fn count_genres(n: usize) -> String {
    if n == 1 {
        "1 genre".to_string()
    } else {
        format!("{n} genres")
    }
}

fn share(found: usize, total: usize) -> Option<String> {
    (total > 0).then(|| format!("{:.1}%", found as f64 * 100.0 / total as f64))
}

// ---------------------------------------------------------------------------
// Genre detail
// ---------------------------------------------------------------------------

/// Everything the detail pane shows about one genre.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreDetail {
    pub genre: String,
    /// Parents, nearest first, root excluded.
    pub ancestors: Vec<String>,
    pub properties: Vec<String>,
    pub description: String,
}

impl GenreDetail {
    pub fn load<S: KnowledgeStore>(explorer: &mut Explorer<S>, genre: &str) -> Self {
        let genre = genre.trim();
        Self {
            genre: genre.to_string(),
            ancestors: explorer.ancestors(genre),
            properties: explorer.properties(genre),
            description: explorer.description(genre),
        }
    }

    /// Lines for the detail pane.
    pub fn lines(&self) -> Vec<String> {
        let title = format_display_text(&self.genre);
        let mut lines = vec![title.clone(), "─".repeat(title.chars().count())];

        for ancestor in &self.ancestors {
            lines.push(format!("Is a kind of: {}", format_display_text(ancestor)));
        }

        lines.push(String::new());
        lines.push("Properties".to_string());
        if self.properties.is_empty() {
            lines.push("  (none)".to_string());
        }
        for property in &self.properties {
            lines.push(format!("  {}", property.trim()));
        }

        if !self.description.is_empty() {
            lines.push(String::new());
            lines.push("Description".to_string());
            lines.push(format!("  {}", format_description(&self.description)));
        }
        lines
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

fn mode_description(mode: MatchMode) -> &'static str {
    match mode {
        MatchMode::All => "genres that have ALL selected properties",
        MatchMode::Any => "genres that have AT LEAST ONE of the selected properties",
    }
}

/// Results pane text for a multi-property search.
///
/// The share of all genres is shown only for ALL searches over more than one
/// property. An empty `results` reads the same whether nothing matched or
/// the knowledge base failed.
pub fn search_results_text(request: &SearchRequest, results: &[String], total_genres: usize) -> String {
    let mut lines = vec![format!("Selected properties ({}):", request.len())];
    for (i, property) in request.properties().iter().enumerate() {
        lines.push(format!("  {}. {}", i + 1, format_property_text(property)));
    }
    lines.push(String::new());
    lines.push(format!("Search: {}", mode_description(request.mode)));
    lines.push(String::new());

    if results.is_empty() {
        lines.push("No genres found".to_string());
        lines.push("Try fewer properties, or switch to ANY if you used ALL.".to_string());
        return lines.join("\n");
    }

    lines.push("Genres found:".to_string());
    for (i, genre) in results.iter().enumerate() {
        lines.push(format!("{:>2}. {}", i + 1, format_display_text(genre)));
    }
    lines.push(String::new());
    lines.push(format!("Total found: {}", count_genres(results.len())));

    if request.mode == MatchMode::All && request.len() > 1 {
        if let Some(pct) = share(results.len(), total_genres) {
            lines.push(format!("Share of all genres: {pct}"));
        }
    }
    lines.join("\n")
}

/// Results pane text for a single property previewed from the picker.
pub fn single_property_text(property: &str, results: &[String], total_genres: usize) -> String {
    let mut lines = vec![
        format!("Property: {}", format_property_text(property)),
        String::new(),
    ];

    if results.is_empty() {
        lines.push("No genres found with this property.".to_string());
        lines.push("Try another property, or select several with Space.".to_string());
        return lines.join("\n");
    }

    lines.push("Genres found:".to_string());
    for genre in results {
        lines.push(format!("  • {}", format_display_text(genre)));
    }
    lines.push(String::new());
    lines.push(format!("Total: {}", count_genres(results.len())));
    if let Some(pct) = share(results.len(), total_genres) {
        lines.push(format!("Share of all genres: {pct}"));
    }
    lines.join("\n")
}

/// Results pane text while nothing is selected.
pub fn instructions_text() -> String {
    [
        "Search by properties",
        "",
        "1. Move through the property list with ↑/↓ or j/k",
        "2. Press Space to add or remove a property",
        "3. Press m to switch between ALL and ANY",
        "4. Results update as the selection changes",
        "",
        "Enter previews the property under the cursor on its own.",
        "Press / to filter the property list.",
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
