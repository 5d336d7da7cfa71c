//! A [`KnowledgeStore`] that answers from a script and records every goal it
//! was asked.
//!
//! Unscripted goals have no solution. Scripted failures let harnesses drive
//! the cascade's recovery paths without a real reasoner.

use genrex_core::{parse::render_list, Goal, KbError, KnowledgeStore};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ScriptedStore {
    answers: HashMap<Goal, Result<Option<String>, KbError>>,
    /// Every goal received, in order.
    pub calls: Vec<Goal>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store shaped like a frame table: enumeration in the given order,
    /// direct membership answers for every property, and frame records.
    /// Formatted queries stay unscripted.
    pub fn catalogue(genres: &[(&str, &[&str])]) -> Self {
        let names: Vec<&str> = genres.iter().map(|(g, _)| *g).collect();
        let mut store = Self::new().answer(Goal::AllGenres, render_list(&names));

        let mut holders: Vec<(&str, Vec<&str>)> = Vec::new();
        for (genre, properties) in genres {
            store = store.answer(Goal::FrameOf(genre.to_string()), render_list(properties));
            store = store.answer(Goal::PropertiesOf(genre.to_string()), render_list(properties));
            for property in *properties {
                match holders.iter().position(|(p, _)| p == property) {
                    Some(i) => holders[i].1.push(*genre),
                    None => holders.push((*property, vec![*genre])),
                }
            }
        }
        for (property, found) in holders {
            store = store.answer(Goal::GenresWithProperty(property.to_string()), render_list(&found));
        }
        store
    }

    /// Answer `goal` with the raw binding `raw`.
    pub fn answer(mut self, goal: Goal, raw: impl Into<String>) -> Self {
        self.answers.insert(goal, Ok(Some(raw.into())));
        self
    }

    /// Report no solution for `goal` (explicitly, overriding a catalogue answer).
    pub fn no_solution(mut self, goal: Goal) -> Self {
        self.answers.insert(goal, Ok(None));
        self
    }

    /// Fail `goal` with `error`.
    pub fn fail(mut self, goal: Goal, error: KbError) -> Self {
        self.answers.insert(goal, Err(error));
        self
    }

    /// Number of goals received so far.
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// How often `goal` was asked.
    pub fn calls_to(&self, goal: &Goal) -> usize {
        self.calls.iter().filter(|g| *g == goal).count()
    }
}

impl KnowledgeStore for ScriptedStore {
    fn solve(&mut self, goal: &Goal) -> Result<Option<String>, KbError> {
        self.calls.push(goal.clone());
        self.answers.get(goal).cloned().unwrap_or(Ok(None))
    }

    fn describe_backend(&self) -> String {
        "scripted".to_string()
    }
}
