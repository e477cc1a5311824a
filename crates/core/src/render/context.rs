//! Values substituted into templates.

use std::collections::BTreeMap;

use serde::Serialize;

/// Underline style of a formatted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Underline {
    Single,
    Thick,
}

impl Underline {
    /// Value of the `w:val` attribute of `<w:u>`.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Underline::Single => "single",
            Underline::Thick => "thick",
        }
    }
}

/// A piece of text with its own character formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub underline: Option<Underline>,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn underline(mut self, style: Underline) -> Self {
        self.underline = Some(style);
        self
    }

    pub fn is_formatted(&self) -> bool {
        self.bold || self.underline.is_some()
    }
}

/// Formatted text made of one or more runs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RichText {
    pub runs: Vec<StyledRun>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, run: StyledRun) -> Self {
        self.runs.push(run);
        self
    }

    /// The text without formatting.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl From<StyledRun> for RichText {
    fn from(run: StyledRun) -> Self {
        Self { runs: vec![run] }
    }
}

/// A single context value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RenderValue {
    Text(String),
    Rich(RichText),
}

impl RenderValue {
    pub fn plain_text(&self) -> String {
        match self {
            RenderValue::Text(text) => text.clone(),
            RenderValue::Rich(rich) => rich.plain_text(),
        }
    }
}

impl From<String> for RenderValue {
    fn from(text: String) -> Self {
        RenderValue::Text(text)
    }
}

impl From<&str> for RenderValue {
    fn from(text: &str) -> Self {
        RenderValue::Text(text.to_string())
    }
}

impl From<RichText> for RenderValue {
    fn from(rich: RichText) -> Self {
        RenderValue::Rich(rich)
    }
}

/// Key/value mapping handed to a [`Renderer`](super::Renderer).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: BTreeMap<String, RenderValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RenderValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RenderValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RenderValue> {
        self.values.get(key)
    }

    /// Plain text of a value, if present.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(RenderValue::plain_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay `other` on top of this context. Keys in `other` win.
    pub fn extend(&mut self, other: RenderContext) {
        self.values.extend(other.values);
    }
}
