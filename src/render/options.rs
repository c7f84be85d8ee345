//! Rendering options configuration.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};

/// Layout of rendered headlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum HeadlineStyle {
    /// `== Title ==`
    #[default]
    Atx,
    /// Title underlined with `=` or `-`
    Setext,
}

impl From<String> for HeadlineStyle {
    fn from(style: String) -> Self {
        match style.to_ascii_lowercase().as_str() {
            "atx" => HeadlineStyle::Atx,
            "setext" => HeadlineStyle::Setext,
            other => {
                warn!(style = other, "unsupported headline style, using atx");
                HeadlineStyle::Atx
            }
        }
    }
}

impl From<HeadlineStyle> for &'static str {
    fn from(style: HeadlineStyle) -> Self {
        match style {
            HeadlineStyle::Atx => "atx",
            HeadlineStyle::Setext => "setext",
        }
    }
}

/// Options for rendering documents.
///
/// Serialized keys are kebab-case (`with-todo-keywords`, `headline-style`, ...);
/// keys missing from an options file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderOptions {
    /// Include TODO keywords in headlines
    pub with_todo_keywords: bool,

    /// Include headline tags
    pub with_tags: bool,

    /// Include headline priority cookies
    pub with_priority: bool,

    /// Replace straight quotes with typographic ones
    pub with_smart_quotes: bool,

    /// Convert `---`, `--` and `...` to entities
    pub with_special_strings: bool,

    /// Keep line breaks inside paragraphs as hard breaks
    pub preserve_breaks: bool,

    /// Headline layout
    pub headline_style: HeadlineStyle,

    /// CSS class attached to every table
    pub default_table_class: Option<String>,

    /// Footnote marker template, one `%s` for the number
    pub footnote_reference_format: String,

    /// Inserted between directly adjacent footnote markers
    pub footnote_separator: String,

    /// Footnotes section template: `%s` title, then `%s` definitions
    pub footnotes_section_template: String,

    /// Extension replacing `.org` in links to other documents
    pub output_extension: String,

    /// File extensions recognized as inline images
    pub inline_image_extensions: Vec<String>,

    /// Language used for fixed strings
    pub language: String,

    /// Overrides for fixed strings, keyed by their English form
    pub translations: HashMap<String, String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            with_todo_keywords: true,
            with_tags: true,
            with_priority: false,
            with_smart_quotes: false,
            with_special_strings: true,
            preserve_breaks: false,
            headline_style: HeadlineStyle::Atx,
            default_table_class: Some("wikitable".to_string()),
            footnote_reference_format: "<sup>%s</sup>".to_string(),
            footnote_separator: "<sup>, </sup>".to_string(),
            footnotes_section_template: "== %s ==\n\n%s".to_string(),
            output_extension: "wiki".to_string(),
            inline_image_extensions: [
                "png", "jpg", "jpeg", "gif", "svg", "webp", "tif", "tiff", "bmp", "xpm", "pbm",
                "pgm", "ppm",
            ]
            .iter()
            .map(|ext| ext.to_string())
            .collect(),
            language: "en".to_string(),
            translations: HashMap::new(),
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the headline layout.
    pub fn with_headline_style(mut self, style: HeadlineStyle) -> Self {
        self.headline_style = style;
        self
    }

    /// Set or clear the table class.
    pub fn with_table_class(mut self, class: Option<impl Into<String>>) -> Self {
        self.default_table_class = class.map(Into::into);
        self
    }

    /// Toggle TODO keywords in headlines.
    pub fn with_todo_keywords(mut self, enabled: bool) -> Self {
        self.with_todo_keywords = enabled;
        self
    }

    /// Toggle headline tags.
    pub fn with_tags(mut self, enabled: bool) -> Self {
        self.with_tags = enabled;
        self
    }

    /// Toggle priority cookies.
    pub fn with_priority(mut self, enabled: bool) -> Self {
        self.with_priority = enabled;
        self
    }

    /// Toggle smart quotes.
    pub fn with_smart_quotes(mut self, enabled: bool) -> Self {
        self.with_smart_quotes = enabled;
        self
    }

    /// Toggle special strings.
    pub fn with_special_strings(mut self, enabled: bool) -> Self {
        self.with_special_strings = enabled;
        self
    }

    /// Preserve line breaks within paragraphs.
    pub fn with_preserve_breaks(mut self, preserve: bool) -> Self {
        self.preserve_breaks = preserve;
        self
    }

    /// Set the footnote marker template and separator.
    pub fn with_footnote_format(
        mut self,
        format: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        self.footnote_reference_format = format.into();
        self.footnote_separator = separator.into();
        self
    }

    /// Set the footnotes section template.
    pub fn with_footnotes_section(mut self, template: impl Into<String>) -> Self {
        self.footnotes_section_template = template.into();
        self
    }

    /// Set the output extension used when rewriting document links.
    pub fn with_output_extension(mut self, extension: impl Into<String>) -> Self {
        self.output_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Set the language of fixed strings.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Override one fixed string.
    pub fn with_translation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.translations.insert(key.into(), value.into());
        self
    }
}
