//! Tag sets: template-backed resolvers loaded from TOML
//!
//! ```toml
//! [tags.b]
//! template = "<b>{{ data.content }}</b>"
//! display = "inline"
//! ```
//!
//! Templates see `data.params`, `data.attrs`, `data.blocks` and
//! `data.content` (see [`TemplateResolver`]).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::engine::DisplayType;
use crate::resolver::{Module, ResolverMap, TemplateResolver};

/// Errors that can occur when loading a tag set
#[derive(Error, Debug)]
pub enum TagSetError {
    #[error("Failed to read tag set file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse tag set TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// One tag's template and display type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagDef {
    pub template: String,
    #[serde(default)]
    pub display: Option<DisplayType>,
}

/// Named tag definitions
#[derive(Debug, Clone, PartialEq)]
pub struct TagSet {
    pub tags: BTreeMap<String, TagDef>,
}

#[derive(Deserialize)]
struct TomlTagSet {
    #[serde(default)]
    tags: BTreeMap<String, TagDef>,
}

/// Built-in tags
const DEFAULT_TAGS: &str = r##"
[tags.b]
template = "<strong>{{ data.content }}</strong>"
display = "inline"

[tags.i]
template = "<em>{{ data.content }}</em>"
display = "inline"

[tags.code]
template = "<code>{{ data.content }}</code>"
display = "inline"

[tags.link]
template = "<a href=\"{{ data.params.0 }}\">{{ data.content }}</a>"
display = "inline"

[tags.p]
template = "<p>{{ data.content }}</p>"
display = "block"

[tags.h1]
template = "<h1>{{ data.content }}</h1>"
display = "block"

[tags.h2]
template = "<h2>{{ data.content }}</h2>"
display = "block"

[tags.section]
template = "<section{% if data.attrs.id %} id=\"{{ data.attrs.id }}\"{% endif %}>{{ data.content }}</section>"
display = "block"
"##;

impl TagSet {
    /// Load a tag set from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, TagSetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a tag set from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, TagSetError> {
        let parsed: TomlTagSet = toml::from_str(content)?;
        Ok(TagSet { tags: parsed.tags })
    }

    /// A set with no tags
    pub fn empty() -> Self {
        Self { tags: BTreeMap::new() }
    }

    /// Layer `other` on top of this set; same-named tags are replaced
    pub fn merge(mut self, other: TagSet) -> Self {
        self.tags.extend(other.tags);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TagDef> {
        self.tags.get(name)
    }

    /// One [`TemplateResolver`] per tag
    pub fn resolvers(&self) -> ResolverMap {
        let mut map = ResolverMap::new();
        for (name, def) in &self.tags {
            map.insert(name.clone(), TemplateResolver::new(def.template.clone(), def.display));
        }
        map
    }
}

impl Default for TagSet {
    /// The built-in tags
    fn default() -> Self {
        Self::from_str(DEFAULT_TAGS).unwrap_or_else(|err| {
            log::error!("built-in tag set is invalid: {}", err);
            Self::empty()
        })
    }
}

impl Module for TagSet {
    fn register_tag_resolvers(&self) -> ResolverMap {
        self.resolvers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_tags() {
        let tags = TagSet::default();
        let names: Vec<_> = tags.tags.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "code", "h1", "h2", "i", "link", "p", "section"]);
        assert_eq!(tags.get("p").and_then(|t| t.display), Some(DisplayType::Block));
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r##"
[tags.kbd]
template = "<kbd>{{ data.content }}</kbd>"
display = "inline"

[tags.raw]
template = "{{ data.content }}"
"##;
        let tags = TagSet::from_str(toml_str).expect("Should parse");
        assert_eq!(tags.tags.len(), 2);
        assert_eq!(tags.get("raw").and_then(|t| t.display), None);
        assert!(tags.resolvers().contains("kbd"));
    }

    #[test]
    fn test_merge_overrides() {
        let custom = TagSet::from_str("[tags.b]\ntemplate = \"<b>{{ data.content }}</b>\"\n").expect("Should parse");
        let tags = TagSet::default().merge(custom);
        assert_eq!(tags.get("b").map(|t| t.template.as_str()), Some("<b>{{ data.content }}</b>"));
        assert_eq!(tags.get("b").and_then(|t| t.display), None);
        assert!(tags.get("i").is_some());
    }

    #[test]
    fn test_invalid_toml_error() {
        assert!(matches!(
            TagSet::from_str("this is not valid toml {{{{"),
            Err(TagSetError::ParseError(_))
        ));
        assert!(matches!(
            TagSet::from_str("[tags.x]\ndisplay = \"sideways\"\ntemplate = \"\"\n"),
            Err(TagSetError::ParseError(_))
        ));
    }
}
