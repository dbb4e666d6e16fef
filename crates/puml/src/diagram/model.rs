//! Sequence diagram model
//!
//! Each element formats itself to its canonical PlantUML text through
//! [`fmt::Display`]. Formatting is pure; nothing here validates diagram
//! syntax, that is left to the rendering service.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::ArrowDirection;

/// A participant in the sequence diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Display name, written quoted
    pub name: String,
    /// Short alias used by arrows to reference the participant
    pub alias: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant \"{}\" as {}", self.name, self.alias)
    }
}

/// A message arrow between two references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrow {
    pub from: String,
    pub to: String,
    /// Message label; omitted from the output when empty
    pub message: String,
    pub direction: ArrowDirection,
}

impl Arrow {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
        direction: ArrowDirection,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message: message.into(),
            direction,
        }
    }

    /// Create a `from->to` arrow
    pub fn forward(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(from, to, message, ArrowDirection::Forward)
    }

    /// Create a `from<-to` arrow
    pub fn reverse(
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(from, to, message, ArrowDirection::Reverse)
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.from, self.direction.glyph(), self.to)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

/// Skin parameters (style overrides), keyed by name
///
/// Setting a key twice keeps the last value. Entries are written sorted by
/// key, one `skinparam <key> <value>` line each, newline-terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Skinparams(BTreeMap<String, String>);

impl Skinparams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, returning the previous value if any
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Skinparams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Skinparams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.0 {
            writeln!(f, "skinparam {} {}", key, value)?;
        }
        Ok(())
    }
}

/// A complete sequence diagram
///
/// Sections are written in a fixed order: title, skin parameters,
/// participants, arrows. Empty sections are left out. The skin parameter
/// block is followed by one blank separator line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    pub(crate) title: Option<String>,
    pub(crate) skinparams: Skinparams,
    pub(crate) participants: Vec<Participant>,
    pub(crate) arrows: Vec<Arrow>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// The title, if one was set to a non-empty value
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn skinparams(&self) -> &Skinparams {
        &self.skinparams
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// Returns true if the diagram has no content besides the start/end markers
    pub fn is_empty(&self) -> bool {
        self.title().is_none()
            && self.skinparams.is_empty()
            && self.participants.is_empty()
            && self.arrows.is_empty()
    }
}

impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@startuml")?;

        if let Some(title) = self.title() {
            writeln!(f, "title \"{}\"", title)?;
        }

        if !self.skinparams.is_empty() {
            writeln!(f, "{}", self.skinparams)?;
        }

        for participant in &self.participants {
            writeln!(f, "{}", participant)?;
        }

        for arrow in &self.arrows {
            writeln!(f, "{}", arrow)?;
        }

        write!(f, "@enduml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_display() {
        let p = Participant::new("test test", "tst");
        assert_eq!(p.to_string(), r#"participant "test test" as tst"#);
    }

    #[test]
    fn test_arrow_display() {
        assert_eq!(Arrow::reverse("a", "b", "hi").to_string(), "a<-b: hi");
        assert_eq!(Arrow::forward("a", "b", "hi").to_string(), "a->b: hi");
        assert_eq!(Arrow::reverse("a", "b", "").to_string(), "a<-b");
    }

    #[test]
    fn test_skinparams_single_entry() {
        let s: Skinparams = [("test", "on")].into_iter().collect();
        assert_eq!(s.to_string(), "skinparam test on\n");
    }

    #[test]
    fn test_skinparams_last_write_wins() {
        let mut s = Skinparams::new();
        assert_eq!(s.set("monochrome", "false"), None);
        assert_eq!(s.set("monochrome", "true"), Some("false".to_string()));
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("monochrome"), Some("true"));
    }

    #[test]
    fn test_empty_diagram() {
        let d = Diagram::new();
        assert!(d.is_empty());
        assert_eq!(d.to_string(), "@startuml\n@enduml");
    }

    #[test]
    fn test_empty_title_is_unset() {
        let d = Diagram {
            title: Some(String::new()),
            ..Diagram::default()
        };
        assert_eq!(d.title(), None);
        assert_eq!(d.to_string(), "@startuml\n@enduml");
    }

    #[test]
    fn test_skinparam_block_is_separated() {
        let mut d = Diagram::new();
        d.skinparams.set("monochrome", "true");
        d.participants.push(Participant::new("Alice", "a"));
        assert_eq!(
            d.to_string(),
            "@startuml\nskinparam monochrome true\n\nparticipant \"Alice\" as a\n@enduml"
        );
    }
}
