//! Fluent builder for sequence diagrams
//!
//! ```rust
//! use puml::diagram::start_uml;
//!
//! let text = start_uml()
//!     .title("Checkout")
//!     .participant("Web Shop", "shop")
//!     .participant("Payment Gateway", "pay")
//!     .arrow_right("shop", "pay", "charge")
//!     .arrow_left("shop", "pay", "receipt")
//!     .finish();
//!
//! assert!(text.starts_with("@startuml\ntitle \"Checkout\""));
//! ```

use tracing::trace;

use super::model::{Arrow, Diagram, Participant, Skinparams};

/// Start a new, empty diagram builder
pub fn start_uml() -> UmlBuilder {
    UmlBuilder::new()
}

/// Accumulates diagram elements through chained calls
///
/// No operation fails: any string, including the empty string, is accepted
/// as-is.
#[derive(Debug, Clone, Default)]
pub struct UmlBuilder {
    diagram: Diagram,
}

impl UmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the diagram title, replacing any previous one
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.diagram.title = Some(title.into());
        self
    }

    /// Set a skin parameter; the last value for a key wins
    pub fn skinparam(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.diagram.skinparams.set(key, value);
        self
    }

    /// Add a participant with a display name and an alias
    pub fn participant(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.diagram.participants.push(Participant::new(name, alias));
        self
    }

    /// Add a `from->to` arrow
    pub fn arrow_right(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.diagram.arrows.push(Arrow::forward(from, to, message));
        self
    }

    /// Add a `from<-to` arrow
    pub fn arrow_left(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.diagram.arrows.push(Arrow::reverse(from, to, message));
        self
    }

    /// The title set so far, if non-empty
    pub fn title_text(&self) -> Option<&str> {
        self.diagram.title()
    }

    pub fn skinparams(&self) -> &Skinparams {
        self.diagram.skinparams()
    }

    pub fn participants(&self) -> &[Participant] {
        self.diagram.participants()
    }

    pub fn arrows(&self) -> &[Arrow] {
        self.diagram.arrows()
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Consume the builder and return the accumulated diagram
    pub fn build(self) -> Diagram {
        self.diagram
    }

    /// Render the accumulated state to PlantUML text
    pub fn finish(&self) -> String {
        let text = self.diagram.to_string();
        trace!(
            participants = self.diagram.participants().len(),
            arrows = self.diagram.arrows().len(),
            len = text.len(),
            "Rendered diagram text"
        );
        text
    }
}

impl From<UmlBuilder> for Diagram {
    fn from(builder: UmlBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArrowDirection;

    #[test]
    fn test_title() {
        let b = UmlBuilder::new().title("test");
        assert_eq!(b.diagram().title(), Some("test"));

        let b = UmlBuilder::new();
        assert_eq!(b.diagram().title(), None);
    }

    #[test]
    fn test_accessors_track_chained_calls() {
        let b = start_uml()
            .title("")
            .skinparam("monochrome", "true")
            .participant("Alice", "a")
            .participant("Bob", "b")
            .arrow_right("a", "b", "hello")
            .arrow_left("a", "b", "");

        // An empty title counts as unset
        assert_eq!(b.title_text(), None);
        assert_eq!(b.skinparams().get("monochrome"), Some("true"));
        assert_eq!(b.participants().len(), 2);
        assert_eq!(b.participants()[1].alias, "b");
        assert_eq!(b.arrows().len(), 2);
        assert_eq!(b.arrows()[0].direction, ArrowDirection::Forward);
        assert_eq!(b.arrows()[1].direction, ArrowDirection::Reverse);

        let b = b.title("Greeting");
        assert_eq!(b.title_text(), Some("Greeting"));
        assert_eq!(b.title_text(), b.diagram().title());
    }

    #[test]
    fn test_participant() {
        let d = UmlBuilder::new().participant("test", "tst").build();
        assert_eq!(d.participants().len(), 1);
        assert_eq!(d.participants()[0].name, "test");
        assert_eq!(d.participants()[0].alias, "tst");
    }

    #[test]
    fn test_arrows() {
        let d = UmlBuilder::new()
            .arrow_left("a", "b", "left")
            .arrow_right("c", "d", "")
            .build();

        assert_eq!(d.arrows().len(), 2);
        assert_eq!(d.arrows()[0].from, "a");
        assert_eq!(d.arrows()[0].to, "b");
        assert_eq!(d.arrows()[0].message, "left");
        assert_eq!(d.arrows()[0].direction, ArrowDirection::Reverse);
        assert_eq!(d.arrows()[1].message, "");
        assert_eq!(d.arrows()[1].direction, ArrowDirection::Forward);
    }

    #[test]
    fn test_skinparam_last_write_wins() {
        let d = UmlBuilder::new()
            .skinparam("handwritten", "false")
            .skinparam("handwritten", "true")
            .build();
        assert_eq!(d.skinparams().len(), 1);
        assert_eq!(d.skinparams().get("handwritten"), Some("true"));
    }

    #[test]
    fn test_finish() {
        let text = start_uml()
            .title("test")
            .participant("test", "tst")
            .arrow_right("tst", "test1", "testA")
            .arrow_left("test1", "tst", "testB")
            .finish();

        assert_eq!(
            text,
            "@startuml\ntitle \"test\"\nparticipant \"test\" as tst\ntst->test1: testA\ntest1<-tst: testB\n@enduml"
        );
    }

    #[test]
    fn test_empty_strings_accepted() {
        let text = start_uml().participant("", "").arrow_right("", "", "").finish();
        assert_eq!(text, "@startuml\nparticipant \"\" as \n->\n@enduml");
    }
}
