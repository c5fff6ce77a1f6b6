//! Domain entities: typed views over a lexicon export
//!
//! LIFT exports are `entry > sense > (gloss | field)` trees. The views here
//! give the pipeline named accessors (headword, gloss, cross-reference)
//! instead of nested child lookups scattered through the code.

use std::path::{Path, PathBuf};

use crate::domain::xml::{Document, Element};

/// One loaded lexicon export. Only the target database of a run is ever
/// mutated; sources are read through the views.
#[derive(Debug, Clone)]
pub struct LexicalDatabase {
    path: PathBuf,
    doc: Document,
}

impl LexicalDatabase {
    pub fn new(path: PathBuf, doc: Document) -> Self {
        Self { path, doc }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = EntryView<'_>> {
        self.doc
            .root
            .child_elements()
            .filter(|el| el.name == "entry")
            .map(EntryView::new)
    }

    /// Language tag of the first entry's headword form. LIFT exports carry
    /// one vernacular language per file, so the first entry is decisive.
    pub fn headword_lang(&self) -> Option<&str> {
        self.entries()
            .next()?
            .element()
            .first_child("lexical-unit")?
            .first_child("form")?
            .attr("lang")
    }
}

/// Read view of one `entry` element.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    el: &'a Element,
}

impl<'a> EntryView<'a> {
    pub fn new(el: &'a Element) -> Self {
        Self { el }
    }

    pub fn element(&self) -> &'a Element {
        self.el
    }

    /// Headword text (`lexical-unit > form[lang] > text`) in the given language.
    pub fn headword(&self, lang: &str) -> Option<&'a str> {
        let lexical_unit = self.el.first_child("lexical-unit")?;
        for form in lexical_unit.child_elements() {
            if form.name == "form" && form.attr("lang") == Some(lang) {
                return form.first_child("text").and_then(|t| t.text());
            }
        }
        None
    }

    /// Senses in document order.
    pub fn senses(&self) -> impl Iterator<Item = SenseView<'a>> + 'a {
        self.el
            .child_elements()
            .filter(|el| el.name == "sense")
            .map(SenseView::new)
    }
}

/// Read view of one `sense` element.
#[derive(Debug, Clone, Copy)]
pub struct SenseView<'a> {
    el: &'a Element,
}

impl<'a> SenseView<'a> {
    pub fn new(el: &'a Element) -> Self {
        Self { el }
    }

    pub fn element(&self) -> &'a Element {
        self.el
    }

    /// Gloss text (`gloss[lang] > text`) in the given language.
    pub fn gloss(&self, lang: &str) -> Option<&'a str> {
        for gloss in self.el.child_elements() {
            if gloss.name == "gloss" && gloss.attr("lang") == Some(lang) {
                return gloss.first_child("text").and_then(|t| t.text());
            }
        }
        None
    }

    /// Cross-reference value (`field[type] > form > text`) for the given
    /// field type. If a sense carries several fields of the type, the first
    /// in document order wins.
    pub fn cross_reference(&self, xref_type: &str) -> Option<&'a str> {
        for field in self.el.child_elements() {
            if field.name == "field" && field.attr("type") == Some(xref_type) {
                return field
                    .first_child("form")
                    .and_then(|f| f.first_child("text"))
                    .and_then(|t| t.text());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::xml;

    fn db(input: &str) -> LexicalDatabase {
        LexicalDatabase::new(PathBuf::from("test.lift"), xml::parse(input).unwrap())
    }

    #[test]
    fn given_lift_document_when_reading_views_then_headword_and_xref_resolve() {
        let db = db(
            r#"<lift>
                <entry id="e1">
                    <lexical-unit><form lang="sg"><text>gbanda</text></form></lexical-unit>
                    <sense id="s1">
                        <gloss lang="en"><text>trap</text></gloss>
                        <field type="CAWL"><form lang="en"><text>H123</text></form></field>
                    </sense>
                </entry>
            </lift>"#,
        );

        let entry = db.entries().next().unwrap();
        assert_eq!(entry.headword("sg"), Some("gbanda"));
        assert_eq!(entry.headword("fr"), None);

        let sense = entry.senses().next().unwrap();
        assert_eq!(sense.gloss("en"), Some("trap"));
        assert_eq!(sense.gloss("fr"), None);
        assert_eq!(sense.cross_reference("CAWL"), Some("H123"));
        assert_eq!(sense.cross_reference("SIL"), None);
    }

    #[test]
    fn given_duplicate_xref_fields_when_reading_then_first_in_document_order_wins() {
        let db = db(
            r#"<lift>
                <entry>
                    <lexical-unit><form lang="sg"><text>da</text></form></lexical-unit>
                    <sense>
                        <field type="CAWL"><form lang="en"><text>H001</text></form></field>
                        <field type="CAWL"><form lang="en"><text>H002</text></form></field>
                    </sense>
                </entry>
            </lift>"#,
        );

        let sense = db.entries().next().unwrap().senses().next().unwrap();
        assert_eq!(sense.cross_reference("CAWL"), Some("H001"));
    }

    #[test]
    fn given_source_database_when_inferring_language_then_first_headword_form_decides() {
        let db = db(
            r#"<lift>
                <entry><lexical-unit><form lang="sg"><text>da</text></form></lexical-unit></entry>
                <entry><lexical-unit><form lang="fr"><text>maison</text></form></lexical-unit></entry>
            </lift>"#,
        );
        assert_eq!(db.headword_lang(), Some("sg"));
    }

    #[test]
    fn given_empty_database_when_inferring_language_then_none() {
        assert_eq!(db("<lift/>").headword_lang(), None);
    }
}
