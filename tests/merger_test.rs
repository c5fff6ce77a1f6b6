//! Tests for the merger: gloss replacement, creation, and stamping

use std::collections::BTreeMap;
use std::path::PathBuf;

use rstest::rstest;

use liftsync::application::services::merger::{apply_gloss, merge_candidates, GLOSS_SEPARATOR};
use liftsync::domain::{xml, LexicalDatabase, SenseView};

const STAMP: &str = "2024-03-01T12:00:00Z";

fn sense(input: &str) -> liftsync::domain::Element {
    xml::parse(input).unwrap().root
}

fn candidates(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

#[test]
fn given_separator_constant_then_it_is_semicolon_space() {
    assert_eq!(GLOSS_SEPARATOR, "; ");
}

#[rstest]
#[case(&["alpha"], "alpha")]
#[case(&["alpha", "beta"], "alpha; beta")]
#[case(&["a", "b", "c"], "a; b; c")]
fn given_candidates_when_applying_then_text_is_joined(
    #[case] texts: &[&str],
    #[case] expected: &str,
) {
    // Arrange
    let mut sense = sense("<sense/>");

    // Act
    let changed = apply_gloss(&mut sense, "en", &candidates(texts));

    // Assert
    assert!(changed);
    assert_eq!(SenseView::new(&sense).gloss("en"), Some(expected));
}

#[test]
fn given_sense_without_gloss_when_applying_then_new_gloss_is_appended_after_glosses() {
    // Arrange - one existing French gloss, then a field
    let mut sense = sense(
        r#"<sense>
            <gloss lang="fr"><text>piège</text></gloss>
            <field type="CAWL"><form lang="en"><text>H001</text></form></field>
        </sense>"#,
    );

    // Act
    let changed = apply_gloss(&mut sense, "en", &candidates(&["trap"]));

    // Assert - new gloss sits between the French gloss and the field
    assert!(changed);
    let names_and_langs: Vec<_> = sense
        .child_elements()
        .map(|el| (el.name.as_str(), el.attr("lang").unwrap_or("")))
        .collect();
    assert_eq!(
        names_and_langs,
        vec![("gloss", "fr"), ("gloss", "en"), ("field", "")]
    );
    assert_eq!(SenseView::new(&sense).gloss("en"), Some("trap"));
}

#[test]
fn given_existing_gloss_when_applying_then_text_replaced_without_duplicate() {
    // Arrange
    let mut sense = sense(r#"<sense><gloss lang="en"><text>old</text></gloss></sense>"#);

    // Act
    let changed = apply_gloss(&mut sense, "en", &candidates(&["new"]));

    // Assert - still exactly one English gloss
    assert!(changed);
    let en_glosses = sense
        .child_elements()
        .filter(|el| el.name == "gloss" && el.attr("lang") == Some("en"))
        .count();
    assert_eq!(en_glosses, 1);
    assert_eq!(SenseView::new(&sense).gloss("en"), Some("new"));
}

#[test]
fn given_unchanged_text_when_applying_then_reports_no_change() {
    // Arrange
    let mut sense = sense(r#"<sense><gloss lang="en"><text>alpha; beta</text></gloss></sense>"#);

    // Act
    let changed = apply_gloss(&mut sense, "en", &candidates(&["alpha", "beta"]));

    // Assert
    assert!(!changed);
}

#[test]
fn given_empty_candidates_when_applying_then_sense_is_untouched() {
    // Arrange
    let mut sense = sense(r#"<sense><gloss lang="en"><text>old</text></gloss></sense>"#);
    let before = sense.clone();

    // Act
    let changed = apply_gloss(&mut sense, "en", &[]);

    // Assert
    assert!(!changed);
    assert_eq!(sense, before);
}

#[test]
fn given_gloss_in_other_language_when_applying_then_it_is_not_overwritten() {
    // Arrange
    let mut sense = sense(r#"<sense><gloss lang="fr"><text>maison</text></gloss></sense>"#);

    // Act
    apply_gloss(&mut sense, "en", &candidates(&["house"]));

    // Assert
    assert_eq!(SenseView::new(&sense).gloss("fr"), Some("maison"));
    assert_eq!(SenseView::new(&sense).gloss("en"), Some("house"));
}

fn target_db() -> LexicalDatabase {
    let doc = xml::parse(
        r#"<lift>
            <entry id="e1" dateModified="2020-01-01T00:00:00Z">
                <lexical-unit><form lang="gby"><text>gbanda</text></form></lexical-unit>
                <sense id="s1" dateModified="2020-01-01T00:00:00Z">
                    <field type="CAWL"><form lang="en"><text>H001</text></form></field>
                </sense>
            </entry>
            <entry id="e2" dateModified="2020-01-01T00:00:00Z">
                <lexical-unit><form lang="gby"><text>tere</text></form></lexical-unit>
                <sense id="s2" dateModified="2020-01-01T00:00:00Z">
                    <gloss lang="sg"><text>old</text></gloss>
                    <field type="CAWL"><form lang="en"><text>H002</text></form></field>
                </sense>
            </entry>
        </lift>"#,
    )
    .unwrap();
    LexicalDatabase::new(PathBuf::from("target.lift"), doc)
}

#[test]
fn given_candidates_for_one_id_when_merging_then_sense_and_entry_are_stamped() {
    // Arrange
    let mut db = target_db();
    let mut map = BTreeMap::new();
    map.insert("H001".to_string(), candidates(&["alpha", "beta"]));

    // Act
    let updated = merge_candidates(&mut db, "CAWL", "sg", &map, STAMP);

    // Assert
    assert_eq!(updated, 1);
    let entry = db.entries().next().unwrap();
    assert_eq!(entry.element().attr("dateModified"), Some(STAMP));
    let sense = entry.senses().next().unwrap();
    assert_eq!(sense.element().attr("dateModified"), Some(STAMP));
    assert_eq!(sense.gloss("sg"), Some("alpha; beta"));
}

#[test]
fn given_id_without_candidates_when_merging_then_existing_gloss_and_stamps_survive() {
    // Arrange - H002 has no entry in the candidate map
    let mut db = target_db();
    let mut map = BTreeMap::new();
    map.insert("H001".to_string(), candidates(&["alpha"]));

    // Act
    merge_candidates(&mut db, "CAWL", "sg", &map, STAMP);

    // Assert - second entry completely untouched
    let entry = db.entries().nth(1).unwrap();
    assert_eq!(
        entry.element().attr("dateModified"),
        Some("2020-01-01T00:00:00Z")
    );
    let sense = entry.senses().next().unwrap();
    assert_eq!(
        sense.element().attr("dateModified"),
        Some("2020-01-01T00:00:00Z")
    );
    assert_eq!(sense.gloss("sg"), Some("old"));
}

#[test]
fn given_candidates_equal_to_current_text_when_merging_then_no_restamp() {
    // Arrange - H002's gloss already says "old"
    let mut db = target_db();
    let mut map = BTreeMap::new();
    map.insert("H002".to_string(), candidates(&["old"]));

    // Act
    let updated = merge_candidates(&mut db, "CAWL", "sg", &map, STAMP);

    // Assert
    assert_eq!(updated, 0);
    let entry = db.entries().nth(1).unwrap();
    assert_eq!(
        entry.element().attr("dateModified"),
        Some("2020-01-01T00:00:00Z")
    );
}
