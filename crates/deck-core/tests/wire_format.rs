//! Integration tests: documents written by earlier clients.
//!
//! Older clients stored sizes as strings and left the thumbnail null; the
//! model must read those and write back the canonical field names.

use deck_core::*;
use pretty_assertions::assert_eq;

fn legacy() -> Collection {
    serde_json::from_str(include_str!("fixtures/legacy_store.json")).unwrap()
}

#[test]
fn legacy_document_loads() {
    let collection = legacy();
    assert_eq!(collection.len(), 2);

    let review = collection.get(PresentationId::FIRST).unwrap();
    assert_eq!(review.name, "Quarterly review");
    assert_eq!(review.thumbnail, "");
    assert_eq!(review.slides[1].background, Background::Color("#fafafa".into()));

    let tags: Vec<_> = review
        .slides
        .iter()
        .flat_map(|s| s.elements.iter().map(Element::tag))
        .collect();
    assert_eq!(
        tags,
        vec![ElementTag::Text, ElementTag::Image, ElementTag::Code, ElementTag::Video]
    );
    assert_eq!(
        review.slides[0].elements[1].geometry,
        Geometry {
            x_pos: 400.0,
            y_pos: 200.0,
            width: 45.0,
            height: 50.0,
        }
    );
    assert!(matches!(
        review.slides[1].elements[0].kind,
        ElementKind::Code {
            language: CodeLanguage::Python,
            size,
            ..
        } if size == 1.0
    ));
}

#[test]
fn legacy_document_is_valid() {
    assert_eq!(validate(&legacy()), Ok(()));
}

#[test]
fn rewrite_uses_stored_field_names() {
    let value = serde_json::to_value(legacy()).unwrap();
    let text = &value["1"]["slides"][0]["obj"][0];
    assert_eq!(text["type"], "text");
    assert_eq!(text["fontFamily"], "Courier New");
    assert_eq!(text["width"], 60.0);
    assert_eq!(text["xPos"], 40.0);
    assert_eq!(value["2"]["slides"][0]["background"], "default");

    let again: Collection = serde_json::from_value(value).unwrap();
    assert_eq!(again, legacy());
}

#[test]
fn legacy_slide_lays_out_in_any_viewport() {
    let review = legacy();
    let slide = &review.get(PresentationId::FIRST).unwrap().slides[0];

    let small = layout_slide(slide, Viewport::new(400.0, 300.0), true);
    let large = layout_slide(slide, Viewport::new(1600.0, 1200.0), true);
    assert_eq!(small.fill, "white");
    assert_eq!(small.elements[0].rect.width * 4.0, large.elements[0].rect.width);
    // positions are pixel offsets, not scaled
    assert_eq!(small.elements[1].rect.x, large.elements[1].rect.x);
}
