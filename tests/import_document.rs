mod common;

use common::fixtures::{PRESENTATION_FAMILIES, PRESENTATION_STYLES};
use odf_styles::{
    import_styles_xml, DocumentKind, DuplicatePolicy, ImportOptions, ImportedStyles, LayoutKind,
    MapperApplier, MemoryStyle, MemoryStyleContainer, MemoryStyleFamilies, Orientation,
    PropertyValue, StyleFamily, StyledObject, StylesImporter,
};

fn import_fixture() -> ImportedStyles {
    import_styles_xml(PRESENTATION_STYLES.as_bytes(), ImportOptions::default())
        .unwrap_or_else(|e| panic!("import fixture: {}", e))
}

fn open_families() -> MemoryStyleFamilies {
    let mut families = MemoryStyleFamilies::new();
    for name in PRESENTATION_FAMILIES {
        families.add_family(*name, MemoryStyleContainer::new(MemoryStyle::open()));
    }
    families
}

#[test]
fn fixture_populates_both_scopes() {
    let styles = import_fixture();
    assert_eq!(styles.named.len(), 13);
    assert_eq!(styles.automatic.len(), 4);
    assert!(styles.named.default_style(StyleFamily::Graphics).is_some());

    let dashed = styles
        .named
        .find(StyleFamily::Graphics, "Dashed_20_Line")
        .expect("dashed line style");
    assert_eq!(dashed.display_name, "Dashed Line");
    assert_eq!(dashed.parent_name.as_deref(), Some("standard"));

    let names = &styles.context.display_names;
    assert_eq!(names.display_name_for(StyleFamily::StrokeDash, "Fine_20_Dashed"), "Fine Dashed");
    assert_eq!(names.display_name_for(StyleFamily::Gradient, "Sky"), "Sky Blue");
    assert_eq!(
        names.display_name_for(StyleFamily::MasterPage, "Title_20_Master"),
        "Title Master"
    );
}

#[test]
fn fixture_page_layouts_are_inferred() {
    let styles = import_fixture();
    let layouts = styles.page_layouts();
    assert_eq!(
        layouts,
        vec![
            ("AL1T0", LayoutKind::Title),
            ("AL2T1", LayoutKind::TitleContent),
            ("AL3T3", LayoutKind::TextObj),
            ("AL4T12", LayoutKind::Handout4),
        ]
    );
    assert_eq!(LayoutKind::Handout4.code(), 25);
}

#[test]
fn fixture_page_masters_and_declarations() {
    let styles = import_fixture();
    let pm0 = styles.page_master("PM0").expect("PM0");
    assert_eq!(pm0.orientation, Orientation::Portrait);
    assert_eq!((pm0.width, pm0.height), (21000, 29700));
    let pm1 = styles.page_master("PM1").expect("PM1");
    assert_eq!(pm1.orientation, Orientation::Landscape);
    assert_eq!(pm1.height, 15750);

    assert_eq!(styles.context.header_decl("hdr1"), Some("Quarterly review"));
    assert_eq!(styles.context.footer_decl("ftr1"), Some("Company & Partners"));
    let dtd = styles.context.date_time_decl("dtd1").expect("date-time decl");
    assert!(!dtd.fixed);
    assert_eq!(dtd.format.as_deref(), Some("D3"));
}

#[test]
fn master_pages_keep_order_and_ordinals() {
    let styles = import_fixture();
    assert_eq!(styles.master_pages.len(), 3);
    let handout = &styles.master_pages[0];
    assert!(handout.is_handout);
    assert_eq!(handout.ordinal, None);
    assert_eq!(
        handout.presentation_page_layout_name.as_deref(),
        Some("AL4T12")
    );

    let default = styles.master_page("Default").expect("Default master");
    assert_eq!(default.ordinal, Some(0));
    assert_eq!(default.use_footer_name.as_deref(), Some("ftr1"));
    assert_eq!(default.use_date_time_name.as_deref(), Some("dtd1"));

    let title = styles.master_page("Title_20_Master").expect("title master");
    assert_eq!(title.display_name, "Title Master");
    assert_eq!(title.ordinal, Some(1));
    assert_eq!(styles.context.master_page_count(), 2);
}

#[test]
fn date_time_references_become_format_keys() {
    let styles = import_fixture();
    let d3 = styles.named.number_style("D3").expect("D3");
    assert_eq!(d3.format_code, "DD/MM/YYYY");

    let dp1 = styles
        .automatic
        .find(StyleFamily::DrawingPage, "dp1")
        .expect("dp1");
    assert!(dp1
        .properties()
        .iter()
        .any(|s| s.value == PropertyValue::Int(d3.key.into())));

    let dp2 = styles
        .automatic
        .find(StyleFamily::DrawingPage, "dp2")
        .expect("dp2");
    assert!(dp2.properties().iter().any(|s| s.value == PropertyValue::Int(0)));
    assert!(dp2
        .properties()
        .iter()
        .any(|s| s.value == PropertyValue::Str("../media/chime.wav".to_string())));
}

#[test]
fn apply_materializes_shared_and_master_page_families() {
    let mut styles = import_fixture();
    let mut families = open_families();
    let report = styles.apply(&mut families, &MapperApplier);

    assert_eq!(report.created, 12);
    assert_eq!(report.updated, 0);
    assert_eq!(report.parented, 6);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(&*report.warnings[0].style_name, "orphan");

    let graphics = families.family("graphics").expect("graphics family");
    let names: Vec<&str> = graphics.names().collect();
    assert_eq!(
        names,
        vec!["standard", "objectwithoutfill", "Dashed Line", "Sky Fill", "orphan"]
    );
    let dashed = graphics.get("Dashed Line").expect("dashed line object");
    assert_eq!(dashed.parent_style(), Some("standard"));
    assert_eq!(
        dashed.direct_properties().get("LineDashName"),
        Some(&PropertyValue::Str("Fine Dashed".to_string()))
    );
    let sky = graphics.get("Sky Fill").expect("sky fill object");
    assert_eq!(sky.parent_style(), Some("Dashed Line"));
    assert_eq!(
        sky.direct_properties().get("FillGradientName"),
        Some(&PropertyValue::Str("Sky Blue".to_string()))
    );
    let standard = graphics.get("standard").expect("standard object");
    assert_eq!(
        standard.direct_properties().get("LineColor"),
        Some(&PropertyValue::Int(0x3465a4))
    );
    assert_eq!(
        standard.direct_properties().get("FillColor"),
        Some(&PropertyValue::Int(0xffffff))
    );
    assert!(graphics.get("orphan").expect("orphan").parent_style().is_none());

    let cells = families.family("cell").expect("cell family");
    assert_eq!(cells.get("gray1").and_then(|s| s.parent_style()), Some("default"));

    let default_master = families.family("Default").expect("Default family");
    let names: Vec<&str> = default_master.names().collect();
    assert_eq!(names, vec!["background", "outline1", "outline2"]);
    assert_eq!(
        default_master.get("outline2").and_then(|s| s.parent_style()),
        Some("outline1")
    );

    let title_master = families.family("Title Master").expect("Title Master family");
    assert_eq!(title_master.len(), 2);
    assert_eq!(
        title_master.get("subtitle").and_then(|s| s.parent_style()),
        Some("title")
    );
}

#[test]
fn apply_associates_automatic_styles_with_named_objects() {
    let mut styles = import_fixture();
    let mut families = open_families();
    styles.apply(&mut families, &MapperApplier);

    assert_eq!(
        styles.named.object_name(StyleFamily::Graphics, "Dashed_20_Line"),
        Some("Dashed Line")
    );
    assert_eq!(
        styles.automatic.object_name(StyleFamily::Graphics, "gr1"),
        Some("objectwithoutfill")
    );
    assert_eq!(
        styles.automatic.object_name(StyleFamily::Presentation, "Mpr1"),
        Some("outline1")
    );
    assert_eq!(styles.automatic.object_name(StyleFamily::DrawingPage, "dp1"), None);
}

#[test]
fn reapplying_updates_instead_of_creating() {
    let mut styles = import_fixture();
    let mut families = open_families();
    let first = styles.apply(&mut families, &MapperApplier);
    let second = styles.apply(&mut families, &MapperApplier);
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, first.created);
    assert_eq!(second.parented, first.parented);
    assert_eq!(
        families.family("graphics").map(|c| c.len()),
        Some(5),
        "re-apply must not duplicate objects"
    );
}

#[test]
fn missing_document_families_are_skipped() {
    let mut styles = import_fixture();
    let mut families = MemoryStyleFamilies::new()
        .with_family("graphics", MemoryStyleContainer::new(MemoryStyle::open()));
    let report = styles.apply(&mut families, &MapperApplier);
    assert_eq!(report.created, 5);
    assert!(families.family("cell").is_none());
}

#[test]
fn duplicate_names_follow_policy() {
    let xml = br#"<office:styles>
        <style:style style:name="a" style:family="graphic"><style:graphic-properties draw:fill="none"/></style:style>
        <style:style style:name="a" style:family="graphic"><style:graphic-properties draw:fill="solid"/></style:style>
    </office:styles>"#;

    let styles = import_styles_xml(xml, ImportOptions::default()).expect("overwrite");
    assert_eq!(styles.named.len(), 1);
    let record = styles.named.find(StyleFamily::Graphics, "a").expect("a");
    assert_eq!(record.properties()[0].value, PropertyValue::Int(1));

    let err = import_styles_xml(
        xml,
        ImportOptions::default().with_duplicate_policy(DuplicatePolicy::Reject),
    )
    .expect_err("reject duplicates");
    assert_eq!(err.code, "STYLE_DUPLICATE");
    assert_eq!(err.style_name(), Some("a"));
}

#[test]
fn drawing_documents_default_to_portrait() {
    let xml = br#"<office:automatic-styles><style:page-layout style:name="PM1"/></office:automatic-styles>"#;
    let styles = import_styles_xml(
        xml,
        ImportOptions::default().with_document_kind(DocumentKind::Drawing),
    )
    .expect("import");
    assert_eq!(
        styles.page_master("PM1").map(|p| p.orientation),
        Some(Orientation::Portrait)
    );
}

#[test]
fn event_api_matches_xml_driver() {
    let mut importer = StylesImporter::new(ImportOptions::default());
    let no_attrs: &[(&str, &str)] = &[];
    importer.start_element("office:styles", no_attrs).expect("open");
    importer
        .start_element(
            "style:presentation-page-layout",
            &[("style:name", "AL2T1")],
        )
        .expect("open");
    for object in ["title", "outline"] {
        importer
            .start_element("presentation:placeholder", &[("presentation:object", object)])
            .expect("open");
        importer.end_element("presentation:placeholder").expect("close");
    }
    importer.end_element("style:presentation-page-layout").expect("close");
    importer.end_element("office:styles").expect("close");
    let styles = importer.finish().expect("finish");
    assert_eq!(styles.page_layouts(), vec![("AL2T1", LayoutKind::TitleContent)]);
}

#[test]
fn unclosed_elements_fail_finish() {
    let mut importer = StylesImporter::new(ImportOptions::default());
    let no_attrs: &[(&str, &str)] = &[];
    importer.start_element("office:styles", no_attrs).expect("open");
    let err = importer.finish().expect_err("still open");
    assert_eq!(err.code, "XML_STRUCTURE_ERROR");
}

#[test]
fn date_style_defined_earlier_in_same_scope_resolves() {
    let xml = br#"<office:automatic-styles>
        <number:date-style style:name="D7">
          <number:day/><number:text>.</number:text><number:month/>
        </number:date-style>
        <style:style style:name="dp7" style:family="drawing-page">
          <style:drawing-page-properties style:data-style-name="D7"/>
        </style:style>
      </office:automatic-styles>"#;
    let styles = import_styles_xml(xml, ImportOptions::default()).expect("import");
    let d7 = styles.automatic.number_style("D7").expect("D7");
    assert_eq!(d7.key, 1);
    let dp7 = styles
        .automatic
        .find(StyleFamily::DrawingPage, "dp7")
        .expect("dp7");
    assert_eq!(dp7.properties().len(), 1);
    assert_eq!(dp7.properties()[0].value, PropertyValue::Int(1));
}
