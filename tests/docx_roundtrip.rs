//! Integration test: export markup to DOCX and import it back

use pagewright::opc::{rel_types, Package};
use pagewright::{export_docx, import_docx, Error, ExportOptions, HeaderFooter, Margins, PageSettings};
use pretty_assertions::assert_eq;

/// 1x1 transparent PNG
const PIXEL_PNG_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn round_trip(markup: &str) -> String {
    init_logging();
    let bytes = export_docx(markup, &PageSettings::default(), &ExportOptions::default())
        .expect("export should succeed");
    import_docx(&bytes).expect("import should succeed").markup
}

#[test]
fn test_hello_world_round_trip() {
    assert_eq!(round_trip("<p>Hello <b>World</b></p>"), "<p>Hello <b>World</b></p>");
}

#[test]
fn test_inline_styles_round_trip() {
    for markup in [
        "<p><i>italic</i> and <u>underlined</u></p>",
        "<p><b><i><u>all three</u></i></b></p>",
        r#"<p><span style="color: #ff0000; font-size: 14pt">red</span></p>"#,
        r#"<p><span style="background-color: #ffff00">marked</span></p>"#,
        r#"<p><span style="font-family: Georgia">serif</span></p>"#,
        "<p>a<br>b\tc</p>",
    ] {
        assert_eq!(round_trip(markup), markup);
    }
}

#[test]
fn test_block_structure_round_trip() {
    for markup in [
        r#"<h1>Title</h1><h3>Sub</h3><p style="text-align: justify">Body</p>"#,
        r#"<p style="text-align: center">c</p><p style="text-align: right">r</p>"#,
        r#"<p style="line-height: 1.5">spaced</p>"#,
        "<ul><li>a</li><li>b<ol><li>c</li></ol></li></ul><p>after</p>",
        "<ul><li>a</li></ul><ul><li>b</li></ul><ol><li>c</li></ol><ol><li>d</li></ol>",
        r#"<table><tr><td>a</td><td colspan="2"><b>b</b></td></tr><tr><td><p>x</p><p>y</p></td><td></td><td>z</td></tr></table>"#,
        r#"<p>a</p><div class="page-break"></div><p>b</p>"#,
        r#"<p>Page <span class="page-number"></span></p>"#,
        r#"<p><a href="https://example.com/">link</a></p>"#,
        "<p></p>",
    ] {
        assert_eq!(round_trip(markup), markup);
    }
}

#[test]
fn test_image_round_trip() {
    let markup = format!(r#"<p><img src="{}" alt="dot" width="40" height="20"></p>"#, PIXEL_PNG_URI);
    assert_eq!(round_trip(&markup), markup);

    // Without a size the image's own dimensions are used
    let markup = format!(r#"<p><img src="{}"></p>"#, PIXEL_PNG_URI);
    assert_eq!(
        round_trip(&markup),
        format!(r#"<p><img src="{}" width="1" height="1"></p>"#, PIXEL_PNG_URI)
    );
}

#[test]
fn test_malformed_image_is_omitted() {
    assert_eq!(
        round_trip(r#"<p>before<img src="data:image/png;base64,%%%">after</p>"#),
        "<p>beforeafter</p>"
    );
}

#[test]
fn test_imported_markup_is_canonical() {
    let imported = round_trip(r#"<p>x &amp; y &lt; z</p><ul><li>one</li></ul>"#);
    let reparsed = pagewright::markup::parse(&imported).unwrap();
    assert_eq!(pagewright::markup::to_string(&reparsed), imported);
}

#[test]
fn test_margin_conversion() {
    init_logging();
    let settings = PageSettings {
        margins: Margins {
            top: 25.4,
            bottom: 19.1,
            left: 31.8,
            right: 12.7,
        },
        ..Default::default()
    };
    let bytes = export_docx("<p>x</p>", &settings, &ExportOptions::default()).unwrap();

    let package = Package::from_bytes(&bytes).unwrap();
    let document = package.main_document_part().unwrap().xml().unwrap();
    assert!(document.contains(r#"w:top="1440""#));
    assert!(document.contains(r#"w:bottom="1083""#));

    let imported = import_docx(&bytes).unwrap().settings.unwrap();
    for (got, want) in [
        (imported.margins.top, 25.4),
        (imported.margins.bottom, 19.1),
        (imported.margins.left, 31.8),
        (imported.margins.right, 12.7),
    ] {
        assert!((got - want).abs() <= 0.1, "{} vs {}", got, want);
    }

    // And back to the same native value
    let again = export_docx("<p>x</p>", &imported, &ExportOptions::default()).unwrap();
    let package = Package::from_bytes(&again).unwrap();
    let document = package.main_document_part().unwrap().xml().unwrap();
    assert!(document.contains(r#"w:top="1440""#));
    assert!(document.contains(r#"w:bottom="1083""#));
}

#[test]
fn test_settings_round_trip() {
    init_logging();
    let settings = PageSettings {
        first_line_indent: 7.5,
        header: HeaderFooter::with_content("<p>Header text</p>"),
        footer: HeaderFooter::with_content(r#"<p><span class="page-number"></span></p>"#),
        ..Default::default()
    };
    let bytes = export_docx("<p>x</p>", &settings, &ExportOptions::default()).unwrap();
    let imported = import_docx(&bytes).unwrap().settings.unwrap();

    assert_eq!(imported.margins, Margins::default());
    assert_eq!(imported.first_line_indent, 7.5);
    assert!(imported.header.enabled);
    assert!(imported.footer.enabled);
    // Header and footer content is not read back
    assert_eq!(imported.header.content, "");
}

#[test]
fn test_package_layout() {
    let markup = format!(r#"<p><img src="{}"><a href="https://a.example/">a</a></p>"#, PIXEL_PNG_URI);
    let settings = PageSettings {
        footer: HeaderFooter::with_content("<p>f</p>"),
        ..Default::default()
    };
    let bytes = export_docx(&markup, &settings, &ExportOptions::default()).unwrap();
    let package = Package::from_bytes(&bytes).unwrap();

    let names: Vec<&str> = package.parts().map(|p| p.uri().as_str()).collect();
    assert_eq!(
        names,
        vec![
            "/word/document.xml",
            "/word/styles.xml",
            "/word/numbering.xml",
            "/word/footer1.xml",
            "/word/media/image1.png",
        ]
    );

    let rels = package.main_document_part().unwrap().relationships().unwrap();
    let ids: Vec<(&str, &str)> = rels.iter().map(|r| (r.id.as_str(), r.rel_type.as_str())).collect();
    assert_eq!(
        ids,
        vec![
            ("rId1", rel_types::STYLES),
            ("rId2", rel_types::NUMBERING),
            ("rId4", rel_types::FOOTER),
            ("rId5", rel_types::IMAGE),
            ("rId6", rel_types::HYPERLINK),
        ]
    );
}

#[test]
fn test_export_is_deterministic() {
    let markup = format!(r#"<h2>t</h2><p><img src="{}"></p>"#, PIXEL_PNG_URI);
    let settings = PageSettings::default();
    let a = export_docx(&markup, &settings, &ExportOptions::default()).unwrap();
    let b = export_docx(&markup, &settings, &ExportOptions::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_malformed_package() {
    assert!(matches!(import_docx(b""), Err(Error::MalformedPackage(_))));
    assert!(matches!(import_docx(b"<html></html>"), Err(Error::MalformedPackage(_))));
}
