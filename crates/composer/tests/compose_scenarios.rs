use pretty_assertions::assert_eq;
use preview_composer::{ComposerConfig, Diagnostic, DocumentComposer, ELEMENT_ID_ATTR};
use preview_parser::{parse, ClassifierConfig, EditOverlay, ProjectKind, ProjectView};

const PAGE: &str = r#"Here is your page:
--- index.html ---
<!DOCTYPE html>
<html>
<head>
<title>Demo</title>
<link rel="stylesheet" href="styles.css">
<link rel="stylesheet" href="theme.css">
</head>
<body>
<h1 id="title">Hello</h1>
<script src="app.js"></script>
</body>
</html>
--- styles.css ---
h1 { color: red; }
--- app.js ---
setInterval(function () { document.title = Date.now(); }, 1000);
"#;

#[test]
fn flat_page_is_inlined_and_instrumented() {
    let project = parse(PAGE);
    let overlay = EditOverlay::new();
    let classification = project.classify(&ClassifierConfig::default());
    assert_eq!(classification.entry.as_deref(), Some("index.html"));

    let mut composer = DocumentComposer::default();
    let doc = composer.compose(&ProjectView::new(&project, &overlay), &classification);

    assert_eq!(doc.kind, ProjectKind::Flat);
    assert_eq!(doc.sandbox, "allow-scripts");
    assert!(doc.html.contains("h1 { color: red; }"));
    assert!(doc.html.contains("setInterval(function ()"));
    assert!(!doc.html.contains(r#"href="styles.css""#));
    assert!(doc.html.contains(r#"href="theme.css""#));
    assert_eq!(
        doc.diagnostics,
        vec![Diagnostic::UnresolvedReference {
            from: "index.html".into(),
            target: "theme.css".into(),
            reference: preview_graph::ReferenceKind::Stylesheet,
        }]
    );

    // The timer registry must be installed before project scripts run
    let registry = doc.html.find("window.setInterval = function").unwrap();
    let project_script = doc.html.find("document.title = Date.now()").unwrap();
    assert!(registry < project_script);
}

#[test]
fn edit_mode_and_overlay_flow_into_document() {
    let project = parse(PAGE);
    let mut overlay = EditOverlay::new();
    overlay.set("styles.css", "h1 { color: green; }").unwrap();
    let classification = project.classify(&ClassifierConfig::default());

    let mut composer = DocumentComposer::new(ComposerConfig::editing()).unwrap();
    let doc = composer.compose(&ProjectView::new(&project, &overlay), &classification);

    assert!(doc.edit_mode);
    assert!(doc.html.contains("h1 { color: green; }"));
    assert!(!doc.html.contains("color: red"));
    assert!(doc.html.contains(ELEMENT_ID_ATTR));
    assert!(doc.html.contains("\"elementSelected\""));
}

#[test]
fn headerless_markup_still_previews() {
    let project = parse("```html\n<div>Just a div</div>\n```");
    let overlay = EditOverlay::new();
    let classification = project.classify(&ClassifierConfig::default());

    let doc = DocumentComposer::default()
        .compose(&ProjectView::new(&project, &overlay), &classification);
    assert_eq!(doc.kind, ProjectKind::Flat);
    assert!(doc.html.contains("<div>Just a div</div>"));
    assert!(doc.html.starts_with("<!DOCTYPE html>"));
}

#[test]
fn here_is_your_page_gets_its_stylesheet_inlined() {
    let project = parse(
        "Here is your page:\n--- index.html ---\n<html><body>Hi</body></html>\n--- styles.css ---\nbody{color:red}",
    );
    let overlay = EditOverlay::new();
    let classification = project.classify(&ClassifierConfig::default());
    assert_eq!(classification.kind, ProjectKind::Flat);

    let doc = DocumentComposer::default()
        .compose(&ProjectView::new(&project, &overlay), &classification);

    assert_eq!(doc.kind, ProjectKind::Flat);
    assert!(doc.diagnostics.is_empty());
    assert!(doc
        .html
        .contains("<style data-preview-source=\"styles.css\">\nbody{color:red}\n</style>"));
    assert!(!doc.html.contains("<link"));
    assert!(doc.html.contains("<body>Hi"));
    assert!(doc.html.find("body{color:red}").unwrap() < doc.html.find("<body>").unwrap());
}
