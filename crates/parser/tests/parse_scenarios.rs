use preview_parser::{
    build_tree, classify, parse, ClassifierConfig, NodeKind, ParserConfig, ProjectKind,
    ProjectParser,
};
use pretty_assertions::assert_eq;

const PAGE: &str = "Here is your page:\n--- index.html ---\n<html><body>Hi</body></html>\n--- styles.css ---\nbody{color:red}";

#[test]
fn here_is_your_page_yields_two_files() {
    let project = parse(PAGE);

    let files: Vec<_> = project
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.content.as_str()))
        .collect();
    assert_eq!(
        files,
        vec![
            ("index.html", "<html><body>Hi</body></html>"),
            ("styles.css", "body{color:red}"),
        ]
    );
    assert_eq!(project.report.headers, 2);
    assert_eq!(project.report.preamble_chars, "Here is your page:\n".len());
    assert_eq!(
        project.classify(&ClassifierConfig::default()).kind,
        ProjectKind::Flat
    );
}

#[test]
fn fenced_bodies_with_chatter_between_files() {
    let input = r#"Sure! Below is a small site.

--- index.html ---
```html
<!DOCTYPE html>
<html>
<head><link rel="stylesheet" href="css/site.css"></head>
<body><h1>Hello</h1><script src="./js/app.js"></script></body>
</html>
```

--- css/site.css ---
```css
h1 { color: teal; }


p { margin: 0; }
```

--- js/app.js ---
```javascript
document.querySelector('h1').textContent = 'Hi';
```
"#;

    let project = parse(input);
    assert_eq!(
        project.paths().collect::<Vec<_>>(),
        vec!["index.html", "css/site.css", "js/app.js"]
    );
    assert_eq!(
        project.file("css/site.css").map(|f| f.content.as_str()),
        Some("h1 { color: teal; }\n\np { margin: 0; }")
    );
    assert!(project
        .file("index.html")
        .is_some_and(|f| f.content.starts_with("<!DOCTYPE html>")));
}

#[test]
fn framework_project_is_classified_from_paths() {
    let input = "--- package.json ---\n{\"name\":\"demo\"}\n--- src/App.jsx ---\nexport default () => null;\n--- index.html ---\n<div id=\"root\"></div>";
    let project = parse(input);
    let classification = classify(&project.files, &ClassifierConfig::default());
    assert_eq!(classification.kind, ProjectKind::Framework);
    assert_eq!(classification.signal.as_deref(), Some("package.json"));
}

#[test]
fn plain_answer_becomes_fallback_file() {
    let project = parse("I could not build that, but here are some notes.");
    assert!(project.report.fallback);
    assert_eq!(project.len(), 1);
    assert_eq!(project.files[0].path, "response.txt");
    assert_eq!(
        project.classify(&ClassifierConfig::default()).kind,
        ProjectKind::Unknown
    );
}

#[test]
fn empty_input_still_yields_one_file() {
    let project = parse("");
    assert_eq!(project.len(), 1);
    assert_eq!(project.files[0].content, "");
}

#[test]
fn tree_from_parsed_project() {
    let project = parse("--- index.html ---\n<p>x</p>\n--- assets/css/a.css ---\na{}\n--- assets/js/a.js ---\na()");
    let tree = build_tree(&project.files);

    assert_eq!(tree.len(), 2);
    assert_eq!(tree[1].name, "assets");
    assert_eq!(tree[1].kind, NodeKind::Folder);
    let nested: Vec<_> = tree[1].children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(nested, vec!["css", "js"]);
}

#[test]
fn custom_config_changes_fallback_name() {
    let parser = ProjectParser::new(ParserConfig {
        fallback_path: "answer.md".to_string(),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(parser.parse("no headers").files[0].path, "answer.md");
}
