use serde::{Deserialize, Serialize};

use crate::types::ProjectFile;

/// File or folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    File,
    Folder,
}

/// Node of the hierarchical project view. Folders never carry content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileNode {
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Folder,
            children: Vec::new(),
            content: None,
        }
    }

    #[must_use]
    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::File,
            children: Vec::new(),
            content: Some(content.into()),
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Build the folder hierarchy for an ordered file list.
///
/// Deterministic: folders appear in order of first use, files in input order.
#[must_use]
pub fn build_tree(files: &[ProjectFile]) -> Vec<FileNode> {
    let mut roots: Vec<FileNode> = Vec::new();

    for file in files {
        let segments: Vec<&str> = file.path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, folders)) = segments.split_last() else {
            continue;
        };

        let mut level = &mut roots;
        for folder in folders {
            let idx = match level
                .iter()
                .position(|node| node.is_folder() && node.name == *folder)
            {
                Some(idx) => idx,
                None => {
                    level.push(FileNode::folder(*folder));
                    level.len() - 1
                }
            };
            level = &mut level[idx].children;
        }
        level.push(FileNode::file(*leaf, file.content.clone()));
    }

    roots
}

/// Recover the (path, content) list from a tree, depth first
#[must_use]
pub fn flatten(nodes: &[FileNode]) -> Vec<ProjectFile> {
    fn walk(nodes: &[FileNode], prefix: &str, out: &mut Vec<ProjectFile>) {
        for node in nodes {
            let path = if prefix.is_empty() {
                node.name.clone()
            } else {
                format!("{prefix}/{}", node.name)
            };
            match node.kind {
                NodeKind::File => out.push(ProjectFile::new(
                    path,
                    node.content.clone().unwrap_or_default(),
                )),
                NodeKind::Folder => walk(&node.children, &path, out),
            }
        }
    }

    let mut out = Vec::new();
    walk(nodes, "", &mut out);
    out
}

/// Find a node by slash-separated path
#[must_use]
pub fn find_node<'a>(nodes: &'a [FileNode], path: &str) -> Option<&'a FileNode> {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    let mut level = nodes;
    while let Some(segment) = segments.next() {
        let last = segments.peek().is_none();
        let node = level
            .iter()
            .find(|node| node.name == segment && (last || node.is_folder()))?;
        if last {
            return Some(node);
        }
        level = &node.children;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files() -> Vec<ProjectFile> {
        vec![
            ProjectFile::new("index.html", "<p>hi</p>"),
            ProjectFile::new("css/site.css", "p{}"),
            ProjectFile::new("js/app.js", "run()"),
            ProjectFile::new("css/print.css", "@media print{}"),
        ]
    }

    #[test]
    fn folders_are_reused() {
        let tree = build_tree(&files());
        let names: Vec<_> = tree.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("index.html", NodeKind::File),
                ("css", NodeKind::Folder),
                ("js", NodeKind::Folder),
            ]
        );
        assert_eq!(tree[1].children.len(), 2);
        assert_eq!(tree[1].content, None);
        assert_eq!(flatten(&tree).len(), 4);
    }

    #[test]
    fn flatten_groups_by_folder() {
        let flat = flatten(&build_tree(&files()));
        let paths: Vec<_> = flat.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["index.html", "css/site.css", "css/print.css", "js/app.js"]
        );
    }

    #[test]
    fn file_and_folder_may_share_a_name() {
        let files = vec![
            ProjectFile::new("docs", "plain file"),
            ProjectFile::new("docs/readme.md", "# Docs"),
        ];
        let tree = build_tree(&files);
        assert_eq!(tree.len(), 2);
        assert_eq!(find_node(&tree, "docs").map(|n| n.kind), Some(NodeKind::File));
        assert_eq!(
            find_node(&tree, "docs/readme.md").and_then(|n| n.content.as_deref()),
            Some("# Docs")
        );
    }

    #[test]
    fn find_missing_node() {
        let tree = build_tree(&files());
        assert!(find_node(&tree, "css/missing.css").is_none());
        assert!(find_node(&tree, "").is_none());
        assert!(find_node(&tree, "css").is_some_and(FileNode::is_folder));
    }
}
