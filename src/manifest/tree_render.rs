//! ASCII tree rendering for module registries.

use crate::models::ModuleManifest;

use super::ModuleRegistry;

const SECTION: char = '▸';
const SCRIPT: char = '◇';
const STYLE: char = '○';
const DOCUMENT_TYPE: char = '●';
const FIXTURE: char = '◆';
const INERT_HOOK: char = '✗';

/// What a tree node stands for; decides its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    Section,
    Script,
    Style,
    DocumentType,
    Fixture,
    InertHook,
}

fn kind_symbol(kind: NodeKind) -> Option<char> {
    match kind {
        NodeKind::Module => None,
        NodeKind::Section => Some(SECTION),
        NodeKind::Script => Some(SCRIPT),
        NodeKind::Style => Some(STYLE),
        NodeKind::DocumentType => Some(DOCUMENT_TYPE),
        NodeKind::Fixture => Some(FIXTURE),
        NodeKind::InertHook => Some(INERT_HOOK),
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn section(label: &str, children: Vec<TreeNode>) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self {
            kind: NodeKind::Section,
            label: label.to_string(),
            children,
        })
    }
}

/// Build the display tree of one manifest. Empty sections are omitted.
pub fn manifest_node(manifest: &ModuleManifest) -> TreeNode {
    let mut assets = Vec::new();
    for (scope, includes) in [("app", &manifest.asset_includes), ("web", &manifest.web_includes)] {
        for script in &includes.scripts {
            assets.push(TreeNode::leaf(NodeKind::Script, format!("{} {}", scope, script)));
        }
        for style in &includes.styles {
            assets.push(TreeNode::leaf(NodeKind::Style, format!("{} {}", scope, style)));
        }
    }

    let fixtures = manifest
        .fixtures
        .iter()
        .map(|f| {
            TreeNode::leaf(
                NodeKind::Fixture,
                format!("{}: {}", f.entity_kind, f.filters.values.join(", ")),
            )
        })
        .collect();

    let doctypes = manifest
        .owned_document_types
        .iter()
        .map(|d| TreeNode::leaf(NodeKind::DocumentType, d.clone()))
        .collect();

    let hooks = manifest
        .hooks
        .events()
        .into_iter()
        .map(|(event, callbacks)| {
            TreeNode::leaf(
                NodeKind::InertHook,
                format!("{} -> {}", event, callbacks.join(", ")),
            )
        })
        .collect();

    let children = [
        TreeNode::section("assets", assets),
        TreeNode::section("fixtures", fixtures),
        TreeNode::section("document types", doctypes),
        TreeNode::section("hooks (inert)", hooks),
    ]
    .into_iter()
    .flatten()
    .collect();

    TreeNode {
        kind: NodeKind::Module,
        label: format!(
            "{} ({} {})",
            manifest.title, manifest.name, manifest.version
        ),
        children,
    }
}

/// Render every module of a registry.
pub fn render_registry(registry: &ModuleRegistry) -> String {
    let nodes: Vec<TreeNode> = registry.iter().map(manifest_node).collect();
    render_tree(&nodes)
}

/// Render a tree as ASCII art with kind symbols.
///
/// Example output:
/// ```text
/// Orchestrator HR (orchestrator_hr 0.1.0)
/// ├── ▸ assets
/// │   ├── ◇ app /assets/orchestrator_hr/js/hr.js
/// │   └── ○ app /assets/orchestrator_hr/css/hr.css
/// └── ▸ document types
///     └── ● Employee
/// ```
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut output = String::new();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        render_node(&mut output, node, "", is_last, true);
    }
    output
}

fn render_node(output: &mut String, node: &TreeNode, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        output.push_str(&node.label);
        output.push('\n');
    } else {
        let branch = if is_last { "└── " } else { "├── " };
        output.push_str(prefix);
        output.push_str(branch);
        if let Some(symbol) = kind_symbol(node.kind) {
            output.push(symbol);
            output.push(' ');
        }
        output.push_str(&node.label);
        output.push('\n');
    }

    let child_prefix = if is_root {
        String::new()
    } else {
        let continuation = if is_last { "    " } else { "│   " };
        format!("{}{}", prefix, continuation)
    };

    for (i, child) in node.children.iter().enumerate() {
        let child_is_last = i == node.children.len() - 1;
        render_node(output, child, &child_prefix, child_is_last, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::parse;

    fn hr_manifest() -> ModuleManifest {
        parse(
            r#"
            name = "orchestrator_hr"
            title = "Orchestrator HR"
            publisher = "Orchestrator Team"
            description = "HR"
            version = "0.1.0"
            license = "Proprietary"
            owned_document_types = ["Employee"]

            [asset_includes]
            scripts = ["/assets/orchestrator_hr/js/hr.js"]
            styles = ["/assets/orchestrator_hr/css/hr.css"]
            "#,
            "inline",
        )
        .unwrap()
        .manifest
    }

    #[test]
    fn test_module_without_sections() {
        let mut manifest = hr_manifest();
        manifest.asset_includes = Default::default();
        manifest.owned_document_types.clear();

        let output = render_tree(&[manifest_node(&manifest)]);
        assert_eq!(output, "Orchestrator HR (orchestrator_hr 0.1.0)\n");
    }

    #[test]
    fn test_nested_sections() {
        let output = render_tree(&[manifest_node(&hr_manifest())]);
        let expected = "Orchestrator HR (orchestrator_hr 0.1.0)\n├── ▸ assets\n│   ├── ◇ app /assets/orchestrator_hr/js/hr.js\n│   └── ○ app /assets/orchestrator_hr/css/hr.css\n└── ▸ document types\n    └── ● Employee\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_inert_hooks_are_listed() {
        let mut manifest = hr_manifest();
        manifest.hooks.websocket_events.insert(
            "task_updated".to_string(),
            vec!["orchestrator_gameplan.ws.on_task_update".to_string()],
        );

        let output = render_tree(&[manifest_node(&manifest)]);
        assert!(output.ends_with(
            "└── ▸ hooks (inert)\n    └── ✗ websocket:task_updated -> orchestrator_gameplan.ws.on_task_update\n"
        ));
    }
}
