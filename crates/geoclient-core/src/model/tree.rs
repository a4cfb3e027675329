// ── Layer tree domain types ──
//
// `TreeNode` is the validated authored tree; `LayerGroup` is what the
// builder produces from it. Group children are stored in reverse
// document order so later-declared siblings stack beneath earlier ones.

use serde::Serialize;

use geoclient_api::LayerId;

use super::layer::RenderableLayer;

// ── Authored tree ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Folder(FolderNode),
    Leaf(LeafNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FolderNode {
    pub title: Option<String>,
    pub checked: bool,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub layer_id: LayerId,
    pub checked: bool,
}

impl FolderNode {
    /// Number of leaves anywhere below this folder.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                TreeNode::Folder(folder) => folder.leaf_count(),
                TreeNode::Leaf(_) => 1,
            })
            .sum()
    }
}

// ── Built tree ───────────────────────────────────────────────────

/// One child slot of a built group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum LayerEntry {
    Group(LayerGroup),
    Layer(Box<RenderableLayer>),
    /// A leaf whose descriptor type this client cannot render.
    /// Kept as a slot so the tree shape mirrors the document.
    Unsupported { layer_type: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub visible: bool,
    pub children: Vec<LayerEntry>,
}

impl LayerGroup {
    /// Number of layer slots (including unsupported ones) below this group.
    pub fn leaf_count(&self) -> usize {
        self.children
            .iter()
            .map(|entry| match entry {
                LayerEntry::Group(group) => group.leaf_count(),
                LayerEntry::Layer(_) | LayerEntry::Unsupported { .. } => 1,
            })
            .sum()
    }

    /// All renderable layers below this group, depth-first in stored order.
    pub fn layers(&self) -> Vec<&RenderableLayer> {
        let mut out = Vec::new();
        collect_layers(self, &mut out);
        out
    }
}

fn collect_layers<'a>(group: &'a LayerGroup, out: &mut Vec<&'a RenderableLayer>) {
    for entry in &group.children {
        match entry {
            LayerEntry::Group(child) => collect_layers(child, out),
            LayerEntry::Layer(layer) => out.push(layer),
            LayerEntry::Unsupported { .. } => {}
        }
    }
}
