// ── Layer tree builder ──
//
// Walks the authored tree depth-first and produces the layer group
// hierarchy. Children of every group are built in document order and
// then stored reversed. A single failed lookup aborts the whole build.

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, try_join_all};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::layer::LayerFactory;
use crate::model::{FolderNode, LayerEntry, LayerGroup, LeafNode, TreeNode};
use crate::resolver::LayerResolver;

/// How the leaves under one folder are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiblingResolution {
    /// One lookup at a time, in document order.
    #[default]
    Sequential,
    /// All siblings in flight at once. Output order is unchanged.
    Concurrent,
}

#[derive(Debug, Clone)]
pub struct TreeBuilder<R> {
    resolver: R,
    factory: LayerFactory,
    siblings: SiblingResolution,
}

impl<R: LayerResolver> TreeBuilder<R> {
    pub fn new(resolver: R, factory: LayerFactory) -> Self {
        Self {
            resolver,
            factory,
            siblings: SiblingResolution::default(),
        }
    }

    #[must_use]
    pub fn with_siblings(mut self, siblings: SiblingResolution) -> Self {
        self.siblings = siblings;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Build the root layer group. The root never carries a name.
    pub async fn build_tree(&self, root: &FolderNode) -> Result<LayerGroup, CoreError> {
        debug!(
            leaves = root.leaf_count(),
            siblings = ?self.siblings,
            "building layer tree"
        );
        self.build_folder(root, true).await
    }

    fn build_folder<'a>(
        &'a self,
        folder: &'a FolderNode,
        is_root: bool,
    ) -> BoxFuture<'a, Result<LayerGroup, CoreError>> {
        async move {
            let mut children = match self.siblings {
                SiblingResolution::Sequential => {
                    let mut built = Vec::with_capacity(folder.children.len());
                    for child in &folder.children {
                        built.push(self.build_node(child).await?);
                    }
                    built
                }
                SiblingResolution::Concurrent => {
                    try_join_all(folder.children.iter().map(|child| self.build_node(child)))
                        .await?
                }
            };
            children.reverse();

            Ok(LayerGroup {
                name: if is_root { None } else { folder.title.clone() },
                visible: folder.checked,
                children,
            })
        }
        .boxed()
    }

    async fn build_node(&self, node: &TreeNode) -> Result<LayerEntry, CoreError> {
        match node {
            TreeNode::Folder(folder) => {
                Ok(LayerEntry::Group(self.build_folder(folder, false).await?))
            }
            TreeNode::Leaf(leaf) => self.build_leaf(leaf).await,
        }
    }

    async fn build_leaf(&self, leaf: &LeafNode) -> Result<LayerEntry, CoreError> {
        let descriptor = self.resolver.resolve(&leaf.layer_id).await?;

        Ok(match self.factory.build_layer(&descriptor) {
            Some(mut layer) => {
                layer.visible = leaf.checked;
                LayerEntry::Layer(Box::new(layer))
            }
            None => LayerEntry::Unsupported {
                layer_type: descriptor.layer_type.to_string(),
            },
        })
    }
}
