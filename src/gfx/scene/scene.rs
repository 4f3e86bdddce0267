// src/gfx/scene/scene.rs
//! Arena-backed scene graph.
//!
//! Nodes live in a map keyed by [`NodeId`]; parents and children refer to
//! each other by id. A Root sentinel always exists, is never selectable and
//! never removed. The graph stays acyclic: every re-parent walks the target's
//! ancestor chain first.

use std::collections::HashMap;

use super::node::{NodeId, NodeKind, SceneNode};
use crate::error::GfxError;
use crate::gfx::resources::GeometryStore;
use crate::math::Mat4;

/// Nodes taken out of a scene by [`Scene::remove`], in post-order.
///
/// The last node is the removed subtree's top. If buffers were not released
/// during removal, the caller either re-attaches the subtree with
/// [`Scene::reattach`] or releases it with [`DetachedSubtree::release`].
#[derive(Debug)]
pub struct DetachedSubtree {
    top: NodeId,
    nodes: Vec<SceneNode>,
}

impl DetachedSubtree {
    pub fn top(&self) -> NodeId {
        self.top
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id() == id)
    }

    /// Releases every node's geometry. Stops at the first store error.
    pub fn release(mut self, store: &mut dyn GeometryStore) -> Result<(), GfxError> {
        for node in self.nodes.iter_mut() {
            node.release_geometry(store)?;
        }
        Ok(())
    }
}

/// Main scene graph container
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    selected: Option<NodeId>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let root = SceneNode::root();
        let root_id = root.id();
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes,
            root: root_id,
            selected: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, Root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the Root remains.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Creates a node of `kind` under the Root without touching the selection.
    pub fn create(
        &mut self,
        kind: NodeKind,
        store: &mut dyn GeometryStore,
    ) -> Result<NodeId, GfxError> {
        self.create_under(self.root, kind, store)
    }

    /// Creates a node of `kind` as the last child of `parent`.
    pub fn create_under(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        store: &mut dyn GeometryStore,
    ) -> Result<NodeId, GfxError> {
        if kind == NodeKind::Root {
            return Err(GfxError::NotSpawnable(kind));
        }
        if !self.contains(parent) {
            return Err(GfxError::UnknownNode(parent));
        }
        let node = SceneNode::new(kind, store)?;
        self.attach(parent, node)
    }

    /// Adopts a detached node built elsewhere as the last child of `parent`.
    pub fn attach(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, GfxError> {
        if node.kind() == NodeKind::Root {
            return Err(GfxError::NotSpawnable(NodeKind::Root));
        }
        let id = node.id();
        let Some(p) = self.nodes.get_mut(&parent) else {
            return Err(GfxError::UnknownNode(parent));
        };
        p.children.push(id);
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// User-facing creation: attaches under the Root, names the node
    /// "New <Type>" and makes it the selection.
    pub fn spawn(
        &mut self,
        kind: NodeKind,
        store: &mut dyn GeometryStore,
    ) -> Result<NodeId, GfxError> {
        let id = self.create(kind, store)?;
        let name = self.ensure_unique_name(&format!("New {}", kind.type_name()));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_name(name);
        }
        self.select(Some(id));
        log::debug!("spawned {:?} as {id}", kind);
        Ok(id)
    }

    /// True if `ancestor` is `node` itself or lies on `node`'s parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(SceneNode::parent);
        }
        false
    }

    /// Moves `node` under `new_parent` and selects it.
    ///
    /// Returns `false`, changing nothing, when either id is unknown, `node`
    /// is the Root, `new_parent` already is the parent, or `new_parent` lies
    /// inside `node`'s subtree.
    pub fn set_parent(&mut self, node: NodeId, new_parent: NodeId) -> bool {
        if node == self.root || !self.contains(node) || !self.contains(new_parent) {
            return false;
        }
        let old_parent = self.nodes.get(&node).and_then(SceneNode::parent);
        if old_parent == Some(new_parent) {
            return false;
        }
        if self.is_ancestor_or_self(node, new_parent) {
            log::debug!("rejected re-parenting {node} under its descendant {new_parent}");
            return false;
        }

        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            old.children.retain(|c| *c != node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(new_parent);
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(node);
        }
        self.select(Some(node));
        log::debug!("re-parented {node} under {new_parent}");
        true
    }

    /// Pre-order ids of the subtree at `from`, `from` first.
    pub fn pre_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Post-order ids of the subtree at `from`, `from` last.
    pub fn post_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_post_order(from, &mut out);
        out
    }

    fn collect_post_order(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(&id) {
            for child in &node.children {
                self.collect_post_order(*child, out);
            }
            out.push(id);
        }
    }

    /// Detaches `id` and its whole subtree, children before parents.
    ///
    /// With a store, every removed node's geometry is released on the way
    /// out; release failures are logged and do not stop the removal. The
    /// selection is cleared when it lay inside the subtree. Removing the Root
    /// or an unknown id returns `None`.
    pub fn remove(
        &mut self,
        id: NodeId,
        mut release: Option<&mut dyn GeometryStore>,
    ) -> Option<DetachedSubtree> {
        if id == self.root || !self.contains(id) {
            return None;
        }

        if self.selected.is_some_and(|s| self.is_ancestor_or_self(id, s)) {
            self.select(None);
        }

        let order = self.post_order(id);
        let mut nodes = Vec::with_capacity(order.len());
        for node_id in order {
            let Some(mut node) = self.nodes.remove(&node_id) else {
                continue;
            };
            // links inside the subtree stay intact so it can be re-attached
            if node_id == id {
                if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
                    parent.children.retain(|c| *c != node_id);
                }
            }
            if let Some(store) = release.as_deref_mut() {
                if let Err(err) = node.release_geometry(store) {
                    log::error!("failed to release geometry of {node_id}: {err}");
                }
            }
            nodes.push(node);
        }

        log::debug!("removed {} node(s) starting at {id}", nodes.len());
        Some(DetachedSubtree { top: id, nodes })
    }

    /// Puts a detached subtree back as the last child of `parent`.
    ///
    /// Fails with [`GfxError::UnknownNode`] if `parent` is not in the scene;
    /// the subtree is dropped in that case.
    pub fn reattach(
        &mut self,
        subtree: DetachedSubtree,
        parent: NodeId,
    ) -> Result<NodeId, GfxError> {
        if !self.contains(parent) {
            return Err(GfxError::UnknownNode(parent));
        }
        let top = subtree.top;
        for mut node in subtree.nodes {
            if node.id() == top {
                node.parent = Some(parent);
            }
            node.set_selected_flag(false);
            self.nodes.insert(node.id(), node);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(top);
        }
        Ok(top)
    }

    /// Sets the selection flag of `id` and every descendant. Returns the
    /// number of nodes touched.
    pub fn set_selected_recursive(&mut self, id: NodeId, value: bool) -> usize {
        let ids = self.pre_order(id);
        for node_id in &ids {
            if let Some(node) = self.nodes.get_mut(node_id) {
                node.set_selected_flag(value);
            }
        }
        ids.len()
    }

    /// Makes `target` the single primary selection, or clears it with `None`.
    ///
    /// Every flag in the scene is cleared first, then the target's subtree is
    /// flagged. Selecting the Root is ignored.
    pub fn select(&mut self, target: Option<NodeId>) {
        if target == Some(self.root) {
            return;
        }
        let target = target.filter(|id| self.contains(*id));
        self.set_selected_recursive(self.root, false);
        if let Some(id) = target {
            self.set_selected_recursive(id, true);
        }
        self.selected = target;
    }

    /// Primary selection.
    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The node after the current selection in pre-order, wrapping around.
    pub fn next_selectable(&self) -> Option<NodeId> {
        let order: Vec<NodeId> = self
            .pre_order(self.root)
            .into_iter()
            .filter(|id| *id != self.root)
            .collect();
        if order.is_empty() {
            return None;
        }
        let next = match self.selected.and_then(|s| order.iter().position(|id| *id == s)) {
            Some(index) => (index + 1) % order.len(),
            None => 0,
        };
        Some(order[next])
    }

    /// World matrix of `id`, folded from the Root down.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(&node_id)?;
            chain.push(*node.model_matrix());
            current = node.parent();
        }
        Some(
            chain
                .iter()
                .rev()
                .fold(Mat4::identity(), |acc, m| Mat4::pre_multiply(&acc, m)),
        )
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.nodes.values().any(|n| n.name() == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let geometries = self.nodes.values().filter_map(SceneNode::geometry);
        let (renderable_count, total_triangles) =
            geometries.fold((0, 0), |(count, tris), g| (count + 1, tris + g.index_count() / 3));

        SceneStatistics {
            node_count: self.nodes.len() - 1,
            renderable_count,
            total_triangles,
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    /// Nodes excluding the Root
    pub node_count: usize,
    pub renderable_count: usize,
    pub total_triangles: u32,
}
