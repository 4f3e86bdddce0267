// src/gfx/scene/node.rs
//! Scene graph elements.
//!
//! A [`SceneNode`] owns its transform and the model matrix derived from it.
//! Every transform setter recomputes the matrix immediately. Hierarchy links
//! are plain [`NodeId`]s resolved through the owning [`super::Scene`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::GfxError;
use crate::gfx::geometry::geometry_for;
use crate::gfx::resources::{GeometryHandle, GeometryId, GeometryStore};
use crate::math::{Mat4, Vector3};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Shape tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Cube,
    Pyramid,
    Tetrahedron,
    Cone,
    Cylinder,
    Empty,
    Root,
}

impl NodeKind {
    /// Kinds a user can place in the scene, in menu order.
    pub const SPAWNABLE: [NodeKind; 6] = [
        NodeKind::Cube,
        NodeKind::Pyramid,
        NodeKind::Tetrahedron,
        NodeKind::Cone,
        NodeKind::Cylinder,
        NodeKind::Empty,
    ];

    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Cube => "Cube",
            NodeKind::Pyramid => "Pyramid",
            NodeKind::Tetrahedron => "Tetrahedron",
            NodeKind::Cone => "Cone",
            NodeKind::Cylinder => "Cylinder",
            NodeKind::Empty => "Empty Object",
            NodeKind::Root => "Root",
        }
    }

    /// Everything except the Root carries geometry.
    pub fn is_renderable(&self) -> bool {
        !matches!(self, NodeKind::Root)
    }
}

/// Position, Euler rotation in degrees (extrinsic X, Y, Z) and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3,
    pub rotation: Vector3,
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::one(),
        }
    }
}

impl Transform {
    /// `T * R * S`.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_transform(self.position, self.rotation, self.scale)
    }
}

/// Uploaded geometry owned by a node.
#[derive(Debug)]
pub struct Geometry {
    handle: GeometryHandle,
    index_count: u32,
    filled: bool,
}

impl Geometry {
    pub fn id(&self) -> GeometryId {
        self.handle.id()
    }

    /// Triangle index count, excluding the loop-closing index.
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Index count of the outline line strip.
    pub fn outline_index_count(&self) -> u32 {
        self.index_count + 1
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }
}

pub const DEFAULT_COLOR: [f32; 3] = [0.5, 0.5, 0.5];

#[derive(Debug)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    kind: NodeKind,
    transform: Transform,
    model_matrix: Mat4,
    geometry: Option<Geometry>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    selected: bool,
    color: [f32; 3],
}

impl SceneNode {
    /// Creates a detached node and uploads the canonical geometry of `kind`.
    pub fn new(kind: NodeKind, store: &mut dyn GeometryStore) -> Result<Self, GfxError> {
        let mut node = Self::without_geometry(kind);
        if let Some(data) = geometry_for(kind) {
            let handle = store.upload(kind.type_name(), &data.to_vertices(), &data.baked_indices())?;
            node.geometry = Some(Geometry {
                handle,
                index_count: data.index_count(),
                filled: data.filled,
            });
        }
        Ok(node)
    }

    /// Creates a detached node with no GPU payload.
    pub fn without_geometry(kind: NodeKind) -> Self {
        let transform = Transform::default();
        Self {
            id: NodeId::next(),
            name: kind.type_name().to_string(),
            kind,
            model_matrix: transform.to_matrix(),
            transform,
            geometry: None,
            parent: None,
            children: Vec::new(),
            selected: false,
            color: DEFAULT_COLOR,
        }
    }

    pub fn root() -> Self {
        Self::without_geometry(NodeKind::Root)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_model_matrix();
    }

    pub fn position(&self) -> Vector3 {
        self.transform.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.transform.position = position;
        self.update_model_matrix();
    }

    pub fn rotation(&self) -> Vector3 {
        self.transform.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vector3) {
        self.transform.rotation = rotation;
        self.update_model_matrix();
    }

    pub fn scale(&self) -> Vector3 {
        self.transform.scale
    }

    pub fn set_scale(&mut self, scale: Vector3) {
        self.transform.scale = scale;
        self.update_model_matrix();
    }

    /// Local model matrix, independent of ancestors.
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    fn update_model_matrix(&mut self) {
        self.model_matrix = self.transform.to_matrix();
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Sets this node's flag only. Use [`super::Scene::set_selected_recursive`]
    /// for the cascading form.
    pub(super) fn set_selected_flag(&mut self, value: bool) {
        self.selected = value;
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }

    /// Gives the geometry back to `store`. A node without geometry is a no-op.
    pub fn release_geometry(&mut self, store: &mut dyn GeometryStore) -> Result<(), GfxError> {
        match self.geometry.take() {
            Some(geometry) => store.release(geometry.handle),
            None => Ok(()),
        }
    }
}
