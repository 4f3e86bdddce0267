//! World-axis compass drawn in the top-right corner.

use crate::error::GfxError;
use crate::gfx::rendering::Viewport;
use crate::gfx::resources::GeometryStore;
use crate::gfx::scene::{NodeId, NodeKind, Scene};
use crate::math::Vector3;

use super::traits::Gizmo;

/// One posed, coloured node of a gizmo graph.
pub(super) struct Part {
    pub kind: NodeKind,
    pub position: Vector3,
    pub rotation: Vector3,
    pub scale: Vector3,
    pub color: [f32; 3],
}

impl Part {
    pub fn new(kind: NodeKind, position: Vector3, color: [f32; 3]) -> Self {
        Self {
            kind,
            position,
            rotation: Vector3::zero(),
            scale: Vector3::one(),
            color,
        }
    }

    pub fn rotated(mut self, rotation: Vector3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    pub fn attach(
        self,
        scene: &mut Scene,
        parent: NodeId,
        store: &mut dyn GeometryStore,
    ) -> Result<NodeId, GfxError> {
        let id = scene.create_under(parent, self.kind, store)?;
        if let Some(node) = scene.get_mut(id) {
            node.set_position(self.position);
            node.set_rotation(self.rotation);
            node.set_scale(self.scale);
            node.set_color(self.color);
        }
        Ok(id)
    }
}

pub(super) const ANCHOR_COLOR: [f32; 3] = [0.9, 0.9, 0.9];
pub(super) const SHAFT_SCALE: Vector3 = Vector3::new(0.5, 1.0, 0.5);

/// White cube with a red X, green Y and blue Z arrow.
pub struct CompassGizmo {
    enabled: bool,
    size: u32,
    scene: Scene,
    anchor: NodeId,
}

impl CompassGizmo {
    pub const NAME: &'static str = "Compass";

    /// Builds the graph; `size` is the side of the square viewport in pixels.
    pub fn new(store: &mut dyn GeometryStore, size: u32) -> Result<Self, GfxError> {
        let mut scene = Scene::new();
        let root = scene.root();
        let anchor = Part::new(NodeKind::Cube, Vector3::zero(), ANCHOR_COLOR).attach(
            &mut scene,
            root,
            store,
        )?;

        let arms = [
            (
                Part::new(NodeKind::Cylinder, Vector3::right(), [0.7, 0.0, 0.0])
                    .rotated(Vector3::new(0.0, 0.0, -90.0))
                    .scaled(SHAFT_SCALE),
                Part::new(NodeKind::Cone, Vector3::new(2.0, 0.0, 0.0), [0.9, 0.0, 0.0])
                    .rotated(Vector3::new(0.0, 0.0, -90.0)),
            ),
            (
                Part::new(NodeKind::Cylinder, Vector3::up(), [0.0, 0.7, 0.0]).scaled(SHAFT_SCALE),
                Part::new(NodeKind::Cone, Vector3::new(0.0, 2.0, 0.0), [0.0, 0.9, 0.0]),
            ),
            (
                Part::new(NodeKind::Cylinder, Vector3::backward(), [0.0, 0.0, 0.7])
                    .rotated(Vector3::new(90.0, 0.0, 0.0))
                    .scaled(SHAFT_SCALE),
                Part::new(NodeKind::Cone, Vector3::new(0.0, 0.0, 2.0), [0.0, 0.0, 0.9])
                    .rotated(Vector3::new(90.0, 0.0, 0.0)),
            ),
        ];
        for (shaft, tip) in arms {
            shaft.attach(&mut scene, anchor, store)?;
            tip.attach(&mut scene, anchor, store)?;
        }

        Ok(Self {
            enabled: true,
            size,
            scene,
            anchor,
        })
    }
}

impl Gizmo for CompassGizmo {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn anchor(&self) -> NodeId {
        self.anchor
    }

    fn viewport(&self, width: u32, _height: u32) -> Viewport {
        Viewport::new(width.saturating_sub(self.size), 0, self.size, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::resources::HeadlessGeometryStore;

    #[test]
    fn arrows_point_along_the_axes() {
        let mut store = HeadlessGeometryStore::new();
        let compass = CompassGizmo::new(&mut store, 150).expect("compass");
        let scene = compass.scene();
        let anchor = scene.get(compass.anchor()).expect("anchor");
        assert_eq!(anchor.children().len(), 6);
        assert_eq!(anchor.color(), ANCHOR_COLOR);

        // the cone apex sits at local +y; each tip rotation must carry it onto its axis
        let tips: Vec<_> = anchor
            .children()
            .iter()
            .filter_map(|id| scene.get(*id))
            .filter(|n| n.kind() == NodeKind::Cone)
            .collect();
        let expected = [Vector3::right(), Vector3::up(), Vector3::backward()];
        for (tip, axis) in tips.iter().zip(expected) {
            let apex = tip.model_matrix().transform_point(Vector3::up());
            let direction = Vector3::normalized(apex - tip.position());
            assert!((Vector3::dot(direction, axis) - 1.0).abs() < 1e-5, "{}", tip.name());
        }
    }

    #[test]
    fn viewport_is_top_right() {
        let mut store = HeadlessGeometryStore::new();
        let compass = CompassGizmo::new(&mut store, 150).expect("compass");
        assert_eq!(compass.viewport(1280, 720), Viewport::new(1130, 0, 150, 150));
        assert_eq!(compass.viewport(100, 720), Viewport::new(0, 0, 150, 150));
    }
}
