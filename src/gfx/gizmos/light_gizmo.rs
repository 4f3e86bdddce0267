//! Scene light indicator drawn in the top-left corner.

use crate::error::GfxError;
use crate::gfx::rendering::Viewport;
use crate::gfx::resources::GeometryStore;
use crate::gfx::scene::{NodeId, NodeKind, Scene};
use crate::math::Vector3;

use super::compass::{Part, ANCHOR_COLOR, SHAFT_SCALE};
use super::traits::{Gizmo, GizmoContext};

/// A yellow arrow aimed along the light direction.
pub struct LightDirectionGizmo {
    enabled: bool,
    size: u32,
    scene: Scene,
    anchor: NodeId,
}

impl LightDirectionGizmo {
    pub const NAME: &'static str = "Light Direction";

    pub fn new(store: &mut dyn GeometryStore, size: u32) -> Result<Self, GfxError> {
        let mut scene = Scene::new();
        let root = scene.root();
        let anchor = Part::new(NodeKind::Cube, Vector3::zero(), ANCHOR_COLOR).attach(
            &mut scene,
            root,
            store,
        )?;
        Part::new(NodeKind::Cylinder, Vector3::up(), [0.82, 0.72, 0.0])
            .scaled(SHAFT_SCALE)
            .attach(&mut scene, anchor, store)?;
        Part::new(NodeKind::Cone, Vector3::new(0.0, 2.0, 0.0), [0.9, 0.9, 0.0])
            .attach(&mut scene, anchor, store)?;

        Ok(Self {
            enabled: true,
            size,
            scene,
            anchor,
        })
    }

    /// Rotates the arrow, which points along +y at rest, onto `direction`.
    pub fn aim(&mut self, direction: Vector3) {
        if let Some(anchor) = self.scene.get_mut(self.anchor) {
            anchor.set_rotation(aim_rotation(direction));
        }
    }
}

/// Euler degrees turning +y onto `direction`: tilt about X, then turn about Y.
pub fn aim_rotation(direction: Vector3) -> Vector3 {
    let versor = Vector3::normalized(direction);
    Vector3::new(
        versor.y.clamp(-1.0, 1.0).acos().to_degrees(),
        versor.x.atan2(versor.z).to_degrees(),
        0.0,
    )
}

impl Gizmo for LightDirectionGizmo {
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

    fn viewport(&self, _width: u32, _height: u32) -> Viewport {
        Viewport::new(0, 0, self.size, self.size)
    }

    fn update(&mut self, context: &GizmoContext) {
        self.aim(context.light_direction);
    }
}
