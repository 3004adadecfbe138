//! 场景编排：每次重绘按固定脚本遍历布局表，平面图与 3D 视图共用同一入口。

use plano_core::geometry::{ScreenPoint, ScreenRect};
use plano_core::layout::{FloorLayout, PlanShape};
use plano_core::projection::{IsoProjector, PlanTransform, ViewState};
use plano_core::surface::DrawingSurface;
use tracing::trace;

use crate::primitives::{self, FaceMode, MarkerCaption, palette};

/// 图例相对平面图偏移原点的水平位置。
const LEGEND_OFFSET_X: f64 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    #[default]
    Plan,
    Isometric,
}

impl RenderMode {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Plan => RenderMode::Isometric,
            RenderMode::Isometric => RenderMode::Plan,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderMode::Plan => "2D",
            RenderMode::Isometric => "3D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanSettings {
    pub width: u32,
    pub height: u32,
    pub transform: PlanTransform,
    pub show_legend: bool,
    pub show_outline: bool,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            transform: PlanTransform::default(),
            show_legend: true,
            show_outline: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoSettings {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub face_mode: FaceMode,
}

impl Default for IsoSettings {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            scale: IsoProjector::DEFAULT_SCALE,
            face_mode: FaceMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComposerSettings {
    pub plan: PlanSettings,
    pub iso: IsoSettings,
}

/// 场景编排器：持有只读布局表与两种模式的出图参数。
#[derive(Debug, Clone)]
pub struct SceneComposer {
    layout: FloorLayout,
    settings: ComposerSettings,
}

impl SceneComposer {
    pub fn new(layout: FloorLayout, settings: ComposerSettings) -> Self {
        Self { layout, settings }
    }

    #[inline]
    pub fn layout(&self) -> &FloorLayout {
        &self.layout
    }

    #[inline]
    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// 指定模式下的画布尺寸。
    pub fn canvas_size(&self, mode: RenderMode) -> (u32, u32) {
        match mode {
            RenderMode::Plan => (self.settings.plan.width, self.settings.plan.height),
            RenderMode::Isometric => (self.settings.iso.width, self.settings.iso.height),
        }
    }

    /// 完整重绘一帧。平面图模式忽略 `view`。
    pub fn compose(&self, surface: &mut dyn DrawingSurface, mode: RenderMode, view: &ViewState) {
        match mode {
            RenderMode::Plan => self.compose_plan(surface),
            RenderMode::Isometric => self.compose_isometric(surface, view),
        }
    }

    fn compose_plan(&self, surface: &mut dyn DrawingSurface) {
        let settings = &self.settings.plan;
        let transform = &settings.transform;
        let (width, height) = surface.size();

        surface.clear();
        surface.fill_rect(
            ScreenRect::new(
                ScreenPoint::new(0.0, 0.0),
                f64::from(width),
                f64::from(height),
            ),
            palette::BACKGROUND,
        );

        for shape in &self.layout.plan {
            match shape {
                PlanShape::Room(room) => primitives::draw_room(surface, transform, room),
                PlanShape::Grid(grid) => primitives::draw_grid(surface, transform, grid),
                PlanShape::Stairs(stairs) => primitives::draw_stairs(surface, transform, stairs),
                PlanShape::Caption(caption) => {
                    primitives::draw_caption(surface, transform, caption)
                }
            }
        }

        if settings.show_outline {
            if let Some(outline) = &self.layout.outline {
                primitives::draw_outline(
                    surface,
                    transform.rect(outline.min(), outline.width(), outline.height()),
                );
            }
        }

        for point in self.layout.access_points() {
            let at = transform.to_screen(point.position);
            primitives::draw_access_point(surface, at, point, MarkerCaption::Full);
        }
        for point in self.layout.wired_jacks() {
            let at = transform.to_screen(point.position);
            primitives::draw_wired_jack(surface, at, point, MarkerCaption::Full);
        }

        for cable in &self.layout.cables {
            primitives::draw_cable(surface, transform, cable);
        }

        if settings.show_legend {
            primitives::draw_legend(surface, transform.offset().offset(LEGEND_OFFSET_X, 0.0));
        }

        trace!(
            shapes = self.layout.plan.len(),
            markers = self.layout.network_points.len(),
            cables = self.layout.cables.len(),
            "平面图已重绘"
        );
    }

    fn compose_isometric(&self, surface: &mut dyn DrawingSurface, view: &ViewState) {
        let settings = &self.settings.iso;
        let (width, height) = surface.size();
        let projector = IsoProjector::for_canvas(width, height, settings.scale);

        surface.clear();

        for volume in self.layout.floor_slab.iter().chain(&self.layout.volumes) {
            primitives::draw_box(surface, &projector, view, volume, settings.face_mode);
        }

        for point in self.layout.access_points() {
            let at = primitives::project_marker(&projector, view, point);
            primitives::draw_access_point(surface, at, point, MarkerCaption::NameOnly);
        }
        for point in self.layout.wired_jacks() {
            let at = primitives::project_marker(&projector, view, point);
            primitives::draw_wired_jack(surface, at, point, MarkerCaption::NameOnly);
        }

        trace!(
            rotation = view.rotation_deg,
            tilt = view.tilt_deg,
            volumes = self.layout.volumes.len(),
            "3D 视图已重绘"
        );
    }
}
