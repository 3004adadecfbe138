//! 坐标变换：二维平面图的缩放平移，以及三维视图的偏航 + 俯仰正交投影。
//!
//! 两条管线在数值上彼此独立（各自的缩放、原点与 y 轴约定），不要尝试合并。

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::geometry::{Point2, Point3, ScreenPoint, ScreenRect};

pub const DEFAULT_ROTATION_DEG: f64 = 45.0;
pub const DEFAULT_TILT_DEG: f64 = 30.0;

/// 三维视图的交互状态。旋转角不限范围，俯仰角由界面限制在 0–60，这里不做截断。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub rotation_deg: f64,
    pub tilt_deg: f64,
}

impl ViewState {
    #[inline]
    pub fn new(rotation_deg: f64, tilt_deg: f64) -> Self {
        Self {
            rotation_deg,
            tilt_deg,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_DEG, DEFAULT_TILT_DEG)
    }
}

/// 二维平面图变换：`screen = model * scale + offset`。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanTransform {
    scale: f64,
    offset: DVec2,
}

impl PlanTransform {
    pub const DEFAULT_SCALE: f64 = 6.0;
    pub const DEFAULT_OFFSET: f64 = 20.0;

    #[inline]
    pub fn new(scale: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale,
            offset: DVec2::new(offset_x, offset_y),
        }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn offset(&self) -> ScreenPoint {
        ScreenPoint(self.offset)
    }

    #[inline]
    pub fn to_screen(&self, point: Point2) -> ScreenPoint {
        ScreenPoint(point.as_vec2() * self.scale + self.offset)
    }

    /// 模型长度换算为像素长度。
    #[inline]
    pub fn length(&self, value: f64) -> f64 {
        value * self.scale
    }

    pub fn rect(&self, origin: Point2, width: f64, height: f64) -> ScreenRect {
        ScreenRect::new(
            self.to_screen(origin),
            self.length(width),
            self.length(height),
        )
    }
}

impl Default for PlanTransform {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_SCALE,
            Self::DEFAULT_OFFSET,
            Self::DEFAULT_OFFSET,
        )
    }
}

/// 三维轴测投影（无透视除法）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjector {
    center: DVec2,
    scale: f64,
}

impl IsoProjector {
    pub const DEFAULT_SCALE: f64 = 5.0;

    #[inline]
    pub fn new(center: ScreenPoint, scale: f64) -> Self {
        Self {
            center: center.as_vec2(),
            scale,
        }
    }

    /// 以画布中心为投影原点。
    pub fn for_canvas(width: u32, height: u32, scale: f64) -> Self {
        Self::new(
            ScreenPoint::new(f64::from(width) / 2.0, f64::from(height) / 2.0),
            scale,
        )
    }

    #[inline]
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint(self.center)
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// 先绕 z 轴偏航，再在 y/z 平面内俯仰；屏幕 y 轴朝下，因此取反。
    pub fn project(&self, point: Point3, view: &ViewState) -> ScreenPoint {
        let yaw = DVec2::from_angle(view.rotation_deg.to_radians());
        let rotated = yaw.rotate(DVec2::new(point.x(), point.y()));
        let (sin_tilt, cos_tilt) = view.tilt_deg.to_radians().sin_cos();

        let screen_x = rotated.x;
        let screen_y = rotated.y * cos_tilt - point.z() * sin_tilt;

        ScreenPoint::new(
            self.center.x + screen_x * self.scale,
            self.center.y - screen_y * self.scale,
        )
    }
}

/// 模型空间法向量在观察方向上的分量，大于零表示该面朝向观察者。
pub fn facing_component(normal: DVec3, view: &ViewState) -> f64 {
    let yaw = DVec2::from_angle(view.rotation_deg.to_radians());
    let rotated = yaw.rotate(DVec2::new(normal.x, normal.y));
    let (sin_tilt, cos_tilt) = view.tilt_deg.to_radians().sin_cos();
    rotated.y * sin_tilt + normal.z * cos_tilt
}
