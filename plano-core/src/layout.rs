//! 平面图布局表：声明式的图元记录，由场景编排器按声明顺序消费。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;
use crate::geometry::{Bounds2D, Point2, Point3, Vector2};

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("{element}: {field} must be positive, got {value}")]
    NonPositiveDimension {
        element: String,
        field: &'static str,
        value: f64,
    },
    #[error("{element}: {field} must be at least 1")]
    EmptyDivision {
        element: String,
        field: &'static str,
    },
}

fn ensure_positive(element: &str, field: &'static str, value: f64) -> Result<(), LayoutError> {
    // NaN 同样视为非法
    if value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositiveDimension {
            element: element.to_string(),
            field,
            value,
        })
    }
}

/// 房间类别，决定默认填充色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    #[default]
    Room,
    Desk,
    Utility,
    Lobby,
}

impl RoomCategory {
    pub fn default_fill(self) -> Rgb {
        match self {
            RoomCategory::Room => Rgb::from_u32(0xe0f2fe),
            RoomCategory::Desk => Rgb::from_u32(0xfef3c7),
            RoomCategory::Utility => Rgb::from_u32(0xf0fdf4),
            RoomCategory::Lobby => Rgb::from_u32(0xf1f5f9),
        }
    }
}

/// 带标签的矩形区域，可选绕自身中心旋转。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,
    #[serde(default)]
    pub category: RoomCategory,
    #[serde(default)]
    pub rotation_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Rgb>,
}

impl Room {
    pub fn new(origin: Point2, width: f64, height: f64, label: impl Into<String>) -> Self {
        Self {
            origin,
            width,
            height,
            label: label.into(),
            sublabel: None,
            category: RoomCategory::default(),
            rotation_deg: 0.0,
            fill: None,
        }
    }

    pub fn with_sublabel(mut self, sublabel: impl Into<String>) -> Self {
        self.sublabel = Some(sublabel.into());
        self
    }

    pub fn with_category(mut self, category: RoomCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn with_fill(mut self, fill: Rgb) -> Self {
        self.fill = Some(fill);
        self
    }

    /// 实际填充色：显式覆盖优先，否则取类别默认色。
    #[inline]
    pub fn fill(&self) -> Rgb {
        self.fill.unwrap_or_else(|| self.category.default_fill())
    }

    #[inline]
    pub fn center(&self) -> Point2 {
        self.origin
            .translate(Vector2::new(self.width / 2.0, self.height / 2.0))
    }

    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_origin_size(self.origin, self.width, self.height)
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let element = format!("room '{}'", self.label);
        ensure_positive(&element, "width", self.width)?;
        ensure_positive(&element, "height", self.height)
    }
}

/// 被内部分隔线切分的矩形（工位隔断）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridArea {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
    pub rows: u32,
    pub cols: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl GridArea {
    pub fn new(origin: Point2, width: f64, height: f64, rows: u32, cols: u32) -> Self {
        Self {
            origin,
            width,
            height,
            rows,
            cols,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_origin_size(self.origin, self.width, self.height)
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let element = format!(
            "grid at ({:.1}, {:.1})",
            self.origin.x(),
            self.origin.y()
        );
        ensure_positive(&element, "width", self.width)?;
        ensure_positive(&element, "height", self.height)?;
        if self.rows == 0 {
            return Err(LayoutError::EmptyDivision {
                element,
                field: "rows",
            });
        }
        if self.cols == 0 {
            return Err(LayoutError::EmptyDivision {
                element,
                field: "cols",
            });
        }
        Ok(())
    }
}

/// 楼梯：矩形内等分为若干踏步带。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stairs {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
    #[serde(default = "Stairs::default_caption")]
    pub caption: String,
}

impl Stairs {
    /// 踏步带数量，内部画 `TREAD_BANDS - 1` 条踏步线。
    pub const TREAD_BANDS: u32 = 8;

    pub fn new(origin: Point2, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
            caption: Self::default_caption(),
        }
    }

    fn default_caption() -> String {
        "ESCALERAS".to_string()
    }

    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_origin_size(self.origin, self.width, self.height)
    }

    fn validate(&self) -> Result<(), LayoutError> {
        ensure_positive("stairs", "width", self.width)?;
        ensure_positive("stairs", "height", self.height)
    }
}

/// 独立文字标注，可旋转（例如竖排的 "PRINTERS"）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub anchor: Point2,
    pub text: String,
    #[serde(default)]
    pub rotation_deg: f64,
    #[serde(default = "Caption::default_font_size")]
    pub font_size: f64,
}

impl Caption {
    pub fn new(anchor: Point2, text: impl Into<String>) -> Self {
        Self {
            anchor,
            text: text.into(),
            rotation_deg: 0.0,
            font_size: Self::default_font_size(),
        }
    }

    pub fn with_rotation(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    fn default_font_size() -> f64 {
        10.0
    }
}

/// 二维平面图中的一条声明式图元记录。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanShape {
    Room(Room),
    Grid(GridArea),
    Stairs(Stairs),
    Caption(Caption),
}

impl PlanShape {
    /// 图元范围；文字标注退化为锚点。
    pub fn bounds(&self) -> Bounds2D {
        match self {
            PlanShape::Room(room) => room.bounds(),
            PlanShape::Grid(grid) => grid.bounds(),
            PlanShape::Stairs(stairs) => stairs.bounds(),
            PlanShape::Caption(caption) => Bounds2D::new(caption.anchor, caption.anchor),
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        match self {
            PlanShape::Room(room) => room.validate(),
            PlanShape::Grid(grid) => grid.validate(),
            PlanShape::Stairs(stairs) => stairs.validate(),
            PlanShape::Caption(caption) => {
                ensure_positive(&format!("caption '{}'", caption.text), "font_size", caption.font_size)
            }
        }
    }
}

impl From<Room> for PlanShape {
    fn from(value: Room) -> Self {
        PlanShape::Room(value)
    }
}

impl From<GridArea> for PlanShape {
    fn from(value: GridArea) -> Self {
        PlanShape::Grid(value)
    }
}

impl From<Stairs> for PlanShape {
    fn from(value: Stairs) -> Self {
        PlanShape::Stairs(value)
    }
}

impl From<Caption> for PlanShape {
    fn from(value: Caption) -> Self {
        PlanShape::Caption(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    AccessPoint,
    WiredJack,
}

impl NetworkKind {
    /// 3D 视图中的默认安装高度。
    pub fn default_elevation(self) -> f64 {
        match self {
            NetworkKind::AccessPoint => 5.0,
            NetworkKind::WiredJack => 1.0,
        }
    }
}

/// 网络点位标注（AP 或网口），地址仅作展示，不校验格式。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPoint {
    pub position: Point2,
    pub kind: NetworkKind,
    pub label: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl NetworkPoint {
    pub fn access_point(
        position: Point2,
        label: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            position,
            kind: NetworkKind::AccessPoint,
            label: label.into(),
            address: address.into(),
            elevation: None,
        }
    }

    pub fn wired_jack(
        position: Point2,
        label: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            position,
            kind: NetworkKind::WiredJack,
            label: label.into(),
            address: address.into(),
            elevation: None,
        }
    }

    #[inline]
    pub fn elevation(&self) -> f64 {
        self.elevation
            .unwrap_or_else(|| self.kind.default_elevation())
    }

    /// 3D 视图使用的位置。
    #[inline]
    pub fn position_3d(&self) -> Point3 {
        Point3::new(self.position.x(), self.position.y(), self.elevation())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableCategory {
    Cat6,
    Cat6a,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CableSegment {
    pub from: Point2,
    pub to: Point2,
    pub category: CableCategory,
}

impl CableSegment {
    pub fn new(from: Point2, to: Point2, category: CableCategory) -> Self {
        Self { from, to, category }
    }
}

/// 三维长方体体块，房间在 3D 视图中的对应物。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume3D {
    pub origin: Point3,
    pub width: f64,
    pub depth: f64,
    pub height: f64,
    pub color: Rgb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Volume3D {
    /// 标签相对顶面的抬升高度（模型单位）。
    pub const LABEL_LIFT: f64 = 2.0;

    pub fn new(origin: Point3, width: f64, depth: f64, height: f64, color: Rgb) -> Self {
        Self {
            origin,
            width,
            depth,
            height,
            color,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 八个角点：0-3 为底面（逆时针），4-7 为对应的顶面角点。
    pub fn corners(&self) -> [Point3; 8] {
        let o = self.origin;
        let (w, d, h) = (self.width, self.depth, self.height);
        [
            o,
            o.offset(w, 0.0, 0.0),
            o.offset(w, d, 0.0),
            o.offset(0.0, d, 0.0),
            o.offset(0.0, 0.0, h),
            o.offset(w, 0.0, h),
            o.offset(w, d, h),
            o.offset(0.0, d, h),
        ]
    }

    /// 标签锚点：顶面中心再抬升 [`Self::LABEL_LIFT`]。
    pub fn label_anchor(&self) -> Point3 {
        self.origin.offset(
            self.width / 2.0,
            self.depth / 2.0,
            self.height + Self::LABEL_LIFT,
        )
    }

    fn validate(&self) -> Result<(), LayoutError> {
        let element = match &self.label {
            Some(label) => format!("volume '{label}'"),
            None => format!(
                "volume at ({:.1}, {:.1}, {:.1})",
                self.origin.x(),
                self.origin.y(),
                self.origin.z()
            ),
        };
        ensure_positive(&element, "width", self.width)?;
        ensure_positive(&element, "depth", self.depth)?;
        ensure_positive(&element, "height", self.height)
    }
}

/// 完整的楼层布局表。构造后视为只读。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorLayout {
    pub name: String,
    #[serde(default)]
    pub plan: Vec<PlanShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<Bounds2D>,
    #[serde(default)]
    pub network_points: Vec<NetworkPoint>,
    #[serde(default)]
    pub cables: Vec<CableSegment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_slab: Option<Volume3D>,
    #[serde(default)]
    pub volumes: Vec<Volume3D>,
}

impl FloorLayout {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_shape(&mut self, shape: impl Into<PlanShape>) -> &mut Self {
        self.plan.push(shape.into());
        self
    }

    pub fn add_network_point(&mut self, point: NetworkPoint) -> &mut Self {
        self.network_points.push(point);
        self
    }

    pub fn add_cable(&mut self, cable: CableSegment) -> &mut Self {
        self.cables.push(cable);
        self
    }

    pub fn add_volume(&mut self, volume: Volume3D) -> &mut Self {
        self.volumes.push(volume);
        self
    }

    pub fn access_points(&self) -> impl Iterator<Item = &NetworkPoint> + '_ {
        self.network_points
            .iter()
            .filter(|point| point.kind == NetworkKind::AccessPoint)
    }

    pub fn wired_jacks(&self) -> impl Iterator<Item = &NetworkPoint> + '_ {
        self.network_points
            .iter()
            .filter(|point| point.kind == NetworkKind::WiredJack)
    }

    /// 平面图图元与外框的合并范围；布局为空时返回 `None`。
    pub fn bounds(&self) -> Option<Bounds2D> {
        let mut bounds = Bounds2D::empty();
        for shape in &self.plan {
            bounds.include_bounds(&shape.bounds());
        }
        if let Some(outline) = &self.outline {
            bounds.include_bounds(outline);
        }
        for point in &self.network_points {
            bounds.include_point(point.position);
        }
        if bounds.is_empty() { None } else { Some(bounds) }
    }

    /// 检查所有正尺寸约束，返回第一处违例。
    pub fn validate(&self) -> Result<(), LayoutError> {
        for shape in &self.plan {
            shape.validate()?;
        }
        if let Some(slab) = &self.floor_slab {
            slab.validate()?;
        }
        for volume in &self.volumes {
            volume.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_fill_prefers_override() {
        let room = Room::new(Point2::new(0.0, 0.0), 10.0, 10.0, "Desk1")
            .with_category(RoomCategory::Desk);
        assert_eq!(room.fill(), Rgb::from_u32(0xfef3c7));

        let custom = room.clone().with_fill(Rgb::from_u32(0x123456));
        assert_eq!(custom.fill(), Rgb::from_u32(0x123456));
        assert_eq!(room.center(), Point2::new(5.0, 5.0));
    }

    #[test]
    fn volume_corners_follow_face_convention() {
        let volume = Volume3D::new(
            Point3::new(1.0, 2.0, 0.5),
            10.0,
            20.0,
            8.0,
            Rgb::from_u32(0xfde047),
        );
        let corners = volume.corners();
        assert_eq!(corners[1], Point3::new(11.0, 2.0, 0.5));
        assert_eq!(corners[6], Point3::new(11.0, 22.0, 8.5));
        for i in 0..4 {
            assert!((corners[i + 4].z() - corners[i].z() - 8.0).abs() < 1e-12);
        }
        assert_eq!(volume.label_anchor(), Point3::new(6.0, 12.0, 10.5));
    }

    #[test]
    fn elevation_defaults_by_kind() {
        let ap = NetworkPoint::access_point(Point2::new(1.0, 2.0), "AP-1", "10.0.0.1");
        let jack = NetworkPoint::wired_jack(Point2::new(1.0, 2.0), "RJ-1", "10.0.0.2");
        assert_eq!(ap.elevation(), 5.0);
        assert_eq!(jack.position_3d().z(), 1.0);

        let raised = NetworkPoint {
            elevation: Some(9.0),
            ..ap
        };
        assert_eq!(raised.elevation(), 9.0);
    }

    #[test]
    fn validate_reports_first_violation() {
        let mut layout = FloorLayout::new("test");
        layout
            .add_shape(Room::new(Point2::new(0.0, 0.0), 5.0, 5.0, "OK"))
            .add_shape(GridArea::new(Point2::new(0.0, 0.0), 5.0, 5.0, 0, 2));
        let err = layout.validate().unwrap_err();
        assert!(matches!(
            err,
            LayoutError::EmptyDivision { field: "rows", .. }
        ));

        let mut layout = FloorLayout::new("test");
        layout.add_shape(Room::new(Point2::new(0.0, 0.0), -1.0, 5.0, "BAD"));
        let err = layout.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "room 'BAD': width must be positive, got -1"
        );

        let mut layout = FloorLayout::new("test");
        layout.add_volume(Volume3D::new(
            Point3::new(0.0, 0.0, 0.0),
            1.0,
            f64::NAN,
            1.0,
            Rgb::WHITE,
        ));
        assert!(layout.validate().is_err());
    }

    #[test]
    fn bounds_cover_shapes_outline_and_markers() {
        let mut layout = FloorLayout::new("test");
        assert!(layout.bounds().is_none());

        layout
            .add_shape(Room::new(Point2::new(10.0, 10.0), 5.0, 5.0, "A"))
            .add_network_point(NetworkPoint::access_point(
                Point2::new(40.0, 2.0),
                "AP",
                "",
            ));
        let bounds = layout.bounds().expect("bounds");
        assert_eq!(bounds.min(), Point2::new(10.0, 2.0));
        assert_eq!(bounds.max(), Point2::new(40.0, 15.0));

        layout.outline = Some(Bounds2D::from_origin_size(
            Point2::new(0.0, 0.0),
            110.0,
            135.0,
        ));
        let bounds = layout.bounds().expect("bounds");
        assert_eq!(bounds.max(), Point2::new(110.0, 135.0));
    }
}
