//! 图元绘制例程：把语义图元（房间、隔断、楼梯、网络点位、线缆、体块）转换为绘图调用。
//!
//! 所有例程都是无状态的，颜色、线宽与字体随调用显式传入；需要局部变换的图元
//! 通过 [`PaintScope`] 保证变换栈在任何退出路径上都能恢复。

use glam::DVec3;
use plano_core::color::{self, Rgb};
use plano_core::geometry::{Point3, ScreenPoint, ScreenRect};
use plano_core::layout::{
    CableCategory, CableSegment, Caption, GridArea, NetworkPoint, Room, Stairs, Volume3D,
};
use plano_core::projection::{IsoProjector, PlanTransform, ViewState, facing_component};
use plano_core::surface::{
    DrawingSurface, PaintScope, StrokeStyle, TextAlign, TextBaseline, TextStyle,
};

pub mod palette {
    use plano_core::color::Rgb;

    pub const INK: Rgb = Rgb::from_u32(0x1e293b);
    pub const BACKGROUND: Rgb = Rgb::WHITE;
    pub const GRID_FILL: Rgb = Rgb::from_u32(0xfefce8);
    pub const GRID_LINE: Rgb = Rgb::from_u32(0x94a3b8);
    pub const STAIRS_FILL: Rgb = Rgb::from_u32(0xe2e8f0);
    pub const STAIRS_TREAD: Rgb = Rgb::from_u32(0x64748b);
    pub const OUTLINE: Rgb = Rgb::from_u32(0x94a3b8);
    pub const AP_FILL: Rgb = Rgb::from_u32(0xdc2626);
    pub const AP_STROKE: Rgb = Rgb::from_u32(0x991b1b);
    pub const JACK_FILL: Rgb = Rgb::from_u32(0x2563eb);
    pub const JACK_STROKE: Rgb = Rgb::from_u32(0x1e60a6);
    pub const CAT6A: Rgb = Rgb::from_u32(0xea580c);
    pub const CAT6: Rgb = Rgb::from_u32(0x3b82f6);
}

const ROOM_STROKE_WIDTH: f64 = 2.0;
const BOX_STROKE_WIDTH: f64 = 1.5;
const AP_RADIUS: f64 = 8.0;
const JACK_SIZE: f64 = 6.0;

/// 网络点位的说明文字样式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerCaption {
    /// 名称 + 地址两行（平面图）。
    #[default]
    Full,
    /// 仅名称（3D 视图）。
    NameOnly,
}

/// 体块的面绘制策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaceMode {
    /// 固定绘制底面、顶面与东侧面，不随视角变化。
    #[default]
    Fixed,
    /// 只绘制外法向朝向观察者的面，侧面先于顶面。
    ViewDependent,
}

pub fn cable_stroke(category: CableCategory) -> StrokeStyle {
    match category {
        CableCategory::Cat6a => StrokeStyle::solid(palette::CAT6A, 2.0),
        CableCategory::Cat6 => StrokeStyle::dashed(palette::CAT6, 1.5, [3.0, 3.0]),
    }
}

fn room_outline() -> StrokeStyle {
    StrokeStyle::solid(palette::INK, ROOM_STROKE_WIDTH)
}

/// 房间：填充 + 描边 + 居中标签；有副标签时两行上下各偏 6 像素。
pub fn draw_room(surface: &mut dyn DrawingSurface, transform: &PlanTransform, room: &Room) {
    let rect = transform.rect(room.origin, room.width, room.height);
    if room.rotation_deg == 0.0 {
        paint_room_body(surface, rect, room);
        return;
    }

    // 在以房间中心为原点的局部坐标系中绘制
    let center = rect.center();
    let mut scope = PaintScope::new(surface);
    scope.translate(center.x(), center.y());
    scope.rotate(room.rotation_deg.to_radians());
    let local = ScreenRect::new(
        ScreenPoint::new(-rect.width / 2.0, -rect.height / 2.0),
        rect.width,
        rect.height,
    );
    paint_room_body(&mut *scope, local, room);
}

fn paint_room_body(surface: &mut dyn DrawingSurface, rect: ScreenRect, room: &Room) {
    surface.fill_rect(rect, room.fill());
    surface.stroke_rect(rect, &room_outline());

    let center = rect.center();
    match &room.sublabel {
        Some(sublabel) => {
            surface.text(
                &room.label,
                center.offset(0.0, -6.0),
                &TextStyle::new(palette::INK, 12.0).bold(),
            );
            surface.text(
                sublabel,
                center.offset(0.0, 6.0),
                &TextStyle::new(palette::INK, 9.0),
            );
        }
        None => surface.text(&room.label, center, &TextStyle::new(palette::INK, 11.0)),
    }
}

/// 隔断：`rows - 1` 条水平线与 `cols - 1` 条竖线。
pub fn draw_grid(surface: &mut dyn DrawingSurface, transform: &PlanTransform, grid: &GridArea) {
    let rect = transform.rect(grid.origin, grid.width, grid.height);
    surface.fill_rect(rect, palette::GRID_FILL);
    surface.stroke_rect(rect, &room_outline());

    let divider = StrokeStyle::solid(palette::GRID_LINE, 1.0);
    let (x, y) = (rect.origin.x(), rect.origin.y());
    let rows = f64::from(grid.rows);
    let cols = f64::from(grid.cols);

    for i in 1..grid.rows {
        let row_y = y + f64::from(i) * rect.height / rows;
        surface.line(
            ScreenPoint::new(x, row_y),
            ScreenPoint::new(x + rect.width, row_y),
            &divider,
        );
    }
    for j in 1..grid.cols {
        let col_x = x + f64::from(j) * rect.width / cols;
        surface.line(
            ScreenPoint::new(col_x, y),
            ScreenPoint::new(col_x, y + rect.height),
            &divider,
        );
    }

    if let Some(caption) = &grid.caption {
        surface.text(caption, rect.center(), &TextStyle::new(palette::INK, 10.0));
    }
}

pub fn draw_stairs(surface: &mut dyn DrawingSurface, transform: &PlanTransform, stairs: &Stairs) {
    let rect = transform.rect(stairs.origin, stairs.width, stairs.height);
    surface.fill_rect(rect, palette::STAIRS_FILL);
    surface.stroke_rect(rect, &room_outline());

    let tread = StrokeStyle::solid(palette::STAIRS_TREAD, 1.0);
    let bands = f64::from(Stairs::TREAD_BANDS);
    for i in 1..Stairs::TREAD_BANDS {
        let step = rect.origin.y() + f64::from(i) * rect.height / bands;
        surface.line(
            ScreenPoint::new(rect.origin.x(), step),
            ScreenPoint::new(rect.origin.x() + rect.width, step),
            &tread,
        );
    }

    surface.text(
        &stairs.caption,
        rect.center(),
        &TextStyle::new(palette::INK, 10.0).with_baseline(TextBaseline::Alphabetic),
    );
}

/// 独立文字，绕锚点旋转。
pub fn draw_caption(surface: &mut dyn DrawingSurface, transform: &PlanTransform, caption: &Caption) {
    let anchor = transform.to_screen(caption.anchor);
    let mut scope = PaintScope::new(surface);
    scope.translate(anchor.x(), anchor.y());
    if caption.rotation_deg != 0.0 {
        scope.rotate(caption.rotation_deg.to_radians());
    }
    scope.text(
        &caption.text,
        ScreenPoint::new(0.0, 0.0),
        &TextStyle::new(palette::INK, caption.font_size),
    );
}

pub fn draw_access_point(
    surface: &mut dyn DrawingSurface,
    at: ScreenPoint,
    point: &NetworkPoint,
    caption: MarkerCaption,
) {
    surface.fill_circle(at, AP_RADIUS, palette::AP_FILL);
    surface.stroke_circle(at, AP_RADIUS, &StrokeStyle::solid(palette::AP_STROKE, 2.0));

    match caption {
        MarkerCaption::Full => {
            surface.text(
                "AP",
                at.offset(0.0, -1.0),
                &TextStyle::new(Rgb::WHITE, 7.0).bold(),
            );
            surface.text(
                &point.label,
                at.offset(0.0, 10.0),
                &TextStyle::new(palette::INK, 7.0),
            );
            surface.text(
                &point.address,
                at.offset(0.0, 18.0),
                &TextStyle::new(palette::AP_FILL, 6.0),
            );
        }
        MarkerCaption::NameOnly => {
            surface.text("AP", at, &TextStyle::new(Rgb::WHITE, 8.0).bold());
            surface.text(
                &point.label,
                at.offset(0.0, 12.0),
                &TextStyle::new(palette::INK, 7.0),
            );
        }
    }
}

pub fn draw_wired_jack(
    surface: &mut dyn DrawingSurface,
    at: ScreenPoint,
    point: &NetworkPoint,
    caption: MarkerCaption,
) {
    let half = JACK_SIZE / 2.0;
    let rect = ScreenRect::new(at.offset(-half, -half), JACK_SIZE, JACK_SIZE);
    surface.fill_rect(rect, palette::JACK_FILL);
    surface.stroke_rect(rect, &StrokeStyle::solid(palette::JACK_STROKE, 1.5));

    match caption {
        MarkerCaption::Full => {
            let top = TextStyle::new(palette::INK, 6.0).with_baseline(TextBaseline::Top);
            surface.text(&point.label, at.offset(0.0, 8.0), &top);
            surface.text(
                &point.address,
                at.offset(0.0, 14.0),
                &TextStyle {
                    color: palette::JACK_FILL,
                    ..top
                },
            );
        }
        MarkerCaption::NameOnly => surface.text(
            &point.label,
            at.offset(0.0, 10.0),
            &TextStyle::new(palette::INK, 6.0),
        ),
    }
}

pub fn draw_cable(surface: &mut dyn DrawingSurface, transform: &PlanTransform, cable: &CableSegment) {
    surface.line(
        transform.to_screen(cable.from),
        transform.to_screen(cable.to),
        &cable_stroke(cable.category),
    );
}

/// 楼层虚线外框。
pub fn draw_outline(surface: &mut dyn DrawingSurface, rect: ScreenRect) {
    surface.stroke_rect(rect, &StrokeStyle::dashed(palette::OUTLINE, 1.0, [5.0, 5.0]));
}

/// 图例块，`origin` 为标题左上角。
pub fn draw_legend(surface: &mut dyn DrawingSurface, origin: ScreenPoint) {
    let heading = TextStyle::new(palette::INK, 11.0)
        .bold()
        .aligned(TextAlign::Left)
        .with_baseline(TextBaseline::Top);
    let entry = TextStyle::new(palette::INK, 9.0)
        .aligned(TextAlign::Left)
        .with_baseline(TextBaseline::Top);
    let at = |dx: f64, dy: f64| origin.offset(dx, dy);

    surface.text("LEYENDA RED:", at(0.0, 10.0), &heading);

    surface.fill_circle(at(10.0, 30.0), 5.0, palette::AP_FILL);
    surface.text("AP Unifi 7 Pro", at(25.0, 33.0), &entry);

    surface.fill_rect(ScreenRect::new(at(7.0, 48.0), 6.0, 6.0), palette::JACK_FILL);
    surface.text("RJ45 - Cat 6", at(25.0, 51.0), &entry);

    surface.line(at(5.0, 68.0), at(25.0, 68.0), &cable_stroke(CableCategory::Cat6a));
    surface.text("Cable Cat 6A", at(35.0, 65.0), &entry);

    surface.line(at(5.0, 88.0), at(25.0, 88.0), &cable_stroke(CableCategory::Cat6));
    surface.text("Cable Cat 6", at(35.0, 85.0), &entry);
}

/// 长方体的一个面：角点索引（见 [`Volume3D::corners`]）、外法向与着色百分比。
struct BoxFace {
    corners: [usize; 4],
    normal: DVec3,
    shade: f64,
}

const BOTTOM: BoxFace = BoxFace {
    corners: [0, 1, 2, 3],
    normal: DVec3::NEG_Z,
    shade: 0.0,
};
const TOP: BoxFace = BoxFace {
    corners: [4, 5, 6, 7],
    normal: DVec3::Z,
    shade: color::TOP_FACE_PERCENT,
};
const EAST: BoxFace = BoxFace {
    corners: [1, 5, 6, 2],
    normal: DVec3::X,
    shade: color::SIDE_FACE_PERCENT,
};
const SIDES: [BoxFace; 4] = [
    BoxFace {
        corners: [0, 1, 5, 4],
        normal: DVec3::NEG_Y,
        shade: color::SIDE_FACE_PERCENT,
    },
    EAST,
    BoxFace {
        corners: [3, 2, 6, 7],
        normal: DVec3::Y,
        shade: color::SIDE_FACE_PERCENT,
    },
    BoxFace {
        corners: [0, 3, 7, 4],
        normal: DVec3::NEG_X,
        shade: color::SIDE_FACE_PERCENT,
    },
];

/// 体块：按 `face_mode` 逐面填充并描边，最后绘制顶面上方的标签。
pub fn draw_box(
    surface: &mut dyn DrawingSurface,
    projector: &IsoProjector,
    view: &ViewState,
    volume: &Volume3D,
    face_mode: FaceMode,
) {
    let projected = volume
        .corners()
        .map(|corner| projector.project(corner, view));
    let outline = StrokeStyle::solid(palette::INK, BOX_STROKE_WIDTH);
    let mut paint = |face: &BoxFace| {
        let points = face.corners.map(|index| projected[index]);
        surface.fill_polygon(&points, color::shade(volume.color, face.shade));
        surface.stroke_polygon(&points, &outline);
    };

    match face_mode {
        FaceMode::Fixed => {
            for face in [&BOTTOM, &TOP, &EAST] {
                paint(face);
            }
        }
        FaceMode::ViewDependent => {
            let visible = |face: &BoxFace| facing_component(face.normal, view) > 0.0;
            for face in std::iter::once(&BOTTOM).chain(&SIDES).chain(std::iter::once(&TOP)) {
                if visible(face) {
                    paint(face);
                }
            }
        }
    }

    if let Some(label) = &volume.label {
        surface.text(
            label,
            projector.project(volume.label_anchor(), view),
            &TextStyle::new(palette::INK, 9.0).bold(),
        );
    }
}

/// 3D 视图中网络点位的投影位置。
#[inline]
pub fn project_marker(projector: &IsoProjector, view: &ViewState, point: &NetworkPoint) -> ScreenPoint {
    let position: Point3 = point.position_3d();
    projector.project(position, view)
}
