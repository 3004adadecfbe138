//! 内置的办公楼层布局（一层办公区 + 网络点位）。

use crate::color::Rgb;
use crate::geometry::{Bounds2D, Point2, Point3};
use crate::layout::{
    CableCategory, CableSegment, Caption, FloorLayout, GridArea, NetworkPoint, Room,
    RoomCategory, Stairs, Volume3D,
};

const WORKSTATIONS: [(f64, f64, &str); 16] = [
    (10.0, 55.0, "Mercedez"),
    (20.0, 55.0, "Arnold"),
    (30.0, 55.0, "Jose"),
    (40.0, 55.0, "Angel"),
    (10.0, 45.0, "Silvia"),
    (20.0, 45.0, "Roldan"),
    (30.0, 45.0, "Mario"),
    (40.0, 45.0, "Lilian"),
    (10.0, 25.0, "1"),
    (20.0, 25.0, "2"),
    (30.0, 25.0, "3"),
    (40.0, 25.0, "Victoria"),
    (10.0, 15.0, "Desk1"),
    (20.0, 15.0, "Desk2"),
    (30.0, 15.0, "Juan"),
    (40.0, 15.0, "Gerardo"),
];

const ACCESS_POINTS: [(f64, f64, &str, &str); 5] = [
    (82.0, 30.0, "AP-5", "192.168.1.25"),
    (25.0, 85.0, "AP-1", "192.168.1.21"),
    (45.0, 85.0, "AP-2", "192.168.1.22"),
    (18.0, 45.0, "AP-3", "192.168.1.23"),
    (16.0, 100.0, "AP-4", "192.168.1.24"),
];

const WIRED_JACKS: [(f64, f64, &str, &str); 6] = [
    (10.0, 25.0, "RJ-1", "192.168.1.31"),
    (14.0, 25.0, "RJ-2", "192.168.1.32"),
    (20.0, 25.0, "RJ-3", "192.168.1.33"),
    (24.0, 25.0, "RJ-4", "192.168.1.34"),
    (30.0, 25.0, "RJ-5", "192.168.1.35"),
    (34.0, 25.0, "RJ-6", "192.168.1.36"),
];

/// AP 上联（Cat 6A）走线：`(x0, y0, x1, y1)`。
const UPLINKS: [(f64, f64, f64, f64); 5] = [
    (82.0, 30.0, 82.0, 15.0),
    (25.0, 85.0, 25.0, 100.0),
    (45.0, 85.0, 45.0, 100.0),
    (18.0, 45.0, 18.0, 55.0),
    (16.0, 100.0, 16.0, 112.0),
];

const DESK_COLOR: u32 = 0xfef3c7;
const CABINET_COLOR: u32 = 0xfed7aa;

/// 构造内置办公布局。3D 体块以楼板中心附近为原点，与平面图坐标互不相关。
pub fn office_layout() -> FloorLayout {
    let mut layout = FloorLayout::new("PLIHSA - planta de oficinas");
    add_plan(&mut layout);
    add_network(&mut layout);
    add_volumes(&mut layout);
    layout
}

fn add_plan(layout: &mut FloorLayout) {
    layout
        .add_shape(Stairs::new(Point2::new(5.0, 112.0), 15.0, 15.0))
        .add_shape(
            Room::new(Point2::new(5.0, 130.0), 20.0, 15.0, "PRINTER")
                .with_category(RoomCategory::Utility),
        )
        .add_shape(GridArea::new(Point2::new(35.0, 125.0), 15.0, 20.0, 2, 3))
        .add_shape(
            Room::new(Point2::new(60.0, 125.0), 40.0, 20.0, "ZONA AC")
                .with_category(RoomCategory::Utility),
        )
        .add_shape(GridArea::new(Point2::new(60.0, 125.0), 40.0, 20.0, 2, 5))
        .add_shape(GridArea::new(Point2::new(10.0, 85.0), 12.0, 18.0, 3, 1))
        .add_shape(Caption::new(Point2::new(25.0, 94.0), "PRINTERS").with_rotation(-90.0))
        .add_shape(
            Room::new(Point2::new(35.0, 80.0), 20.0, 25.0, "RECEPCION LOBBY")
                .with_sublabel("PLIHSA")
                .with_category(RoomCategory::Lobby),
        );

    for i in 0..3 {
        let x = 65.0 + f64::from(i) * 12.0;
        layout.add_shape(GridArea::new(Point2::new(x, 80.0), 10.0, 15.0, 2, 2));
    }

    for (x, y, label) in WORKSTATIONS {
        layout.add_shape(
            Room::new(Point2::new(x, y), 10.0, 10.0, label).with_category(RoomCategory::Desk),
        );
    }

    layout
        .add_shape(
            Room::new(Point2::new(50.0, 45.0), 8.0, 20.0, "EVELYN")
                .with_category(RoomCategory::Desk),
        )
        .add_shape(
            Room::new(Point2::new(50.0, 15.0), 8.0, 20.0, "MONTALVO")
                .with_category(RoomCategory::Desk),
        )
        .add_shape(Room::new(Point2::new(65.0, 15.0), 35.0, 50.0, "SALA").with_sublabel("TELA"));

    layout.outline = Some(Bounds2D::from_origin_size(
        Point2::new(0.0, 0.0),
        110.0,
        135.0,
    ));
}

fn add_network(layout: &mut FloorLayout) {
    for (x, y, label, address) in ACCESS_POINTS {
        layout.add_network_point(NetworkPoint::access_point(Point2::new(x, y), label, address));
    }
    for (x, y, label, address) in WIRED_JACKS {
        layout.add_network_point(NetworkPoint::wired_jack(Point2::new(x, y), label, address));
    }

    for (x0, y0, x1, y1) in UPLINKS {
        layout.add_cable(CableSegment::new(
            Point2::new(x0, y0),
            Point2::new(x1, y1),
            CableCategory::Cat6a,
        ));
    }
    // 每个网口向上引 10 个单位的 Cat 6 水平线
    for (x, y, _, _) in WIRED_JACKS {
        layout.add_cable(CableSegment::new(
            Point2::new(x, y),
            Point2::new(x, y + 10.0),
            CableCategory::Cat6,
        ));
    }
}

fn block(x: f64, y: f64, width: f64, depth: f64, height: f64, color: u32) -> Volume3D {
    Volume3D::new(
        Point3::new(x, y, 0.5),
        width,
        depth,
        height,
        Rgb::from_u32(color),
    )
}

fn add_desk_rows(layout: &mut FloorLayout, rows: [f64; 2]) {
    for y in rows {
        for x in [-40.0, -30.0, -20.0, -10.0] {
            layout.add_volume(block(x, y, 10.0, 10.0, 5.0, DESK_COLOR));
        }
    }
}

fn add_volumes(layout: &mut FloorLayout) {
    layout.floor_slab = Some(Volume3D::new(
        Point3::new(-55.0, -60.0, 0.0),
        110.0,
        135.0,
        0.5,
        Rgb::from_u32(0xe2e8f0),
    ));

    layout
        .add_volume(block(-45.0, 52.0, 20.0, 15.0, 8.0, 0x86efac))
        .add_volume(block(-45.0, 32.0, 15.0, 15.0, 8.0, 0xcbd5e1))
        .add_volume(block(-10.0, 45.0, 15.0, 20.0, 8.0, 0xfde047))
        .add_volume(block(5.0, 45.0, 40.0, 20.0, 8.0, 0xa5f3fc))
        .add_volume(block(-40.0, 5.0, 12.0, 18.0, 6.0, 0x86efac))
        .add_volume(block(-20.0, 0.0, 20.0, 25.0, 10.0, 0xf1f5f9).with_label("LOBBY"));

    for i in 0..3 {
        let x = 10.0 + f64::from(i) * 12.0;
        layout.add_volume(block(x, 0.0, 10.0, 15.0, 8.0, 0xfde047));
    }

    add_desk_rows(layout, [-25.0, -35.0]);
    layout.add_volume(block(0.0, -35.0, 8.0, 20.0, 5.0, CABINET_COLOR));

    add_desk_rows(layout, [-55.0, -65.0]);
    layout
        .add_volume(block(0.0, -65.0, 8.0, 20.0, 5.0, CABINET_COLOR))
        .add_volume(block(10.0, -65.0, 35.0, 50.0, 12.0, 0xbfdbfe).with_label("SALA TELA"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PlanShape;

    #[test]
    fn office_layout_is_valid() {
        let layout = office_layout();
        layout.validate().expect("内置布局应通过校验");

        assert_eq!(layout.access_points().count(), 5);
        assert_eq!(layout.wired_jacks().count(), 6);
        assert_eq!(layout.cables.len(), 11);
        assert_eq!(
            layout
                .cables
                .iter()
                .filter(|cable| cable.category == CableCategory::Cat6a)
                .count(),
            5
        );
    }

    #[test]
    fn plan_keeps_declaration_order() {
        let layout = office_layout();
        assert!(matches!(layout.plan.first(), Some(PlanShape::Stairs(_))));
        assert!(matches!(
            layout.plan.last(),
            Some(PlanShape::Room(room)) if room.label == "SALA" && room.sublabel.as_deref() == Some("TELA")
        ));

        let desks = layout
            .plan
            .iter()
            .filter(|shape| matches!(shape, PlanShape::Room(room) if room.category == RoomCategory::Desk))
            .count();
        assert_eq!(desks, 18);
    }

    #[test]
    fn bounds_include_rooms_below_outline() {
        let layout = office_layout();
        let bounds = layout.bounds().expect("bounds");
        assert_eq!(bounds.min(), Point2::new(0.0, 0.0));
        // PRINTER 与 ZONA AC 超出虚线外框底边
        assert_eq!(bounds.max(), Point2::new(110.0, 145.0));
    }

    #[test]
    fn volumes_carry_labels_and_slab() {
        let layout = office_layout();
        assert_eq!(layout.volumes.len(), 28);
        let labels: Vec<_> = layout
            .volumes
            .iter()
            .filter_map(|volume| volume.label.as_deref())
            .collect();
        assert_eq!(labels, ["LOBBY", "SALA TELA"]);

        let slab = layout.floor_slab.as_ref().expect("slab");
        assert_eq!(slab.origin, Point3::new(-55.0, -60.0, 0.0));
        assert!((slab.height - 0.5).abs() < f64::EPSILON);
    }
}
