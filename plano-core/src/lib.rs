pub mod layout;
pub mod office;
pub mod projection;
pub mod surface;

pub mod geometry {
    use glam::{DVec2, DVec3};
    use serde::{Deserialize, Serialize};

    /// 二维模型坐标（平面图单位），内部以 `glam::DVec2` 表示。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point2(pub DVec2);

    impl Point2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn from_vec(vec: DVec2) -> Self {
            Self(vec)
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn translate(self, offset: Vector2) -> Self {
            Self(self.0 + offset.0)
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Point2 {
        fn from(value: DVec2) -> Self {
            Self::from_vec(value)
        }
    }

    /// 二维向量，主要用于求矩形中心等偏移计算。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Vector2(pub DVec2);

    impl Vector2 {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    impl From<DVec2> for Vector2 {
        fn from(value: DVec2) -> Self {
            Self(value)
        }
    }

    /// 三维模型坐标，z 为高度轴。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Point3(pub DVec3);

    impl Point3 {
        #[inline]
        pub fn new(x: f64, y: f64, z: f64) -> Self {
            Self(DVec3::new(x, y, z))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn z(self) -> f64 {
            self.0.z
        }

        #[inline]
        pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Self {
            Self(self.0 + DVec3::new(dx, dy, dz))
        }

        #[inline]
        pub fn as_vec3(self) -> DVec3 {
            self.0
        }
    }

    impl From<DVec3> for Point3 {
        fn from(value: DVec3) -> Self {
            Self(value)
        }
    }

    /// 画布像素坐标，y 轴向下。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct ScreenPoint(pub DVec2);

    impl ScreenPoint {
        #[inline]
        pub fn new(x: f64, y: f64) -> Self {
            Self(DVec2::new(x, y))
        }

        #[inline]
        pub fn x(self) -> f64 {
            self.0.x
        }

        #[inline]
        pub fn y(self) -> f64 {
            self.0.y
        }

        #[inline]
        pub fn offset(self, dx: f64, dy: f64) -> Self {
            Self(self.0 + DVec2::new(dx, dy))
        }

        #[inline]
        pub fn as_vec2(self) -> DVec2 {
            self.0
        }
    }

    /// 像素空间中的轴对齐矩形。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct ScreenRect {
        pub origin: ScreenPoint,
        pub width: f64,
        pub height: f64,
    }

    impl ScreenRect {
        #[inline]
        pub fn new(origin: ScreenPoint, width: f64, height: f64) -> Self {
            Self {
                origin,
                width,
                height,
            }
        }

        #[inline]
        pub fn center(&self) -> ScreenPoint {
            self.origin.offset(self.width / 2.0, self.height / 2.0)
        }
    }

    /// 轴对齐边界框，用于估算平面图范围及绘制外框。
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Bounds2D {
        min: Point2,
        max: Point2,
    }

    impl Bounds2D {
        #[inline]
        pub fn new(min: Point2, max: Point2) -> Self {
            Self { min, max }
        }

        /// 以左上角与宽高构造。
        #[inline]
        pub fn from_origin_size(origin: Point2, width: f64, height: f64) -> Self {
            Self::new(origin, Point2::new(origin.x() + width, origin.y() + height))
        }

        #[inline]
        pub fn empty() -> Self {
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            }
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.min.x() > self.max.x() || self.min.y() > self.max.y()
        }

        #[inline]
        pub fn min(&self) -> Point2 {
            self.min
        }

        #[inline]
        pub fn max(&self) -> Point2 {
            self.max
        }

        #[inline]
        pub fn width(&self) -> f64 {
            self.max.x() - self.min.x()
        }

        #[inline]
        pub fn height(&self) -> f64 {
            self.max.y() - self.min.y()
        }

        pub fn include_point(&mut self, point: Point2) {
            if self.is_empty() {
                self.min = point;
                self.max = point;
                return;
            }
            let min_vec = self.min.as_vec2().min(point.as_vec2());
            let max_vec = self.max.as_vec2().max(point.as_vec2());
            self.min = Point2::from_vec(min_vec);
            self.max = Point2::from_vec(max_vec);
        }

        pub fn include_bounds(&mut self, other: &Bounds2D) {
            if other.is_empty() {
                return;
            }
            self.include_point(other.min);
            self.include_point(other.max);
        }

        #[inline]
        pub fn center(&self) -> Point2 {
            debug_assert!(!self.is_empty());
            let center = (self.min.as_vec2() + self.max.as_vec2()) * 0.5;
            Point2::from_vec(center)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn bounds_grow_to_cover_points_and_boxes() {
            let mut bounds = Bounds2D::empty();
            assert!(bounds.is_empty());

            bounds.include_point(Point2::new(10.0, 20.0));
            assert!(!bounds.is_empty());
            assert_eq!(bounds.width(), 0.0);

            bounds.include_bounds(&Bounds2D::from_origin_size(Point2::new(0.0, 0.0), 5.0, 40.0));
            assert_eq!(bounds.min(), Point2::new(0.0, 0.0));
            assert_eq!(bounds.max(), Point2::new(10.0, 40.0));
            assert_eq!(bounds.center(), Point2::new(5.0, 20.0));

            // 空框不影响结果
            bounds.include_bounds(&Bounds2D::empty());
            assert_eq!(bounds.max(), Point2::new(10.0, 40.0));
        }

        #[test]
        fn screen_rect_center_is_midpoint() {
            let rect = ScreenRect::new(ScreenPoint::new(230.0, 500.0), 120.0, 150.0);
            assert_eq!(rect.center(), ScreenPoint::new(290.0, 575.0));
        }
    }
}

pub mod color {
    use std::fmt;

    use serde::{Deserialize, Serialize};

    /// 24 位 RGB 颜色，序列化为 `#rrggbb` 字符串。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(from = "String", into = "String")]
    pub struct Rgb {
        pub r: u8,
        pub g: u8,
        pub b: u8,
    }

    impl Rgb {
        pub const BLACK: Rgb = Rgb::new(0, 0, 0);
        pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

        #[inline]
        pub const fn new(r: u8, g: u8, b: u8) -> Self {
            Self { r, g, b }
        }

        /// 由 `0xRRGGBB` 数值构造，高于 24 位的部分被忽略。
        #[inline]
        pub const fn from_u32(value: u32) -> Self {
            Self {
                r: ((value >> 16) & 0xff) as u8,
                g: ((value >> 8) & 0xff) as u8,
                b: (value & 0xff) as u8,
            }
        }

        #[inline]
        pub const fn to_u32(self) -> u32 {
            ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
        }

        /// 宽松解析十六进制颜色：去掉可选的 `#` 后读取最长的十六进制前缀。
        ///
        /// 不做校验，畸形输入得到无意义但确定的颜色（没有任何十六进制位时为黑色）。
        pub fn from_hex_lossy(raw: &str) -> Self {
            let digits = raw.trim();
            let digits = digits.strip_prefix('#').unwrap_or(digits);
            let value = digits
                .chars()
                .map_while(|ch| ch.to_digit(16))
                .fold(0u32, |acc, digit| acc.wrapping_mul(16).wrapping_add(digit));
            Self::from_u32(value)
        }
    }

    impl fmt::Display for Rgb {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }

    impl From<String> for Rgb {
        fn from(value: String) -> Self {
            Self::from_hex_lossy(&value)
        }
    }

    impl From<Rgb> for String {
        fn from(value: Rgb) -> Self {
            value.to_string()
        }
    }

    /// 顶面提亮百分比。
    pub const TOP_FACE_PERCENT: f64 = 20.0;
    /// 侧面压暗百分比。
    pub const SIDE_FACE_PERCENT: f64 = -15.0;

    /// 按百分比对三个通道做等量加减并截断到 [0, 255]。
    ///
    /// 偏移量为 `round(2.55 * percent)`，舍入规则与浏览器 `Math.round` 一致（.5 向正无穷）。
    pub fn shade(color: Rgb, percent: f64) -> Rgb {
        let amount = round_half_up(2.55 * percent) as i32;
        let channel = |value: u8| (i32::from(value) + amount).clamp(0, 255) as u8;
        Rgb::new(channel(color.r), channel(color.g), channel(color.b))
    }

    /// 字符串版本的 [`shade`]，输入不做校验。
    pub fn shade_hex(color: &str, percent: f64) -> String {
        shade(Rgb::from_hex_lossy(color), percent).to_string()
    }

    #[inline]
    fn round_half_up(value: f64) -> f64 {
        (value + 0.5).floor()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn zero_percent_is_identity() {
            for hex in ["#e2e8f0", "#86efac", "#000000", "#ffffff", "#1e293b"] {
                assert_eq!(shade_hex(hex, 0.0), hex);
            }
        }

        #[test]
        fn channels_clamp_at_extremes() {
            let mid = Rgb::from_u32(0x808080);
            assert_eq!(shade(mid, 100.0), Rgb::WHITE);
            assert_eq!(shade(mid, -100.0), Rgb::BLACK);

            let mixed = Rgb::from_u32(0x10f080);
            for percent in [-100.0, -50.0, -15.0, 0.0, 20.0, 75.0, 100.0] {
                let shaded = shade(mixed, percent);
                // u8 already bounds the channels; check monotonicity instead
                if percent > 0.0 {
                    assert!(shaded.r >= mixed.r && shaded.g >= mixed.g && shaded.b >= mixed.b);
                } else {
                    assert!(shaded.r <= mixed.r && shaded.g <= mixed.g && shaded.b <= mixed.b);
                }
            }
        }

        #[test]
        fn face_tints_match_reference_palette() {
            assert_eq!(shade_hex("#e2e8f0", TOP_FACE_PERCENT), "#ffffff");
            assert_eq!(shade_hex("#86efac", SIDE_FACE_PERCENT), "#60c986");
            assert_eq!(shade_hex("#bfdbfe", SIDE_FACE_PERCENT), "#99b5d8");
        }

        #[test]
        fn half_amounts_round_towards_positive_infinity() {
            assert_eq!(round_half_up(-25.5), -25.0);
            assert_eq!(round_half_up(25.5), 26.0);
            assert_eq!(round_half_up(-38.25), -38.0);
        }

        #[test]
        fn malformed_input_does_not_fail() {
            assert_eq!(Rgb::from_hex_lossy("zzz"), Rgb::BLACK);
            assert_eq!(Rgb::from_hex_lossy("#12g456"), Rgb::from_u32(0x12));
            assert_eq!(Rgb::from_hex_lossy("  #ABCDEF "), Rgb::from_u32(0xabcdef));
            let _ = shade_hex("not a colour", 20.0);
        }
    }
}
