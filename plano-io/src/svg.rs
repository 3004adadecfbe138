//! 以 SVG 文档作为绘图表面。
//!
//! 变换栈用 `glam::DAffine2` 维护；非单位变换以 `transform="matrix(...)"` 的形式附在元素上，
//! 坐标本身保持调用时的局部值。

use std::fmt::Write as _;
use std::path::Path;

use glam::{DAffine2, DVec2};
use plano_core::color::Rgb;
use plano_core::geometry::{ScreenPoint, ScreenRect};
use plano_core::surface::{
    DrawingSurface, FontWeight, RenderTarget, StrokeStyle, TextAlign, TextBaseline, TextStyle,
};

use crate::{IoError, write_svg};

const FONT_FAMILY: &str = "Arial";

#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    elements: Vec<String>,
    current: DAffine2,
    stack: Vec<DAffine2>,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            current: DAffine2::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// 当前帧的元素数量。
    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// 当前累计变换。
    #[inline]
    pub fn transform(&self) -> DAffine2 {
        self.current
    }

    /// 生成完整的 SVG 文档。
    pub fn to_svg(&self) -> String {
        let (width, height) = (self.width, self.height);
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
        );
        for element in &self.elements {
            svg.push_str(element);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn write_to(&self, path: &Path) -> Result<(), IoError> {
        write_svg(&self.to_svg(), path)
    }

    fn transform_attr(&self) -> String {
        if self.current == DAffine2::IDENTITY {
            return String::new();
        }
        let m = self.current.matrix2;
        let t = self.current.translation;
        format!(
            " transform=\"matrix({} {} {} {} {} {})\"",
            num(m.x_axis.x),
            num(m.x_axis.y),
            num(m.y_axis.x),
            num(m.y_axis.y),
            num(t.x),
            num(t.y)
        )
    }

    fn push(&mut self, mut element: String) {
        // 在自闭合或开标签结束前插入变换
        let transform = self.transform_attr();
        if !transform.is_empty() {
            let at = element
                .find("/>")
                .or_else(|| element.find('>'))
                .unwrap_or(element.len());
            element.insert_str(at, &transform);
        }
        self.elements.push(element);
    }
}

/// 最多保留两位小数并去掉多余的零。
fn num(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn stroke_attrs(stroke: &StrokeStyle) -> String {
    let mut attrs = format!(
        "stroke=\"{}\" stroke-width=\"{}\"",
        stroke.color,
        num(stroke.width)
    );
    if let Some([on, off]) = stroke.dash {
        let _ = write!(attrs, " stroke-dasharray=\"{} {}\"", num(on), num(off));
    }
    attrs
}

fn points_attr(points: &[ScreenPoint]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", num(point.x()), num(point.y())))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rect_attrs(rect: ScreenRect) -> String {
    format!(
        "x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
        num(rect.origin.x()),
        num(rect.origin.y()),
        num(rect.width),
        num(rect.height)
    )
}

impl DrawingSurface for SvgSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.elements.clear();
        self.current = DAffine2::IDENTITY;
        self.stack.clear();
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn fill_rect(&mut self, rect: ScreenRect, fill: Rgb) {
        self.push(format!("<rect {} fill=\"{fill}\"/>", rect_attrs(rect)));
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle) {
        self.push(format!(
            "<rect {} fill=\"none\" {}/>",
            rect_attrs(rect),
            stroke_attrs(stroke)
        ));
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgb) {
        self.push(format!(
            "<polygon points=\"{}\" fill=\"{fill}\"/>",
            points_attr(points)
        ));
    }

    fn stroke_polygon(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle) {
        self.push(format!(
            "<polygon points=\"{}\" fill=\"none\" {} stroke-linejoin=\"round\"/>",
            points_attr(points),
            stroke_attrs(stroke)
        ));
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, fill: Rgb) {
        self.push(format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\"/>",
            num(center.x()),
            num(center.y()),
            num(radius)
        ));
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, stroke: &StrokeStyle) {
        self.push(format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" {}/>",
            num(center.x()),
            num(center.y()),
            num(radius),
            stroke_attrs(stroke)
        ));
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &StrokeStyle) {
        self.push(format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {}/>",
            num(from.x()),
            num(from.y()),
            num(to.x()),
            num(to.y()),
            stroke_attrs(stroke)
        ));
    }

    fn text(&mut self, content: &str, at: ScreenPoint, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Center => "middle",
            TextAlign::Left => "start",
        };
        let baseline = match style.baseline {
            TextBaseline::Middle => "middle",
            TextBaseline::Top => "hanging",
            TextBaseline::Alphabetic => "alphabetic",
        };
        let weight = match style.weight {
            FontWeight::Bold => " font-weight=\"bold\"",
            FontWeight::Normal => "",
        };
        self.push(format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"{FONT_FAMILY}\" font-size=\"{}\"{weight} text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\" fill=\"{}\">{}</text>",
            num(at.x()),
            num(at.y()),
            num(style.size),
            style.color,
            escape_xml(content)
        ));
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.current = self.current * DAffine2::from_translation(DVec2::new(dx, dy));
    }

    fn rotate(&mut self, radians: f64) {
        self.current = self.current * DAffine2::from_angle(radians);
    }
}

/// 以 SVG 文档为后端的画布。尺寸为零时视为拿不到绘图表面。
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    surface: SvgSurface,
}

impl SvgCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: SvgSurface::new(width, height),
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    #[inline]
    pub fn surface_ref(&self) -> &SvgSurface {
        &self.surface
    }

    pub fn to_svg(&self) -> String {
        self.surface.to_svg()
    }
}

impl RenderTarget for SvgCanvas {
    fn surface(&mut self) -> Option<&mut dyn DrawingSurface> {
        let (width, height) = self.surface.size();
        if width == 0 || height == 0 {
            None
        } else {
            Some(&mut self.surface as &mut dyn DrawingSurface)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(230.0), "230");
        assert_eq!(num(569.5), "569.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape_xml("A&B <C>"), "A&amp;B &lt;C&gt;");
    }

    #[test]
    fn transform_stack_round_trips() {
        let mut surface = SvgSurface::new(100, 100);
        surface.save();
        surface.translate(170.0, 584.0);
        surface.rotate(-std::f64::consts::FRAC_PI_2);
        surface.text(
            "PRINTERS",
            ScreenPoint::new(0.0, 0.0),
            &TextStyle::new(Rgb::BLACK, 10.0),
        );
        surface.restore();
        assert_eq!(surface.transform(), DAffine2::IDENTITY);

        let svg = surface.to_svg();
        assert!(svg.contains("transform=\"matrix(0 -1 1 0 170 584)\""), "{svg}");
    }

    #[test]
    fn restore_without_save_is_ignored() {
        let mut surface = SvgSurface::new(10, 10);
        surface.translate(5.0, 5.0);
        surface.restore();
        assert_eq!(
            surface.transform(),
            DAffine2::from_translation(DVec2::new(5.0, 5.0))
        );
    }
}
