//! 绘图表面约定。
//!
//! 填充、描边与字体都作为参数随每次调用显式传入，表面上唯一的隐式状态是变换栈；
//! 变换栈通过 [`PaintScope`] 成对地保存与恢复。

use std::ops::{Deref, DerefMut};

use crate::color::Rgb;
use crate::geometry::{ScreenPoint, ScreenRect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub width: f64,
    /// `[实线长度, 间隔长度]`，`None` 表示实线。
    pub dash: Option<[f64; 2]>,
}

impl StrokeStyle {
    #[inline]
    pub const fn solid(color: Rgb, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    #[inline]
    pub const fn dashed(color: Rgb, width: f64, dash: [f64; 2]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Center,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Middle,
    Top,
    Alphabetic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgb,
    pub size: f64,
    pub weight: FontWeight,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    /// 常规字重、水平居中、垂直居中。
    pub const fn new(color: Rgb, size: f64) -> Self {
        Self {
            color,
            size,
            weight: FontWeight::Normal,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub const fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub const fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// 固定像素尺寸的二维绘图表面。
pub trait DrawingSurface {
    fn size(&self) -> (u32, u32);
    /// 改变像素尺寸，同时清空内容与变换栈。
    fn resize(&mut self, width: u32, height: u32);
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: ScreenRect, fill: Rgb);
    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle);
    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgb);
    fn stroke_polygon(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle);
    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, fill: Rgb);
    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, stroke: &StrokeStyle);
    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &StrokeStyle);
    fn text(&mut self, content: &str, at: ScreenPoint, style: &TextStyle);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);
}

/// 渲染目标：可能拿不到绘图表面（对应画布上下文获取失败）。
pub trait RenderTarget {
    fn surface(&mut self) -> Option<&mut dyn DrawingSurface>;
}

impl<S: DrawingSurface> RenderTarget for Option<S> {
    fn surface(&mut self) -> Option<&mut dyn DrawingSurface> {
        self.as_mut().map(|surface| surface as &mut dyn DrawingSurface)
    }
}

/// 作用域内的变换状态：创建时 `save`，离开作用域（包括提前返回与 panic 展开）时 `restore`。
pub struct PaintScope<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DrawingSurface + ?Sized> PaintScope<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for PaintScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for PaintScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for PaintScope<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// 记录到显示列表中的一次绘制调用。
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    FillRect { rect: ScreenRect, fill: Rgb },
    StrokeRect { rect: ScreenRect, stroke: StrokeStyle },
    FillPolygon { points: Vec<ScreenPoint>, fill: Rgb },
    StrokePolygon { points: Vec<ScreenPoint>, stroke: StrokeStyle },
    FillCircle { center: ScreenPoint, radius: f64, fill: Rgb },
    StrokeCircle { center: ScreenPoint, radius: f64, stroke: StrokeStyle },
    Line { from: ScreenPoint, to: ScreenPoint, stroke: StrokeStyle },
    Text { content: String, at: ScreenPoint, style: TextStyle },
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
}

/// 把绘制调用记录为显示列表的表面。`clear` 会丢弃之前的内容，
/// 因此列表里始终只有最近一帧。
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    depth: usize,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            depth: 0,
            clears: 0,
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// 当前未恢复的 `save` 层数。
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 累计清屏次数，可视作已开始绘制的帧数。
    #[inline]
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, ScreenPoint)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { content, at, .. } => Some((content.as_str(), *at)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (ScreenPoint, ScreenPoint, &StrokeStyle)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Line { from, to, stroke } => Some((*from, *to, stroke)),
            _ => None,
        })
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
        self.depth = 0;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
        self.push(DrawCommand::Clear);
    }

    fn fill_rect(&mut self, rect: ScreenRect, fill: Rgb) {
        self.push(DrawCommand::FillRect { rect, fill });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, stroke: &StrokeStyle) {
        self.push(DrawCommand::StrokeRect {
            rect,
            stroke: *stroke,
        });
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgb) {
        self.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            fill,
        });
    }

    fn stroke_polygon(&mut self, points: &[ScreenPoint], stroke: &StrokeStyle) {
        self.push(DrawCommand::StrokePolygon {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, fill: Rgb) {
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            fill,
        });
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, stroke: &StrokeStyle) {
        self.push(DrawCommand::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &StrokeStyle) {
        self.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn text(&mut self, content: &str, at: ScreenPoint, style: &TextStyle) {
        self.push(DrawCommand::Text {
            content: content.to_string(),
            at,
            style: *style,
        });
    }

    fn save(&mut self) {
        self.depth += 1;
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        // 与画布一致：多余的 restore 被忽略
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.push(DrawCommand::Rotate { radians });
    }
}

impl RenderTarget for RecordingSurface {
    fn surface(&mut self) -> Option<&mut dyn DrawingSurface> {
        Some(self as &mut dyn DrawingSurface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_scope_restores_on_every_exit_path() {
        fn draw_rotated(surface: &mut dyn DrawingSurface, bail_early: bool) -> Option<()> {
            let mut scope = PaintScope::new(surface);
            scope.translate(10.0, 10.0);
            scope.rotate(1.0);
            if bail_early {
                return None;
            }
            scope.fill_rect(
                ScreenRect::new(ScreenPoint::new(0.0, 0.0), 1.0, 1.0),
                Rgb::BLACK,
            );
            Some(())
        }

        let mut surface = RecordingSurface::new(100, 100);
        assert!(draw_rotated(&mut surface, true).is_none());
        assert_eq!(surface.depth(), 0);
        assert!(draw_rotated(&mut surface, false).is_some());
        assert_eq!(surface.depth(), 0);
        assert_eq!(
            surface.commands().last(),
            Some(&DrawCommand::Restore),
            "restore must be the final command"
        );
    }

    #[test]
    fn clear_drops_previous_frame() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.clear();
        surface.line(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(1.0, 1.0),
            &StrokeStyle::solid(Rgb::BLACK, 1.0),
        );
        assert_eq!(surface.lines().count(), 1);

        surface.clear();
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
        assert_eq!(surface.clear_count(), 2);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.restore();
        assert_eq!(surface.depth(), 0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn optional_surface_models_missing_context() {
        let mut missing: Option<RecordingSurface> = None;
        assert!(missing.surface().is_none());

        let mut present = Some(RecordingSurface::new(4, 4));
        let surface = present.surface().expect("surface");
        assert_eq!(surface.size(), (4, 4));
    }
}
