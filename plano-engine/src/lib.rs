pub mod command;
pub mod composer;
pub mod primitives;

pub mod errors {
    use std::num::ParseFloatError;

    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum EngineError {
        #[error("unknown command: {0}")]
        UnknownCommand(String),
        #[error("command `{command}` expects argument <{name}>")]
        MissingArgument {
            command: &'static str,
            name: &'static str,
        },
        #[error("command `{command}`: `{value}` is not a number")]
        InvalidNumber {
            command: &'static str,
            value: String,
            #[source]
            source: ParseFloatError,
        },
        #[error("command `{command}`: value must be finite, got {value}")]
        NonFinite { command: &'static str, value: f64 },
    }
}

pub mod view {
    use plano_core::projection::ViewState;
    use plano_core::surface::RenderTarget;
    use tracing::{debug, warn};

    use crate::composer::{RenderMode, SceneComposer};

    /// 拖拽时每像素对应的旋转角（度）。
    pub const DRAG_DEGREES_PER_PIXEL: f64 = 0.5;

    /// 一次拖拽手势挂接的监听器数量（移动 + 抬起）。
    const LISTENERS_PER_GESTURE: usize = 2;

    /// 单次重绘的结果。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FrameOutcome {
        Drawn,
        /// 渲染目标拿不到绘图表面，本帧被跳过。
        Skipped,
    }

    /// 交互控制接口，供命令总线以 trait 对象的形式驱动。
    pub trait ViewControl {
        fn view_state(&self) -> ViewState;
        fn mode(&self) -> RenderMode;
        fn set_rotation(&mut self, degrees: f64) -> FrameOutcome;
        fn set_tilt(&mut self, degrees: f64) -> FrameOutcome;
        fn drag_rotate(&mut self, delta_pixels: f64) -> FrameOutcome;
        fn reset(&mut self) -> FrameOutcome;
        fn toggle_mode(&mut self) -> FrameOutcome;
    }

    /// 交互控制器：唯一持有可变视图状态，每次状态变化后立即整帧重绘。
    #[derive(Debug)]
    pub struct ViewController<T: RenderTarget> {
        composer: SceneComposer,
        target: T,
        view: ViewState,
        mode: RenderMode,
        frames_drawn: u64,
        frames_skipped: u64,
        listeners: usize,
    }

    impl<T: RenderTarget> ViewController<T> {
        pub fn new(composer: SceneComposer, target: T, mode: RenderMode) -> Self {
            Self {
                composer,
                target,
                view: ViewState::default(),
                mode,
                frames_drawn: 0,
                frames_skipped: 0,
                listeners: 0,
            }
        }

        #[inline]
        pub fn composer(&self) -> &SceneComposer {
            &self.composer
        }

        #[inline]
        pub fn target(&self) -> &T {
            &self.target
        }

        #[inline]
        pub fn target_mut(&mut self) -> &mut T {
            &mut self.target
        }

        #[inline]
        pub fn frames_drawn(&self) -> u64 {
            self.frames_drawn
        }

        #[inline]
        pub fn frames_skipped(&self) -> u64 {
            self.frames_skipped
        }

        /// 当前挂接的指针监听器数量，手势结束后应回到 0。
        #[inline]
        pub fn listener_count(&self) -> usize {
            self.listeners
        }

        /// 以当前状态整帧重绘。
        pub fn redraw(&mut self) -> FrameOutcome {
            match self.target.surface() {
                Some(surface) => {
                    self.composer.compose(surface, self.mode, &self.view);
                    self.frames_drawn += 1;
                    FrameOutcome::Drawn
                }
                None => {
                    self.frames_skipped += 1;
                    warn!(mode = self.mode.label(), "绘图表面不可用，跳过本帧");
                    FrameOutcome::Skipped
                }
            }
        }

        /// 开始一次拖拽手势。手势对象被释放（或显式 `release`）时监听器随之解除。
        pub fn begin_drag(&mut self, x: f64) -> DragGesture<'_, T> {
            self.listeners += LISTENERS_PER_GESTURE;
            debug!(x, listeners = self.listeners, "开始拖拽");
            DragGesture {
                controller: self,
                last_x: x,
            }
        }

        fn apply_rotation(&mut self, degrees: f64) -> FrameOutcome {
            self.view.rotation_deg = degrees;
            self.redraw()
        }
    }

    impl<T: RenderTarget> ViewControl for ViewController<T> {
        fn view_state(&self) -> ViewState {
            self.view
        }

        fn mode(&self) -> RenderMode {
            self.mode
        }

        fn set_rotation(&mut self, degrees: f64) -> FrameOutcome {
            self.apply_rotation(degrees)
        }

        fn set_tilt(&mut self, degrees: f64) -> FrameOutcome {
            self.view.tilt_deg = degrees;
            self.redraw()
        }

        fn drag_rotate(&mut self, delta_pixels: f64) -> FrameOutcome {
            let rotation = self.view.rotation_deg + delta_pixels * DRAG_DEGREES_PER_PIXEL;
            self.apply_rotation(rotation)
        }

        fn reset(&mut self) -> FrameOutcome {
            self.view = ViewState::default();
            debug!("视图已重置");
            self.redraw()
        }

        fn toggle_mode(&mut self) -> FrameOutcome {
            self.mode = self.mode.toggled();
            let (width, height) = self.composer.canvas_size(self.mode);
            if let Some(surface) = self.target.surface() {
                surface.resize(width, height);
            }
            debug!(mode = self.mode.label(), width, height, "切换视图模式");
            self.redraw()
        }
    }

    /// 进行中的拖拽手势，持有控制器的独占借用。
    #[derive(Debug)]
    pub struct DragGesture<'a, T: RenderTarget> {
        controller: &'a mut ViewController<T>,
        last_x: f64,
    }

    impl<T: RenderTarget> DragGesture<'_, T> {
        /// 指针移动到 `x`，按与上次位置的差值旋转。
        pub fn move_to(&mut self, x: f64) -> FrameOutcome {
            let delta = x - self.last_x;
            self.last_x = x;
            self.controller.drag_rotate(delta)
        }

        #[inline]
        pub fn controller(&self) -> &ViewController<T> {
            self.controller
        }

        /// 指针抬起。
        pub fn release(self) {}
    }

    impl<T: RenderTarget> Drop for DragGesture<'_, T> {
        fn drop(&mut self) {
            self.controller.listeners -= LISTENERS_PER_GESTURE;
            debug!(listeners = self.controller.listeners, "拖拽结束");
        }
    }

    #[cfg(test)]
    mod tests {
        use plano_core::layout::FloorLayout;
        use plano_core::office::office_layout;
        use plano_core::surface::{DrawingSurface, RecordingSurface};

        use super::*;
        use crate::composer::ComposerSettings;

        fn controller(mode: RenderMode) -> ViewController<RecordingSurface> {
            let composer = SceneComposer::new(office_layout(), ComposerSettings::default());
            let (width, height) = composer.canvas_size(mode);
            ViewController::new(composer, RecordingSurface::new(width, height), mode)
        }

        #[test]
        fn defaults_and_reset() {
            let mut controller = controller(RenderMode::Isometric);
            assert_eq!(controller.view_state(), ViewState::new(45.0, 30.0));

            controller.set_rotation(200.0);
            controller.set_tilt(55.0);
            assert_eq!(controller.view_state(), ViewState::new(200.0, 55.0));

            assert_eq!(controller.reset(), FrameOutcome::Drawn);
            assert_eq!(controller.view_state(), ViewState::new(45.0, 30.0));
            assert_eq!(controller.frames_drawn(), 3);
        }

        #[test]
        fn every_transition_redraws() {
            let mut controller = controller(RenderMode::Isometric);
            controller.set_rotation(10.0);
            controller.set_tilt(0.0);
            controller.drag_rotate(4.0);
            controller.reset();
            assert_eq!(controller.frames_drawn(), 4);
            assert_eq!(controller.target().clear_count(), 4);
        }

        #[test]
        fn drag_is_linear_in_pixels() {
            let mut controller = controller(RenderMode::Isometric);
            controller.set_rotation(0.0);

            let mut gesture = controller.begin_drag(100.0);
            gesture.move_to(110.0);
            gesture.move_to(130.0);
            gesture.move_to(120.0);
            assert!((gesture.controller().view_state().rotation_deg - 10.0).abs() < f64::EPSILON);
            gesture.release();

            // 拆成多段与一次性拖动结果一致
            let mut split = self::controller(RenderMode::Isometric);
            split.set_rotation(0.0);
            split.drag_rotate(7.0);
            split.drag_rotate(13.0);
            assert!((split.view_state().rotation_deg - 10.0).abs() < f64::EPSILON);
        }

        #[test]
        fn rotation_is_not_wrapped() {
            let mut controller = controller(RenderMode::Isometric);
            controller.set_rotation(350.0);
            controller.drag_rotate(100.0);
            assert!((controller.view_state().rotation_deg - 400.0).abs() < f64::EPSILON);
        }

        #[test]
        fn gesture_detaches_listeners_on_every_path() {
            let mut controller = controller(RenderMode::Isometric);
            {
                let gesture = controller.begin_drag(0.0);
                assert_eq!(gesture.controller().listener_count(), 2);
            }
            assert_eq!(controller.listener_count(), 0);

            let mut gesture = controller.begin_drag(0.0);
            gesture.move_to(10.0);
            gesture.release();
            assert_eq!(controller.listener_count(), 0);
            assert_eq!(controller.frames_drawn(), 1);
        }

        #[test]
        fn missing_surface_skips_frames() {
            let composer = SceneComposer::new(FloorLayout::default(), ComposerSettings::default());
            let mut controller: ViewController<Option<RecordingSurface>> =
                ViewController::new(composer, None, RenderMode::Isometric);

            assert_eq!(controller.set_rotation(90.0), FrameOutcome::Skipped);
            assert_eq!(controller.toggle_mode(), FrameOutcome::Skipped);
            // 状态照常更新
            assert_eq!(controller.view_state().rotation_deg, 90.0);
            assert_eq!(controller.mode(), RenderMode::Plan);
            assert_eq!(controller.frames_skipped(), 2);
            assert_eq!(controller.frames_drawn(), 0);

            *controller.target_mut() = Some(RecordingSurface::new(10, 10));
            assert_eq!(controller.redraw(), FrameOutcome::Drawn);
        }

        #[test]
        fn toggle_mode_resizes_target() {
            let mut controller = controller(RenderMode::Plan);
            assert_eq!(controller.redraw(), FrameOutcome::Drawn);

            controller.toggle_mode();
            assert_eq!(controller.mode(), RenderMode::Isometric);
            assert_eq!(controller.target().size(), (1000, 800));

            controller.toggle_mode();
            assert_eq!(controller.target().size(), (1200, 900));
            assert_eq!(controller.target().depth(), 0);
        }
    }
}
