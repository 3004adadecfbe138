use std::fs;
use std::path::{Path, PathBuf};

use plano_core::projection::ViewState;
use plano_engine::command::{CommandBus, CommandContext, CommandRequest};
use plano_engine::composer::{RenderMode, SceneComposer};
use plano_engine::view::{ViewControl, ViewController};
use plano_io::SvgCanvas;
use tracing::{info, warn};

use crate::errors::FrontendError;
use crate::loader::{LayoutSource, load_layout};
use crate::{DemoOptions, composer_settings, render_mode};

/// 演示会话中的一步。
#[derive(Debug, Clone, Copy)]
enum DemoStep {
    Command(&'static str),
    /// 依次移动到给定横坐标的拖拽手势，首个值为按下位置。
    Drag(&'static [f64]),
}

const DEMO_SCRIPT: &[DemoStep] = &[
    DemoStep::Command("toggle_mode"),
    DemoStep::Command("set_rotation 90"),
    DemoStep::Command("set_tilt 45"),
    DemoStep::Drag(&[0.0, 40.0, 100.0]),
    DemoStep::Command("drag_rotate -60"),
    DemoStep::Command("reset_view"),
    DemoStep::Command("toggle_mode"),
];

/// 一次演示会话的结果概览。
#[derive(Debug)]
pub struct DemoReport {
    pub layout_name: String,
    pub source: LayoutSource,
    pub shape_count: usize,
    pub access_point_count: usize,
    pub jack_count: usize,
    pub cable_count: usize,
    pub volume_count: usize,
    pub commands: Vec<&'static str>,
    pub failed_commands: usize,
    pub frames: Vec<PathBuf>,
    pub final_view: ViewState,
    pub final_mode: RenderMode,
    pub listener_count: usize,
}

/// CLI 演示：加载布局，按脚本驱动视图控制器，每一步把当前画面写成 SVG 帧。
pub fn run_demo(options: &DemoOptions) -> Result<DemoReport, FrontendError> {
    let config = &options.config;
    let loaded = load_layout(config);
    let mode = options
        .mode
        .unwrap_or_else(|| render_mode(config.frontend.default_mode));
    let out_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output.directory.clone());
    fs::create_dir_all(&out_dir).map_err(|source| FrontendError::OutputDir {
        path: out_dir.clone(),
        source,
    })?;

    let layout = loaded.layout;
    let layout_name = layout.name.clone();
    let shape_count = layout.plan.len();
    let access_point_count = layout.access_points().count();
    let jack_count = layout.wired_jacks().count();
    let cable_count = layout.cables.len();
    let volume_count = layout.volumes.len();
    info!(
        name = %layout_name,
        shape_count,
        access_point_count,
        jack_count,
        cable_count,
        volume_count,
        "CLI 演示布局统计"
    );

    let composer = SceneComposer::new(layout, composer_settings(config));
    let (width, height) = composer.canvas_size(mode);
    let mut controller = ViewController::new(composer, SvgCanvas::new(width, height), mode);
    let bus = CommandBus::new();
    let mut frames = Vec::new();
    let mut failed_commands = 0;

    controller.redraw();
    frames.push(save_frame(&controller, &out_dir, frames.len(), "initial")?);

    for step in DEMO_SCRIPT {
        match *step {
            DemoStep::Command(line) => {
                let Some(request) = CommandRequest::parse(line) else {
                    continue;
                };
                let mut context = CommandContext {
                    view: &mut controller,
                };
                if let Err(err) = dispatch_cli_command(&bus, &request, &mut context) {
                    warn!("CLI 命令执行失败: {err}");
                    failed_commands += 1;
                }
                frames.push(save_frame(&controller, &out_dir, frames.len(), &request.name)?);
            }
            DemoStep::Drag(positions) => {
                let Some((&start, rest)) = positions.split_first() else {
                    continue;
                };
                let mut gesture = controller.begin_drag(start);
                for &x in rest {
                    gesture.move_to(x);
                }
                gesture.release();
                println!(
                    "[拖拽] 当前旋转角 {}°",
                    controller.view_state().rotation_deg
                );
                frames.push(save_frame(&controller, &out_dir, frames.len(), "drag")?);
            }
        }
    }

    let mut commands: Vec<&'static str> = bus.available_commands().copied().collect();
    commands.sort_unstable();

    Ok(DemoReport {
        layout_name,
        source: loaded.source,
        shape_count,
        access_point_count,
        jack_count,
        cable_count,
        volume_count,
        commands,
        failed_commands,
        frames,
        final_view: controller.view_state(),
        final_mode: controller.mode(),
        listener_count: controller.listener_count(),
    })
}

/// 打印演示概览。
pub fn print_report(report: &DemoReport) {
    println!("Rust 版楼层平面图 CLI 演示");
    match &report.source {
        LayoutSource::Json(path) => println!("已从 JSON 加载布局：{}", path.display()),
        LayoutSource::Builtin => println!("使用内置布局：{}", report.layout_name),
    }
    println!(
        "平面图元 {} 个，无线 AP {} 个，有线网口 {} 个，线缆 {} 段，立体块 {} 个",
        report.shape_count,
        report.access_point_count,
        report.jack_count,
        report.cable_count,
        report.volume_count
    );
    println!("支持的命令: {}", report.commands.join(", "));
    if report.failed_commands > 0 {
        println!("有 {} 条命令执行失败", report.failed_commands);
    }
    println!(
        "最终视图：{}，旋转角={:.1}°，俯仰角={:.1}°",
        report.final_mode.label(),
        report.final_view.rotation_deg,
        report.final_view.tilt_deg
    );
    println!("已输出 {} 帧：", report.frames.len());
    for frame in &report.frames {
        println!("  - {}", frame.display());
    }
}

fn mode_slug(mode: RenderMode) -> &'static str {
    match mode {
        RenderMode::Plan => "plan",
        RenderMode::Isometric => "iso",
    }
}

fn save_frame(
    controller: &ViewController<SvgCanvas>,
    out_dir: &Path,
    index: usize,
    step: &str,
) -> Result<PathBuf, FrontendError> {
    let path = out_dir.join(format!(
        "{index:02}-{step}-{}.svg",
        mode_slug(controller.mode())
    ));
    controller.target().surface_ref().write_to(&path)?;
    Ok(path)
}

fn dispatch_cli_command(
    bus: &CommandBus,
    request: &CommandRequest,
    context: &mut CommandContext<'_>,
) -> Result<(), String> {
    let response = bus.dispatch(request, context);
    if response.success {
        if let Some(message) = response.message {
            println!("[命令] {message}");
        }
        Ok(())
    } else {
        Err(response.message.unwrap_or_else(|| "未知错误".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use plano_core::office::office_layout;
    use plano_engine::composer::ComposerSettings;

    use super::*;

    fn options(dir: &Path) -> DemoOptions {
        DemoOptions {
            output_dir: Some(dir.join("frames")),
            ..DemoOptions::default()
        }
    }

    #[test]
    fn demo_writes_one_frame_per_step() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let report = run_demo(&options(dir.path())).expect("demo");

        assert_eq!(report.frames.len(), DEMO_SCRIPT.len() + 1);
        assert!(report.frames.iter().all(|frame| frame.exists()));
        assert_eq!(report.failed_commands, 0);
        assert_eq!(report.listener_count, 0);
        assert_eq!(report.final_mode, RenderMode::Plan);
        assert_eq!(report.final_view, ViewState::default());

        let first = report.frames[0].file_name().and_then(|name| name.to_str());
        assert_eq!(first, Some("00-initial-plan.svg"));
        let second = report.frames[1].file_name().and_then(|name| name.to_str());
        assert_eq!(second, Some("01-toggle_mode-iso.svg"));

        let svg = fs::read_to_string(&report.frames[1]).expect("read frame");
        assert!(svg.contains("width=\"1000\" height=\"800\""));
    }

    #[test]
    fn mode_override_starts_in_iso() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let options = DemoOptions {
            mode: Some(RenderMode::Isometric),
            ..options(dir.path())
        };
        let report = run_demo(&options).expect("demo");
        assert_eq!(report.final_mode, RenderMode::Isometric);

        let svg = fs::read_to_string(&report.frames[0]).expect("read frame");
        assert!(svg.contains("width=\"1000\" height=\"800\""));
        assert!(svg.contains("SALA TELA"));
    }

    #[test]
    fn unusable_output_dir_is_reported() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").expect("write");
        let options = DemoOptions {
            output_dir: Some(blocker.join("frames")),
            ..DemoOptions::default()
        };
        let err = run_demo(&options).unwrap_err();
        assert!(matches!(err, FrontendError::OutputDir { .. }));
    }

    #[test]
    fn failed_dispatch_returns_message() {
        let composer = SceneComposer::new(office_layout(), ComposerSettings::default());
        let mut controller =
            ViewController::new(composer, SvgCanvas::new(1200, 900), RenderMode::Plan);
        let bus = CommandBus::new();
        let mut context = CommandContext {
            view: &mut controller,
        };

        let request = CommandRequest::new("zoom", ["2"]);
        let err = dispatch_cli_command(&bus, &request, &mut context).unwrap_err();
        assert_eq!(err, "unknown command: zoom");

        let request = CommandRequest::new("set_tilt", ["20"]);
        assert!(dispatch_cli_command(&bus, &request, &mut context).is_ok());
    }
}
