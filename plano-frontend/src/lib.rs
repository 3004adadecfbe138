pub mod cli;
pub mod errors;
pub mod loader;

use std::path::PathBuf;

use errors::FrontendError;
use plano_config::{AppConfig, FaceModeConfig, ViewMode};
use plano_core::projection::PlanTransform;
use plano_engine::composer::{ComposerSettings, IsoSettings, PlanSettings, RenderMode};
use plano_engine::primitives::FaceMode;
use tracing::info;

/// CLI 演示的运行参数。
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    pub config: AppConfig,
    /// 覆盖配置中的启动视图。
    pub mode: Option<RenderMode>,
    /// 覆盖配置中的输出目录。
    pub output_dir: Option<PathBuf>,
}

/// 启动 CLI 演示或返回错误。
pub fn run_cli_demo(options: &DemoOptions) -> Result<(), FrontendError> {
    info!("启动 CLI 演示前端");
    let report = cli::run_demo(options)?;
    cli::print_report(&report);
    Ok(())
}

/// 配置中的视图模式映射到渲染模式。
pub fn render_mode(mode: ViewMode) -> RenderMode {
    match mode {
        ViewMode::Plan => RenderMode::Plan,
        ViewMode::Iso => RenderMode::Isometric,
    }
}

/// 由应用配置构造场景编排参数。
pub fn composer_settings(config: &AppConfig) -> ComposerSettings {
    let plan = &config.render.plan;
    let iso = &config.render.iso;
    ComposerSettings {
        plan: PlanSettings {
            width: plan.width,
            height: plan.height,
            transform: PlanTransform::new(plan.scale, plan.offset_x, plan.offset_y),
            show_legend: plan.show_legend,
            show_outline: plan.show_outline,
        },
        iso: IsoSettings {
            width: iso.width,
            height: iso.height,
            scale: iso.scale,
            face_mode: match iso.face_mode {
                FaceModeConfig::Fixed => FaceMode::Fixed,
                FaceModeConfig::ViewDependent => FaceMode::ViewDependent,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_composer_defaults() {
        let settings = composer_settings(&AppConfig::default());
        assert_eq!(settings, ComposerSettings::default());
        assert_eq!(render_mode(ViewMode::Iso), RenderMode::Isometric);
    }
}
