use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// 指定配置文件路径的环境变量。
pub const CONFIG_ENV: &str = "PLANO_CONFIG";

/// 应用配置的根结构。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub frontend: FrontendConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// 从显式路径加载配置。
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 自动发现配置文件：优先读取环境变量 `PLANO_CONFIG`，否则寻找 `./config/default.toml`。
    /// 若文件缺失，则返回默认配置。
    pub fn discover() -> Result<Self, ConfigError> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let default_path = env::current_dir()
            .map(|dir| dir.join("config").join("default.toml"))
            .map_err(|source| ConfigError::Context {
                message: "获取当前工作目录失败".to_string(),
                source,
            })?;

        if default_path.exists() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }
}

/// 日志配置，支持设置默认等级。
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

/// 启动时显示的视图。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Plan,
    Iso,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontendConfig {
    #[serde(default)]
    pub default_mode: ViewMode,
    /// JSON 布局文件；缺省时使用内置布局。
    #[serde(default)]
    pub layout: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub plan: PlanRenderConfig,
    #[serde(default)]
    pub iso: IsoRenderConfig,
}

/// 平面图出图参数。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanRenderConfig {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub show_legend: bool,
    pub show_outline: bool,
}

impl Default for PlanRenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            scale: 6.0,
            offset_x: 20.0,
            offset_y: 20.0,
            show_legend: true,
            show_outline: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceModeConfig {
    #[default]
    Fixed,
    ViewDependent,
}

/// 3D 视图出图参数。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IsoRenderConfig {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
    pub face_mode: FaceModeConfig,
}

impl Default for IsoRenderConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            scale: 5.0,
            face_mode: FaceModeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_directory")]
    pub directory: PathBuf,
}

impl OutputConfig {
    fn default_directory() -> PathBuf {
        PathBuf::from("output")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: Self::default_directory(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path:?} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("解析配置文件 {path:?} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{message}")]
    Context {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_returned_when_file_missing() {
        let cfg = AppConfig::discover().expect("discover should succeed");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.frontend.default_mode, ViewMode::Plan);
        assert!(cfg.frontend.layout.is_none());
        assert_eq!((cfg.render.plan.width, cfg.render.plan.height), (1200, 900));
        assert_eq!((cfg.render.iso.width, cfg.render.iso.height), (1000, 800));
        assert_eq!(cfg.render.iso.face_mode, FaceModeConfig::Fixed);
        assert!(cfg.render.plan.show_legend && cfg.render.plan.show_outline);
        assert_eq!(cfg.output.directory, PathBuf::from("output"));
    }

    #[test]
    fn load_from_temp_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
            [logging]
            level = "debug"

            [frontend]
            default_mode = "iso"
            layout = "layouts/office.json"

            [render.plan]
            width = 1000
            show_legend = false

            [render.iso]
            height = 900
            face_mode = "view_dependent"

            [output]
            directory = "frames"
            "#
        )
        .unwrap();

        let cfg = AppConfig::from_file(file.path()).expect("load config");
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.frontend.default_mode, ViewMode::Iso);
        assert_eq!(
            cfg.frontend.layout.as_deref(),
            Some(Path::new("layouts/office.json"))
        );
        assert_eq!(cfg.render.plan.width, 1000);
        // 未出现的字段保持默认
        assert_eq!(cfg.render.plan.height, 900);
        assert!((cfg.render.plan.scale - 6.0).abs() < f64::EPSILON);
        assert!(!cfg.render.plan.show_legend);
        assert!(cfg.render.plan.show_outline);
        assert_eq!(cfg.render.iso.width, 1000);
        assert_eq!(cfg.render.iso.height, 900);
        assert_eq!(cfg.render.iso.face_mode, FaceModeConfig::ViewDependent);
        assert_eq!(cfg.output.directory, PathBuf::from("frames"));
    }

    #[test]
    fn parse_errors_carry_path() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "[render.iso]\nface_mode = \"wireframe\"").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let missing = AppConfig::from_file("/nonexistent/plano.toml").unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
