use std::fs;
use std::path::{Path, PathBuf};

use plano_core::layout::{FloorLayout, LayoutError};
use thiserror::Error;
use tracing::debug;

pub mod svg;

pub use svg::{SvgCanvas, SvgSurface};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("failed to read file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path:?}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed layout {path:?}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize layout: {0}")]
    SerializeError(#[source] serde_json::Error),
    #[error("invalid layout {path:?}: {source}")]
    InvalidLayout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },
}

pub trait LayoutLoader {
    fn load(&self, path: &Path) -> Result<FloorLayout, IoError>;
}

pub trait LayoutSaver {
    fn save(&self, layout: &FloorLayout, path: &Path) -> Result<(), IoError>;
}

/// JSON 布局文件的读写入口。读取时会执行完整的尺寸校验。
#[derive(Debug, Clone, Copy)]
pub struct JsonLayoutFacade {
    pretty: bool,
}

impl JsonLayoutFacade {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// 输出不带缩进的紧凑 JSON。
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonLayoutFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutLoader for JsonLayoutFacade {
    fn load(&self, path: &Path) -> Result<FloorLayout, IoError> {
        let data = fs::read_to_string(path).map_err(|source| IoError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: FloorLayout =
            serde_json::from_str(&data).map_err(|source| IoError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;
        layout.validate().map_err(|source| IoError::InvalidLayout {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            shapes = layout.plan.len(),
            volumes = layout.volumes.len(),
            "已读取布局文件"
        );
        Ok(layout)
    }
}

impl LayoutSaver for JsonLayoutFacade {
    fn save(&self, layout: &FloorLayout, path: &Path) -> Result<(), IoError> {
        let serialized = if self.pretty {
            serde_json::to_string_pretty(layout)
        } else {
            serde_json::to_string(layout)
        }
        .map_err(IoError::SerializeError)?;
        fs::write(path, serialized).map_err(|source| IoError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "已写出布局文件");
        Ok(())
    }
}

/// 把 SVG 文本写入文件。
pub fn write_svg(svg: &str, path: &Path) -> Result<(), IoError> {
    fs::write(path, svg).map_err(|source| IoError::WriteError {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = svg.len(), "已写出 SVG");
    Ok(())
}
