use std::env;
use std::path::PathBuf;

use plano_config::AppConfig;
use plano_core::layout::FloorLayout;
use plano_core::office::office_layout;
use plano_io::{JsonLayoutFacade, LayoutLoader};
use tracing::{info, warn};

/// 指定 JSON 布局文件的环境变量，优先于配置文件。
pub const LAYOUT_ENV: &str = "PLANO_LAYOUT_JSON";

/// 布局来源，便于前端呈现加载信息。
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutSource {
    Json(PathBuf),
    Builtin,
}

/// 统一封装加载后的布局与来源。
#[derive(Debug)]
pub struct LoadedLayout {
    pub layout: FloorLayout,
    pub source: LayoutSource,
}

/// 依次尝试环境变量 `PLANO_LAYOUT_JSON` 与配置中的 `frontend.layout`，
/// 都未指定或加载失败时回退到内置布局。
pub fn load_layout(config: &AppConfig) -> LoadedLayout {
    let path = env::var_os(LAYOUT_ENV)
        .map(PathBuf::from)
        .or_else(|| config.frontend.layout.clone());
    load_layout_from(path)
}

pub fn load_layout_from(path: Option<PathBuf>) -> LoadedLayout {
    if let Some(path) = path {
        match JsonLayoutFacade::new().load(&path) {
            Ok(layout) => {
                info!(path = %path.display(), name = %layout.name, "从 JSON 加载布局成功");
                return LoadedLayout {
                    layout,
                    source: LayoutSource::Json(path),
                };
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "加载布局失败，回退到内置布局");
            }
        }
    }

    LoadedLayout {
        layout: office_layout(),
        source: LayoutSource::Builtin,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use plano_core::geometry::Point2;
    use plano_core::layout::Room;
    use plano_io::LayoutSaver;

    use super::*;

    #[test]
    fn missing_path_uses_builtin_layout() {
        let loaded = load_layout_from(None);
        assert_eq!(loaded.source, LayoutSource::Builtin);
        assert_eq!(loaded.layout.access_points().count(), 5);
    }

    #[test]
    fn json_layout_is_preferred() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("layout.json");
        let mut layout = FloorLayout::new("custom");
        layout.add_shape(Room::new(Point2::new(0.0, 0.0), 4.0, 4.0, "A"));
        JsonLayoutFacade::new().save(&layout, &path).expect("save");

        let loaded = load_layout_from(Some(path.clone()));
        assert_eq!(loaded.source, LayoutSource::Json(path));
        assert_eq!(loaded.layout, layout);
    }

    #[test]
    fn broken_file_falls_back() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").expect("write");

        let loaded = load_layout_from(Some(path));
        assert_eq!(loaded.source, LayoutSource::Builtin);
    }
}
