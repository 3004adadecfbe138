use std::collections::HashMap;

use tracing::debug;

use crate::errors::EngineError;
use crate::view::{FrameOutcome, ViewControl};

#[derive(Debug, Clone)]
pub struct CommandRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(name: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 按空白切分一行文本，首个词为命令名。空行返回 `None`。
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        Some(Self::new(name, parts))
    }
}

#[derive(Debug, Clone)]
pub struct CommandResponse {
    pub success: bool,
    pub message: Option<String>,
}

impl CommandResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    fn after_frame(message: String, outcome: FrameOutcome) -> Self {
        match outcome {
            FrameOutcome::Drawn => Self::ok(message),
            FrameOutcome::Skipped => Self::ok(format!("{message}（画布不可用，未重绘）")),
        }
    }
}

impl From<EngineError> for CommandResponse {
    fn from(error: EngineError) -> Self {
        Self::err(error.to_string())
    }
}

pub trait CommandHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse;
}

pub struct CommandContext<'a> {
    pub view: &'a mut dyn ViewControl,
}

pub struct CommandBus {
    handlers: HashMap<&'static str, Box<dyn CommandHandler>>,
}

impl CommandBus {
    pub fn new() -> Self {
        let mut bus = Self {
            handlers: HashMap::new(),
        };
        bus.register(ResetViewCommand);
        bus.register(SetRotationCommand);
        bus.register(SetTiltCommand);
        bus.register(DragRotateCommand);
        bus.register(ToggleModeCommand);
        bus
    }

    pub fn register<H: CommandHandler + 'static>(&mut self, handler: H) {
        self.handlers.insert(handler.name(), Box::new(handler));
    }

    pub fn dispatch(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        if let Some(handler) = self.handlers.get(request.name.as_str()) {
            debug!(command = %request.name, args = ?request.args, "执行命令");
            handler.execute(request, context)
        } else {
            EngineError::UnknownCommand(request.name.clone()).into()
        }
    }

    pub fn available_commands(&self) -> impl Iterator<Item = &&'static str> {
        self.handlers.keys()
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// 读取第一个参数并解析为有限实数。
fn number_arg(
    request: &CommandRequest,
    command: &'static str,
    name: &'static str,
) -> Result<f64, EngineError> {
    let raw = request
        .args
        .first()
        .ok_or(EngineError::MissingArgument { command, name })?;
    let value: f64 = raw.parse().map_err(|source| EngineError::InvalidNumber {
        command,
        value: raw.clone(),
        source,
    })?;
    if !value.is_finite() {
        return Err(EngineError::NonFinite { command, value });
    }
    Ok(value)
}

struct ResetViewCommand;

impl CommandHandler for ResetViewCommand {
    fn name(&self) -> &'static str {
        "reset_view"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let outcome = context.view.reset();
        CommandResponse::after_frame("视图已恢复默认角度".to_string(), outcome)
    }
}

struct SetRotationCommand;

impl CommandHandler for SetRotationCommand {
    fn name(&self) -> &'static str {
        "set_rotation"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match number_arg(request, self.name(), "degrees") {
            Ok(degrees) => {
                let outcome = context.view.set_rotation(degrees);
                CommandResponse::after_frame(format!("旋转角设为 {degrees}°"), outcome)
            }
            Err(error) => error.into(),
        }
    }
}

struct SetTiltCommand;

impl CommandHandler for SetTiltCommand {
    fn name(&self) -> &'static str {
        "set_tilt"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match number_arg(request, self.name(), "degrees") {
            Ok(degrees) => {
                let outcome = context.view.set_tilt(degrees);
                CommandResponse::after_frame(format!("俯仰角设为 {degrees}°"), outcome)
            }
            Err(error) => error.into(),
        }
    }
}

struct DragRotateCommand;

impl CommandHandler for DragRotateCommand {
    fn name(&self) -> &'static str {
        "drag_rotate"
    }

    fn execute(
        &self,
        request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        match number_arg(request, self.name(), "pixels") {
            Ok(pixels) => {
                let outcome = context.view.drag_rotate(pixels);
                let rotation = context.view.view_state().rotation_deg;
                CommandResponse::after_frame(
                    format!("拖拽 {pixels} 像素，当前旋转角 {rotation}°"),
                    outcome,
                )
            }
            Err(error) => error.into(),
        }
    }
}

struct ToggleModeCommand;

impl CommandHandler for ToggleModeCommand {
    fn name(&self) -> &'static str {
        "toggle_mode"
    }

    fn execute(
        &self,
        _request: &CommandRequest,
        context: &mut CommandContext<'_>,
    ) -> CommandResponse {
        let outcome = context.view.toggle_mode();
        let mode = context.view.mode().label();
        CommandResponse::after_frame(format!("已切换到 {mode} 视图"), outcome)
    }
}

#[cfg(test)]
mod tests {
    use plano_core::office::office_layout;
    use plano_core::surface::RecordingSurface;

    use super::*;
    use crate::composer::{ComposerSettings, RenderMode, SceneComposer};
    use crate::view::ViewController;

    fn controller() -> ViewController<RecordingSurface> {
        let composer = SceneComposer::new(office_layout(), ComposerSettings::default());
        ViewController::new(composer, RecordingSurface::new(1000, 800), RenderMode::Isometric)
    }

    #[test]
    fn view_commands_drive_controller() {
        let mut controller = controller();
        let bus = CommandBus::new();
        let mut context = CommandContext {
            view: &mut controller,
        };

        let response = bus.dispatch(&CommandRequest::new("set_rotation", ["90"]), &mut context);
        assert!(response.success);
        let response = bus.dispatch(&CommandRequest::new("set_tilt", ["10.5"]), &mut context);
        assert!(response.success);
        assert_eq!(context.view.view_state().tilt_deg, 10.5);

        let drag = CommandRequest::parse("drag_rotate -20").expect("request");
        let response = bus.dispatch(&drag, &mut context);
        assert!(response.success);
        assert_eq!(context.view.view_state().rotation_deg, 80.0);

        let response = bus.dispatch(&CommandRequest::new("toggle_mode", Vec::<String>::new()), &mut context);
        assert!(response.success);
        assert_eq!(context.view.mode(), RenderMode::Plan);

        let reset = CommandRequest::parse("reset_view").expect("request");
        assert!(bus.dispatch(&reset, &mut context).success);
        assert_eq!(context.view.view_state().rotation_deg, 45.0);
        assert_eq!(controller.frames_drawn(), 5);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        let mut controller = controller();
        let bus = CommandBus::new();
        let mut context = CommandContext {
            view: &mut controller,
        };

        for line in ["set_rotation", "set_rotation abc", "set_tilt NaN", "drag_rotate inf"] {
            let request = CommandRequest::parse(line).expect("request");
            let response = bus.dispatch(&request, &mut context);
            assert!(!response.success, "`{line}` should fail");
        }

        let response = bus.dispatch(
            &CommandRequest::parse("set_rotation abc").expect("request"),
            &mut context,
        );
        assert_eq!(
            response.message.as_deref(),
            Some("command `set_rotation`: `abc` is not a number")
        );

        let unknown = bus.dispatch(&CommandRequest::new("zoom", ["2"]), &mut context);
        assert!(!unknown.success);
        assert_eq!(context.view.view_state().rotation_deg, 45.0);
        assert_eq!(controller.frames_drawn(), 0);
    }

    #[test]
    fn parse_skips_blank_lines() {
        assert!(CommandRequest::parse("   ").is_none());
        let request = CommandRequest::parse("  set_tilt   15 ").expect("request");
        assert_eq!(request.name, "set_tilt");
        assert_eq!(request.args, ["15"]);
    }

    #[test]
    fn all_view_commands_are_registered() {
        let bus = CommandBus::new();
        let mut names: Vec<_> = bus.available_commands().copied().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            ["drag_rotate", "reset_view", "set_rotation", "set_tilt", "toggle_mode"]
        );
    }
}
