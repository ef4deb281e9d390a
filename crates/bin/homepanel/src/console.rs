//! Line-oriented control panel.
//!
//! The console stands in for a dashboard: it parses one command per line,
//! calls a single engine operation, and renders the snapshots it gets back.
//! It holds no device state of its own.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use tokio::sync::broadcast::{self, error::TryRecvError};

use homepanel_app::action_log::LogFilter;
use homepanel_app::automation_engine::{AutomationEngine, SetOptions};
use homepanel_app::change_bus::InProcessChangeBus;
use homepanel_app::config::EngineConfig;
use homepanel_app::ports::{StateChange, SystemClock};
use homepanel_domain::action_log::ActionLogEntry;
use homepanel_domain::device::{Device, DeviceState, DeviceValue, ParseValueError};
use homepanel_domain::error::PanelError;
use homepanel_domain::id::{DeviceId, SCENE_SENTINEL};
use homepanel_domain::time::clock_time;

use crate::config::ConsoleConfig;

const HELP: &str = "\
commands:
  devices                      list devices and their status
  show <id>                    device details and recent actions
  toggle <id>                  flip a light or a lock
  set <id> <value> [--log|--no-log]
                               assign a value (on, off, locked, unlocked, or a number)
  scene <name>                 activate a scene
  scenes                       list scenes
  log [<id>|scene]             action log, most recent first
  json                         device snapshot as JSON
  help                         this text
  quit                         leave the console";

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Devices,
    Show(String),
    Toggle(String),
    Set {
        id: String,
        value: DeviceValue,
        log: Option<bool>,
    },
    Scene(String),
    Scenes,
    Log(Option<String>),
    Json,
    Help,
    Quit,
    Empty,
}

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type help for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Value(#[from] ParseValueError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(Self::Empty);
        };
        let rest: Vec<&str> = words.collect();

        match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("devices", []) => Ok(Self::Devices),
            ("show", [id]) => Ok(Self::Show((*id).to_string())),
            ("show", _) => Err(CommandError::Usage("show <id>")),
            ("toggle", [id]) => Ok(Self::Toggle((*id).to_string())),
            ("toggle", _) => Err(CommandError::Usage("toggle <id>")),
            ("set", [id, value, flags @ ..]) if flags.len() <= 1 => {
                let log = match flags {
                    [] => None,
                    ["--log"] => Some(true),
                    ["--no-log"] => Some(false),
                    _ => return Err(CommandError::Usage("set <id> <value> [--log|--no-log]")),
                };
                Ok(Self::Set {
                    id: (*id).to_string(),
                    value: value.parse()?,
                    log,
                })
            }
            ("set", _) => Err(CommandError::Usage("set <id> <value> [--log|--no-log]")),
            // Scene names may contain spaces.
            ("scene", words) if !words.is_empty() => Ok(Self::Scene(words.join(" "))),
            ("scene", _) => Err(CommandError::Usage("scene <name>")),
            ("scenes", []) => Ok(Self::Scenes),
            ("log", []) => Ok(Self::Log(None)),
            ("log", [target]) => Ok(Self::Log(Some((*target).to_string()))),
            ("json", []) => Ok(Self::Json),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit", _) => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

/// Status line shown next to a device.
#[must_use]
pub fn status_line(device: &Device) -> String {
    match device.state() {
        DeviceState::Light(s) => format!("Status: {s}"),
        DeviceState::Lock(s) => format!("Door: {s}"),
        state @ DeviceState::Thermostat(_) => format!("Set point: {state} \u{b0}C"),
        DeviceState::Fan(level) => format!("Fan speed: {level}"),
    }
}

fn log_line(entry: &ActionLogEntry) -> String {
    format!(
        "{}  {:<12} {} ({})",
        clock_time(&entry.timestamp),
        entry.target.to_string(),
        entry.action,
        entry.actor
    )
}

/// Errors produced while building a [`Console`].
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("change_buffer must be non-zero")]
    ZeroChangeBuffer,
    #[error(transparent)]
    Engine(#[from] PanelError),
}

/// Console bound to an engine that publishes on an in-process bus.
pub struct Console {
    engine: AutomationEngine<InProcessChangeBus>,
    changes: broadcast::Receiver<StateChange>,
    settings: ConsoleConfig,
}

impl Console {
    /// Build the engine and subscribe to its changes.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::ZeroChangeBuffer`] when the change channel
    /// has no capacity, and propagates engine construction errors.
    pub fn new(engine: &EngineConfig, settings: ConsoleConfig) -> Result<Self, ConsoleError> {
        if settings.change_buffer == 0 {
            return Err(ConsoleError::ZeroChangeBuffer);
        }
        let bus = InProcessChangeBus::new(settings.change_buffer);
        let changes = bus.subscribe();
        let engine = AutomationEngine::with_ports(engine, bus, SystemClock)?;
        Ok(Self {
            engine,
            changes,
            settings,
        })
    }

    #[must_use]
    pub fn engine(&self) -> &AutomationEngine<InProcessChangeBus> {
        &self.engine
    }

    /// Read commands until end of input or `quit`.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading input or writing output.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> io::Result<()> {
        write!(output, "{}", self.settings.prompt)?;
        output.flush()?;
        for line in input.lines() {
            let line = line?;
            let flow = self.execute(&line, output)?;
            self.drain_changes();
            if flow == Flow::Quit {
                break;
            }
            write!(output, "{}", self.settings.prompt)?;
            output.flush()?;
        }
        Ok(())
    }

    /// Parse and run one command line.
    ///
    /// Command and engine errors are written to `output`; only I/O errors
    /// are returned.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from writing output.
    pub fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> io::Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };
        tracing::debug!(?command, "running command");

        match command {
            Command::Empty => {}
            Command::Help => writeln!(output, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Devices => self.write_devices(output)?,
            Command::Show(id) => self.write_details(&id, output)?,
            Command::Toggle(id) => match self.engine.toggle(&id) {
                Ok(device) => writeln!(output, "{}: {}", device.id(), status_line(&device))?,
                Err(err) => writeln!(output, "error: {err}")?,
            },
            Command::Set { id, value, log } => {
                let options = SetOptions {
                    log: log.unwrap_or(self.settings.log_set_value),
                };
                match self.engine.set_value(&id, value, options) {
                    Ok(device) => writeln!(output, "{}: {}", device.id(), status_line(&device))?,
                    Err(err) => writeln!(output, "error: {err}")?,
                }
            }
            Command::Scene(name) => match self.engine.activate_scene(&name) {
                Ok(devices) => {
                    writeln!(output, "Activated {name} Scene")?;
                    for device in &devices {
                        writeln!(output, "  {}: {}", device.id(), status_line(device))?;
                    }
                }
                Err(err) => writeln!(output, "error: {err}")?,
            },
            Command::Scenes => self.write_scenes(output)?,
            Command::Log(target) => self.write_log(target.as_deref(), output)?,
            Command::Json => self.write_json(output)?,
        }
        Ok(Flow::Continue)
    }

    fn write_devices<W: Write>(&self, output: &mut W) -> io::Result<()> {
        for device in self.engine.list_devices() {
            writeln!(
                output,
                "{:<12} {:<20} {}",
                device.id().to_string(),
                device.name(),
                status_line(device)
            )?;
        }
        Ok(())
    }

    fn write_details<W: Write>(&self, id: &str, output: &mut W) -> io::Result<()> {
        let Some(device) = self.engine.get_device(id) else {
            return writeln!(output, "Device not found");
        };
        writeln!(output, "{} details", device.name())?;
        writeln!(output, "ID: {}", device.id())?;
        writeln!(output, "Type: {}", device.kind())?;
        writeln!(output, "State: {}", device.state())?;
        if !device.description().is_empty() {
            writeln!(output, "{}", device.description())?;
        }
        writeln!(output, "Recent actions")?;

        let query = self.engine.log(LogFilter::device(device.id().clone()));
        let mut any = false;
        for entry in &query {
            any = true;
            writeln!(
                output,
                "  {} - {} ({})",
                clock_time(&entry.timestamp),
                entry.action,
                entry.actor
            )?;
        }
        if !any {
            writeln!(output, "  (none)")?;
        }
        Ok(())
    }

    fn write_scenes<W: Write>(&self, output: &mut W) -> io::Result<()> {
        for scene in self.engine.scenes() {
            let targets: Vec<String> = scene
                .targets
                .iter()
                .map(|t| format!("{}={}", t.device, t.value))
                .collect();
            writeln!(output, "{}: {}", scene.name, targets.join(", "))?;
        }
        Ok(())
    }

    fn write_log<W: Write>(&self, target: Option<&str>, output: &mut W) -> io::Result<()> {
        let filter = match target {
            None => LogFilter::all(),
            Some(t) if t.eq_ignore_ascii_case(SCENE_SENTINEL) => LogFilter::scenes(),
            Some(t) => match DeviceId::new(t) {
                Ok(id) => LogFilter::device(id),
                Err(err) => return writeln!(output, "error: {err}"),
            },
        };
        for entry in self.engine.log(filter) {
            writeln!(output, "{}", log_line(entry))?;
        }
        Ok(())
    }

    fn write_json<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let devices: Vec<&Device> = self.engine.list_devices().collect();
        match serde_json::to_string_pretty(&devices) {
            Ok(json) => writeln!(output, "{json}"),
            Err(err) => writeln!(output, "error: {err}"),
        }
    }

    fn drain_changes(&mut self) {
        loop {
            match self.changes.try_recv() {
                Ok(change) => tracing::debug!(
                    devices = change.devices.len(),
                    logged = change.entry.is_some(),
                    "state change"
                ),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change notifications dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homepanel_domain::device::Discrete;

    fn console() -> Console {
        Console::new(&EngineConfig::default(), ConsoleConfig::default()).unwrap()
    }

    fn run(console: &mut Console, line: &str) -> String {
        let mut out = Vec::new();
        console.execute(line, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn should_parse_set_with_log_flag() {
        let command: Command = "set thermostat1 24.5 --log".parse().unwrap();
        assert_eq!(
            command,
            Command::Set {
                id: "thermostat1".to_string(),
                value: DeviceValue::Number(24.5),
                log: Some(true),
            }
        );
    }

    #[test]
    fn should_parse_set_without_flag() {
        let command: Command = "SET light1 on".parse().unwrap();
        assert_eq!(
            command,
            Command::Set {
                id: "light1".to_string(),
                value: DeviceValue::Discrete(Discrete::On),
                log: None,
            }
        );
    }

    #[test]
    fn should_reject_unknown_set_flag() {
        let result = "set light1 on --loud".parse::<Command>();
        assert!(matches!(result, Err(CommandError::Usage(_))));
    }

    #[test]
    fn should_report_bad_value() {
        let result = "set light1 dim".parse::<Command>();
        assert!(matches!(result, Err(CommandError::Value(_))));
    }

    #[test]
    fn should_parse_blank_line_as_empty() {
        assert_eq!("   ".parse::<Command>(), Ok(Command::Empty));
    }

    #[test]
    fn should_join_multi_word_scene_names() {
        assert_eq!(
            "scene Movie Night".parse::<Command>(),
            Ok(Command::Scene("Movie Night".to_string()))
        );
    }

    #[test]
    fn should_reject_unknown_command() {
        assert!(matches!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown(_))
        ));
    }

    #[test]
    fn should_render_status_lines_per_kind() {
        let console = console();
        let lines: Vec<_> = console.engine().list_devices().map(status_line).collect();
        assert_eq!(
            lines,
            [
                "Status: OFF",
                "Door: LOCKED",
                "Set point: 22.0 \u{b0}C",
                "Fan speed: 0"
            ]
        );
    }

    #[test]
    fn should_reject_zero_change_buffer() {
        let settings = ConsoleConfig {
            change_buffer: 0,
            ..ConsoleConfig::default()
        };
        let result = Console::new(&EngineConfig::default(), settings);
        assert!(matches!(result, Err(ConsoleError::ZeroChangeBuffer)));
    }

    #[test]
    fn should_report_engine_errors_when_building() {
        let mut config = EngineConfig::default();
        config.scenes.push(homepanel_domain::scene::Scene::new("Home"));
        let result = Console::new(&config, ConsoleConfig::default());
        assert!(matches!(result, Err(ConsoleError::Engine(_))));
    }

    #[test]
    fn should_print_toggled_state() {
        let mut console = console();
        assert_eq!(run(&mut console, "toggle light1"), "light1: Status: ON\n");
    }

    #[test]
    fn should_print_engine_errors_and_continue() {
        let mut console = console();
        let mut out = Vec::new();
        let flow = console.execute("toggle fan1", &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "error: toggle is not supported by fan device fan1\n"
        );
    }

    #[test]
    fn should_use_configured_default_for_set_logging() {
        let settings = ConsoleConfig {
            log_set_value: true,
            ..ConsoleConfig::default()
        };
        let mut console = Console::new(&EngineConfig::default(), settings).unwrap();
        run(&mut console, "set fan1 2");
        assert_eq!(
            console.engine().action_log().latest().unwrap().action,
            "Set to 2"
        );

        run(&mut console, "set fan1 3 --no-log");
        assert_eq!(console.engine().action_log().len(), 4);
    }

    #[test]
    fn should_show_device_details_with_history() {
        let mut console = console();
        let out = run(&mut console, "show light1");
        assert!(out.starts_with("Living Room Light details\n"));
        assert!(out.contains("Type: light\n"));
        assert!(out.contains(" - Turn OFF (User)\n"));
    }

    #[test]
    fn should_report_missing_device_in_details() {
        let mut console = console();
        assert_eq!(run(&mut console, "show nope"), "Device not found\n");
    }

    #[test]
    fn should_list_scene_targets() {
        let mut console = console();
        let out = run(&mut console, "scenes");
        assert!(out.contains("Night: light1=OFF, door1=LOCKED, fan1=1\n"));
    }

    #[test]
    fn should_print_json_snapshot() {
        let mut console = console();
        let out = run(&mut console, "json");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 4);
        assert_eq!(value[3]["id"], "fan1");
    }

    #[test]
    fn should_quit_on_exit() {
        let mut console = console();
        let mut out = Vec::new();
        assert_eq!(console.execute("exit", &mut out).unwrap(), Flow::Quit);
    }
}
