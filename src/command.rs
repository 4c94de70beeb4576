//! Text command ingress.
//!
//! Parses operator lines such as `goto 1200` or `speed 300`, validates the
//! arguments against the configured bounds, and applies them to a
//! [`MotionController`]. The controller itself does not re-validate.

use core::str::FromStr;

use serde::Serialize;

use crate::config::MotorDefaults;
use crate::controller::{LogEntry, MotionController, Snapshot};
use crate::error::CommandError;
use crate::persistence::StateStore;
use crate::sequencer::CoilDriver;

/// One operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Go to an absolute position.
    Goto(i64),
    /// Move the target by a relative amount.
    Nudge(i64),
    /// Emergency stop.
    Stop,
    /// Change speed.
    Speed(i32),
    /// Reset position to zero.
    Zero,
    /// Change the travel limit.
    Limit(i64),
    /// Change steps per rotation.
    StepsPerRotation(i64),
    /// Report a snapshot.
    Status,
    /// Report recorded motion events.
    History,
}

/// Response to a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Command accepted.
    Ack {
        /// Always "success".
        status: &'static str,
        /// Human-readable summary.
        message: String,
    },
    /// Current status.
    Status(Snapshot),
    /// Recorded events.
    History(Vec<LogEntry>),
    /// Command refused before reaching the controller.
    Rejected {
        /// Always "error".
        status: &'static str,
        /// Why the command was refused.
        message: String,
    },
}

impl Reply {
    fn ack(message: String) -> Self {
        Reply::Ack {
            status: "success",
            message,
        }
    }

    /// Reply for a command that failed to parse or validate.
    pub fn rejected(error: &CommandError) -> Self {
        Reply::Rejected {
            status: "error",
            message: error.to_string(),
        }
    }
}

fn int_arg<T: FromStr>(verb: &'static str, arg: Option<&str>) -> Result<T, CommandError> {
    let raw = arg.ok_or(CommandError::MissingArgument(verb))?;
    raw.parse()
        .map_err(|_| CommandError::InvalidInteger(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parse without range checks; see [`Command::validate`].
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;
        let arg = words.next();

        let (command, name) = match verb.to_ascii_lowercase().as_str() {
            "goto" | "position" => (Command::Goto(int_arg("goto", arg)?), "goto"),
            "nudge" => (Command::Nudge(int_arg("nudge", arg)?), "nudge"),
            "speed" => (Command::Speed(int_arg("speed", arg)?), "speed"),
            "limit" | "max" => (Command::Limit(int_arg("limit", arg)?), "limit"),
            "spr" | "stepsperrot" => (Command::StepsPerRotation(int_arg("spr", arg)?), "spr"),
            "stop" => return no_args(Command::Stop, "stop", arg),
            "zero" => return no_args(Command::Zero, "zero", arg),
            "status" => return no_args(Command::Status, "status", arg),
            "history" => return no_args(Command::History, "history", arg),
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };

        if words.next().is_some() {
            return Err(CommandError::UnexpectedArgument(name));
        }
        Ok(command)
    }
}

fn no_args(command: Command, name: &'static str, arg: Option<&str>) -> Result<Command, CommandError> {
    match arg {
        Some(_) => Err(CommandError::UnexpectedArgument(name)),
        None => Ok(command),
    }
}

impl Command {
    /// Parse and validate in one go.
    pub fn parse(line: &str, bounds: &MotorDefaults) -> Result<Self, CommandError> {
        let command: Command = line.parse()?;
        command.validate(bounds)?;
        Ok(command)
    }

    /// Reject arguments outside the accepted ranges.
    pub fn validate(&self, bounds: &MotorDefaults) -> Result<(), CommandError> {
        match *self {
            Command::Speed(speed) if !bounds.accepts_speed(speed) => {
                Err(CommandError::SpeedOutOfRange {
                    speed,
                    min: bounds.min_speed,
                    max: bounds.max_speed,
                })
            }
            Command::Limit(limit) if limit < 0 => Err(CommandError::NegativeLimit(limit)),
            Command::StepsPerRotation(steps) if steps <= 0 => {
                Err(CommandError::InvalidStepsPerRotation(steps))
            }
            _ => Ok(()),
        }
    }

    /// Invoke the matching controller operation.
    pub fn apply<C, S>(&self, controller: &MotionController<C, S>) -> Reply
    where
        C: CoilDriver + Send + 'static,
        S: StateStore + 'static,
    {
        match *self {
            Command::Goto(position) => {
                controller.set_target(position);
                Reply::ack(format!("Going to {position}"))
            }
            Command::Nudge(steps) => {
                controller.nudge(steps);
                Reply::ack(format!("Nudging {steps}"))
            }
            Command::Stop => {
                controller.stop();
                Reply::ack("Motor stopped".to_string())
            }
            Command::Speed(speed) => {
                controller.set_speed(speed);
                Reply::ack(format!("Speed set to {speed}"))
            }
            Command::Zero => {
                controller.zero();
                Reply::ack("Position reset to 0".to_string())
            }
            Command::Limit(limit) => {
                controller.set_travel_limit(limit);
                Reply::ack(format!("Max limit set to {limit}"))
            }
            Command::StepsPerRotation(steps) => {
                controller.set_steps_per_rotation(steps);
                Reply::ack(format!("Steps/Rot set to {steps}"))
            }
            Command::Status => Reply::Status(controller.snapshot()),
            Command::History => Reply::History(controller.history()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use crate::persistence::{MemoryStateStore, PersistedState};
    use crate::sequencer::SimulatedCoils;

    #[test]
    fn test_parse_verbs() {
        assert_eq!("goto -250".parse(), Ok(Command::Goto(-250)));
        assert_eq!("POSITION 10".parse(), Ok(Command::Goto(10)));
        assert_eq!("nudge 5".parse(), Ok(Command::Nudge(5)));
        assert_eq!("  stop ".parse(), Ok(Command::Stop));
        assert_eq!("speed 300".parse(), Ok(Command::Speed(300)));
        assert_eq!("zero".parse(), Ok(Command::Zero));
        assert_eq!("limit 800".parse(), Ok(Command::Limit(800)));
        assert_eq!("spr 2048".parse(), Ok(Command::StepsPerRotation(2048)));
        assert_eq!("status".parse(), Ok(Command::Status));
        assert_eq!("history".parse(), Ok(Command::History));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "jump 3".parse::<Command>(),
            Err(CommandError::Unknown("jump".into()))
        );
        assert_eq!(
            "goto".parse::<Command>(),
            Err(CommandError::MissingArgument("goto"))
        );
        assert_eq!(
            "nudge 1.5".parse::<Command>(),
            Err(CommandError::InvalidInteger("1.5".into()))
        );
        assert_eq!(
            "stop now".parse::<Command>(),
            Err(CommandError::UnexpectedArgument("stop"))
        );
        assert_eq!(
            "speed 10 20".parse::<Command>(),
            Err(CommandError::UnexpectedArgument("speed"))
        );
        assert_eq!(
            "speed 99999999999".parse::<Command>(),
            Err(CommandError::InvalidInteger("99999999999".into()))
        );
    }

    #[test]
    fn test_validation_uses_bounds() {
        let bounds = MotorDefaults {
            min_speed: 50,
            ..MotorDefaults::default()
        };
        assert_eq!(
            Command::parse("speed 10", &bounds),
            Err(CommandError::SpeedOutOfRange {
                speed: 10,
                min: 50,
                max: 600
            })
        );
        assert_eq!(Command::parse("speed 600", &bounds), Ok(Command::Speed(600)));
        assert_eq!(
            Command::parse("limit -1", &bounds),
            Err(CommandError::NegativeLimit(-1))
        );
        assert_eq!(
            Command::parse("spr 0", &bounds),
            Err(CommandError::InvalidStepsPerRotation(0))
        );
        assert_eq!(Command::parse("goto -99999", &bounds), Ok(Command::Goto(-99999)));
    }

    #[test]
    fn test_apply_reaches_controller() {
        let store = MemoryStateStore::with_state(
            PersistedState {
                position: 0,
                max_limit: 100,
                steps_per_rot: 4096,
                speed: 250,
            },
            MotorDefaults::default(),
        );
        let (controller, _loop) =
            MotionController::new(SimulatedCoils::new(), store.clone(), TimingConfig::default());

        let reply = Command::Goto(40).apply(&controller);
        assert_eq!(
            reply,
            Reply::Ack {
                status: "success",
                message: "Going to 40".into()
            }
        );
        Command::Speed(123).apply(&controller);
        Command::Limit(90).apply(&controller);

        match Command::Status.apply(&controller) {
            Reply::Status(snap) => {
                assert_eq!(snap.target, 40);
                assert_eq!(snap.speed, 123);
                assert_eq!(snap.limit, 90);
            }
            other => panic!("unexpected reply {other:?}"),
        }
        assert_eq!(store.current().map(|s| s.max_limit), Some(90));

        match Command::History.apply(&controller) {
            Reply::History(entries) => assert_eq!(entries.len(), 3),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn test_ack_json_shape() {
        let json = serde_json::to_value(Reply::ack("Nudging 5".into())).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Nudging 5");

        let json = serde_json::to_value(Reply::rejected(&CommandError::Empty)).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json["message"].is_string());
    }
}
