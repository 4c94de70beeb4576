//! Unit tests for operator command parsing.

use stepper_position::config::MotorDefaults;
use stepper_position::{Command, CommandError};

/// Test that verbs are case-insensitive and whitespace is ignored.
#[test]
fn test_case_and_whitespace() {
    let bounds = MotorDefaults::default();
    assert_eq!(Command::parse("GoTo   42", &bounds), Ok(Command::Goto(42)));
    assert_eq!(Command::parse("\tSTOP\n", &bounds), Ok(Command::Stop));
    assert_eq!(Command::parse("Nudge -3", &bounds), Ok(Command::Nudge(-3)));
}

/// Test that the speed bounds come from the configuration.
#[test]
fn test_speed_bounds() {
    let bounds = MotorDefaults::default();
    assert_eq!(Command::parse("speed 1", &bounds), Ok(Command::Speed(1)));
    assert_eq!(
        Command::parse("speed 0", &bounds),
        Err(CommandError::SpeedOutOfRange {
            speed: 0,
            min: 1,
            max: 600
        })
    );
    assert_eq!(
        Command::parse("speed 601", &bounds),
        Err(CommandError::SpeedOutOfRange {
            speed: 601,
            min: 1,
            max: 600
        })
    );
}

/// Test that a zero limit is accepted and negative targets are not validated.
#[test]
fn test_unbounded_arguments() {
    let bounds = MotorDefaults::default();
    assert_eq!(Command::parse("limit 0", &bounds), Ok(Command::Limit(0)));
    assert_eq!(
        Command::parse("goto -9223372036854775808", &bounds),
        Ok(Command::Goto(i64::MIN))
    );
}

/// Test verb aliases.
#[test]
fn test_aliases() {
    let bounds = MotorDefaults::default();
    assert_eq!(Command::parse("position 7", &bounds), Ok(Command::Goto(7)));
    assert_eq!(Command::parse("max 900", &bounds), Ok(Command::Limit(900)));
    assert_eq!(
        Command::parse("stepsperrot 512", &bounds),
        Ok(Command::StepsPerRotation(512))
    );
}
