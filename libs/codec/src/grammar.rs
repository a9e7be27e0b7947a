//! Line grammar and command transformer.
//!
//! One status line is recognized as exactly one of command, security event or
//! comment, with trailing-comment tolerance:
//!
//! ```text
//! line     = (command / security_event / comment)? _? comment?
//! command  = lighting_cmd / short_cmd / trigger_event
//! ```
//!
//! The rules build typed [`Command`] values directly while matching; there is
//! no intermediate parse tree. Security sub-events that the front end does not
//! model (`arm_ready`, `arm_not_ready`, `exit_delay_started`,
//! `entry_delay_started`) are still syntax-checked, then dropped: the line
//! parses to no command at all, which is distinct from a grammar failure.

use crate::address::{application_address_text, group_address_text, object_identifier};
use crate::error::GrammarError;
use crate::scan::Scanner;
use cgate_types::{Address, Command, LEVEL_MAX};
use tracing::trace;

/// Parse one status line.
///
/// Returns `Ok(Some(command))` for the mapped command and security-event
/// forms, `Ok(None)` for lines that match the grammar but carry no command
/// (comments, blank lines, recognized-but-unmapped security events), and
/// [`GrammarError`] when no alternative matches the whole line.
///
/// The parser is pure and holds no state across calls; it is safe to invoke
/// concurrently on independent inputs.
///
/// # Examples
/// ```
/// use cgate_codec::parse;
///
/// let cmd = parse("lighting on //HOME/254/56/3")?.expect("mapped command");
/// assert_eq!(cmd.to_string(), "RAMP //HOME/254/56/3 255 0");
/// assert_eq!(parse("# sourceunit=6")?, None);
/// # Ok::<(), cgate_codec::GrammarError>(())
/// ```
pub fn parse(line: &str) -> Result<Option<Command>, GrammarError> {
    let mut s = Scanner::new(line);
    let command = line_body(&mut s);
    s.skip_space();
    let mark = s.pos();
    if !comment(&mut s) {
        s.reset(mark);
    }
    if !s.at_end() {
        return Err(GrammarError { offset: s.pos() });
    }
    trace!(line, mapped = command.is_some(), "status line matched");
    Ok(command)
}

/// `(command / security_event / comment)?` — the scanner position after a
/// `None` return tells the caller whether anything matched.
fn line_body(s: &mut Scanner<'_>) -> Option<Command> {
    let start = s.pos();
    if let Some(command) = command(s) {
        return Some(command);
    }
    s.reset(start);
    if let Some(event) = security_event(s) {
        return event;
    }
    s.reset(start);
    if comment(s) {
        return None;
    }
    s.reset(start);
    None
}

fn command(s: &mut Scanner<'_>) -> Option<Command> {
    let start = s.pos();
    // lighting_cmd
    if s.eat_keyword("lighting") && s.eat_space() {
        if let Some(command) = lighting_sub_cmd(s) {
            return Some(command);
        }
    }
    s.reset(start);
    // short_cmd: the "lighting" keyword omitted
    if let Some(command) = lighting_sub_cmd(s) {
        return Some(command);
    }
    s.reset(start);
    if let Some(command) = trigger_event(s) {
        return Some(command);
    }
    s.reset(start);
    None
}

fn lighting_sub_cmd(s: &mut Scanner<'_>) -> Option<Command> {
    let start = s.pos();
    if let Some(command) = ramp_cmd(s) {
        return Some(command);
    }
    s.reset(start);
    if let Some(command) = on_cmd(s) {
        return Some(command);
    }
    s.reset(start);
    if let Some(command) = off_cmd(s) {
        return Some(command);
    }
    s.reset(start);
    None
}

/// `ramp` address level (time ("force")?)? — a missing time defaults to 0.
fn ramp_cmd(s: &mut Scanner<'_>) -> Option<Command> {
    if !(s.eat_keyword("ramp") && s.eat_space()) {
        return None;
    }
    let address = object_identifier(s)?;
    if !s.eat_space() {
        return None;
    }
    let level = level_token(s)?;
    let mut time = 0;
    let mark = s.pos();
    if s.eat_space() {
        if let Some(value) = time_token(s) {
            time = value;
            opt_force(s);
        } else {
            s.reset(mark);
        }
    } else {
        s.reset(mark);
    }
    Some(Command::ramp(Address::new(address), level, time))
}

fn on_cmd(s: &mut Scanner<'_>) -> Option<Command> {
    if !(s.eat_keyword("on") && s.eat_space()) {
        return None;
    }
    let address = object_identifier(s)?;
    opt_force(s);
    Some(Command::on(Address::new(address)))
}

fn off_cmd(s: &mut Scanner<'_>) -> Option<Command> {
    if !(s.eat_keyword("off") && s.eat_space()) {
        return None;
    }
    let address = object_identifier(s)?;
    opt_force(s);
    Some(Command::off(Address::new(address)))
}

/// The `force` flag is accepted on the wire but has no effect on the decoded
/// command; only the session layer cares about forcing.
fn opt_force(s: &mut Scanner<'_>) {
    let mark = s.pos();
    if !(s.eat_space() && s.eat_literal(b"force")) {
        s.reset(mark);
    }
}

fn trigger_event(s: &mut Scanner<'_>) -> Option<Command> {
    if !(s.eat_keyword("trigger")
        && s.eat_space()
        && s.eat_keyword("event")
        && s.eat_space())
    {
        return None;
    }
    let address = group_address_text(s)?;
    if !s.eat_space() {
        return None;
    }
    let level = level_token(s)?;
    Some(Command::Trigger {
        address: Address::new(address),
        level,
    })
}

/// `"#" security sub_event`. `Some(None)` is a successful match of an
/// unmapped event kind; `None` means the rule did not match at all.
fn security_event(s: &mut Scanner<'_>) -> Option<Option<Command>> {
    let start = s.pos();
    if !(s.eat_byte(b'#') && s.eat_space() && s.eat_keyword("security") && s.eat_space()) {
        s.reset(start);
        return None;
    }
    if let Some(event) = security_sub_event(s) {
        Some(event)
    } else {
        s.reset(start);
        None
    }
}

fn security_sub_event(s: &mut Scanner<'_>) -> Option<Option<Command>> {
    let start = s.pos();
    if s.eat_keyword("zone_sealed") && s.eat_space() {
        if let Some(address) = group_address_text(s) {
            return Some(Some(Command::ZoneSealed {
                address: Address::new(address),
                level: LEVEL_MAX,
            }));
        }
    }
    s.reset(start);
    if s.eat_keyword("zone_unsealed") && s.eat_space() {
        if let Some(address) = group_address_text(s) {
            return Some(Some(Command::ZoneSealed {
                address: Address::new(address),
                level: 0,
            }));
        }
    }
    s.reset(start);
    // Recognized, intentionally unmapped: the address form is still checked.
    if s.eat_keyword("arm_ready") && s.eat_space() && application_address_text(s).is_some() {
        return Some(None);
    }
    s.reset(start);
    if s.eat_keyword("arm_not_ready") && s.eat_space() && group_address_text(s).is_some() {
        return Some(None);
    }
    s.reset(start);
    if s.eat_keyword("exit_delay_started")
        && s.eat_space()
        && application_address_text(s).is_some()
    {
        return Some(None);
    }
    s.reset(start);
    if s.eat_keyword("entry_delay_started")
        && s.eat_space()
        && application_address_text(s).is_some()
    {
        return Some(None);
    }
    s.reset(start);
    if s.eat_keyword("system_arm") && s.eat_space() {
        if let Some(address) = application_address_text(s) {
            if s.eat_space() {
                if let Some(arm_type) = arm_type(s) {
                    return Some(Some(Command::SystemArmed {
                        address: Address::new(address),
                        level: arm_type,
                    }));
                }
            }
        }
    }
    s.reset(start);
    None
}

/// `"#"` followed by anything up to the end of the line.
fn comment(s: &mut Scanner<'_>) -> bool {
    if !s.eat_byte(b'#') {
        return false;
    }
    s.eat_to_line_end();
    true
}

/// 1-3 digits, optionally `%`: a literal level 0-999, or a percentage scaled
/// to the 0-255 range.
fn level_token(s: &mut Scanner<'_>) -> Option<u16> {
    let digits = s.eat_digits(3)?;
    let value = digits_value(digits);
    if s.eat_byte(b'%') {
        Some(percent_to_level(value))
    } else {
        Some(value as u16)
    }
}

/// 1-2 digits with an optional unit: `s` for seconds (the default), `m` for
/// minutes.
fn time_token(s: &mut Scanner<'_>) -> Option<u32> {
    let digits = s.eat_digits(2)?;
    let value = digits_value(digits);
    if s.eat_byte(b's') {
        Some(value)
    } else if s.eat_byte(b'm') {
        Some(value * 60)
    } else {
        Some(value)
    }
}

fn arm_type(s: &mut Scanner<'_>) -> Option<u16> {
    let digits = s.eat_digits(3)?;
    Some(digits_value(digits) as u16)
}

/// floor(percent / 100 × 256), clamped to the level ceiling. The 1-3 digit
/// lexical rule is the only range guard, so "999%" is accepted and clamps.
fn percent_to_level(percent: u32) -> u16 {
    (percent * (u32::from(LEVEL_MAX) + 1) / 100).min(u32::from(LEVEL_MAX)) as u16
}

fn digits_value(digits: &str) -> u32 {
    digits
        .bytes()
        .fold(0, |value, b| value * 10 + u32::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_scaling_boundaries() {
        assert_eq!(percent_to_level(0), 0);
        assert_eq!(percent_to_level(50), 128);
        assert_eq!(percent_to_level(100), 255); // 256 clamped
        assert_eq!(percent_to_level(999), 255);
        assert_eq!(percent_to_level(1), 2); // floor(0.01 * 256)
    }

    #[test]
    fn time_units() {
        let mut s = Scanner::new("12");
        assert_eq!(time_token(&mut s), Some(12));
        let mut s = Scanner::new("12s");
        assert_eq!(time_token(&mut s), Some(12));
        let mut s = Scanner::new("12m");
        assert_eq!(time_token(&mut s), Some(720));
    }

    #[test]
    fn level_token_literal_and_percent() {
        let mut s = Scanner::new("300");
        assert_eq!(level_token(&mut s), Some(300));
        let mut s = Scanner::new("50%");
        assert_eq!(level_token(&mut s), Some(128));
    }

    #[test]
    fn ramp_time_defaults_to_zero() {
        let cmd = parse("ramp //HOME/254/56/46 50%").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::ramp(Address::new("//HOME/254/56/46"), 128, 0)
        );
    }

    #[test]
    fn force_flag_is_accepted_and_dropped() {
        let with = parse("on //HOME/254/56/3 force").unwrap().unwrap();
        let without = parse("on //HOME/254/56/3").unwrap().unwrap();
        assert_eq!(with, without);

        let cmd = parse("lighting ramp //HOME/254/56/46 50% 12 force")
            .unwrap()
            .unwrap();
        assert_eq!(
            cmd,
            Command::ramp(Address::new("//HOME/254/56/46"), 128, 12)
        );
    }

    #[test]
    fn four_digit_level_is_a_grammar_failure() {
        assert!(parse("lighting ramp //HOME/254/56/46 1234 5").is_err());
    }

    #[test]
    fn missing_level_is_a_grammar_failure() {
        assert!(parse("ramp //HOME/254/56/46").is_err());
    }

    #[test]
    fn trigger_needs_a_group_address() {
        // Two components are an application address, not a group.
        assert!(parse("trigger event //HOME/254/202 3").is_err());
    }

    #[test]
    fn malformed_security_event_falls_back_to_comment() {
        // system_arm without an arm type fails the sub-event rule; the whole
        // "#..." line is then swallowed as a comment.
        assert_eq!(parse("# security system_arm //HOME/254/208").unwrap(), None);
    }

    #[test]
    fn blank_lines_carry_no_command() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn error_reports_the_unmatched_offset() {
        let err = parse("a bad message").unwrap_err();
        assert_eq!(err.offset, 0);
        // The matched ramp prefix ends before the stray third digit.
        let err = parse("ramp //HOME/254/56/46 0 123").unwrap_err();
        assert_eq!(err.offset, 26);
    }
}
