//! End-to-end parse/render coverage over captured gateway status lines.

use cgate_codec::{parse, render, Address, Command};

fn addr(text: &str) -> Address {
    Address::new(text)
}

#[test]
fn ramp_with_level_and_time() {
    let line =
        "lighting ramp //HOME/254/56/46 0 12 #sourceunit=6 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(cmd, Command::ramp(addr("//HOME/254/56/46"), 0, 12));
    assert_eq!(render(&cmd), "RAMP //HOME/254/56/46 0 12");
}

#[test]
fn ramp_with_percent_level_and_minutes() {
    let line = "lighting ramp //HOME/254/56/46 50% 12m #sourceunit=6 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(cmd, Command::ramp(addr("//HOME/254/56/46"), 128, 720));
    assert_eq!(render(&cmd), "RAMP //HOME/254/56/46 128 720");
}

#[test]
fn lighting_on() {
    let line =
        "lighting on //HOME/254/56/3  #sourceunit=6 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(cmd, Command::on(addr("//HOME/254/56/3")));
    assert_eq!(render(&cmd), "RAMP //HOME/254/56/3 255 0");
}

#[test]
fn short_on_without_lighting_keyword() {
    let cmd = parse("on //HOME/254/56/3").unwrap().unwrap();
    assert_eq!(cmd, Command::on(addr("//HOME/254/56/3")));
    assert_eq!(render(&cmd), "RAMP //HOME/254/56/3 255 0");
}

#[test]
fn lighting_off() {
    let line =
        "lighting off //HOME/254/56/45  #sourceunit=6 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(cmd, Command::off(addr("//HOME/254/56/45")));
    assert_eq!(render(&cmd), "RAMP //HOME/254/56/45 0 0");
}

#[test]
fn trigger_event() {
    let line =
        "trigger event //HOME/254/202/13 3 #sourceunit=6 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(
        cmd,
        Command::Trigger {
            address: addr("//HOME/254/202/13"),
            level: 3,
        }
    );
    assert_eq!(render(&cmd), "TRIGGER EVENT //HOME/254/202/13 3");
}

#[test]
fn zone_sealed() {
    let line = "# security zone_sealed //HOME/254/208/2  #sourceunit=20 OID=";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(
        cmd,
        Command::ZoneSealed {
            address: addr("//HOME/254/208/2"),
            level: 255,
        }
    );
    assert_eq!(render(&cmd), "# security zone_sealed //HOME/254/208/2");
}

#[test]
fn zone_unsealed() {
    let line = "# security zone_unsealed //HOME/254/208/2  #sourceunit=20 OID=";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(
        cmd,
        Command::ZoneSealed {
            address: addr("//HOME/254/208/2"),
            level: 0,
        }
    );
    assert_eq!(render(&cmd), "# security zone_unsealed //HOME/254/208/2");
}

#[test]
fn system_arm_with_arm_type() {
    let line =
        "# security system_arm //HOME/254/208 1 #sourceunit=20 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(
        cmd,
        Command::SystemArmed {
            address: addr("//HOME/254/208"),
            level: 1,
        }
    );
    assert_eq!(render(&cmd), "# security system_arm //HOME/254/208 1");

    let line =
        "# security system_arm //HOME/254/208 0 #sourceunit=20 OID=00000000-0000-0000-0000-000000000000";
    let cmd = parse(line).unwrap().unwrap();
    assert_eq!(
        cmd,
        Command::SystemArmed {
            address: addr("//HOME/254/208"),
            level: 0,
        }
    );
}

#[test]
fn bad_message_is_a_grammar_error() {
    assert!(parse("a bad message").is_err());
}

#[test]
fn unmapped_hash_lines_parse_to_nothing() {
    let line =
        "# trigger min //HOME/254/202/38  #sourceunit=20 OID=00000000-0000-0000-0000-000000000000";
    assert_eq!(parse(line).unwrap(), None);
}

#[test]
fn recognized_security_events_without_a_mapping() {
    assert_eq!(
        parse("# security arm_ready //HOME/254/208  #sourceunit=20 OID=").unwrap(),
        None
    );
    assert_eq!(
        parse("# security arm_not_ready //HOME/254/208/2").unwrap(),
        None
    );
    assert_eq!(
        parse("# security exit_delay_started //HOME/254/208").unwrap(),
        None
    );
    assert_eq!(
        parse("# security entry_delay_started //HOME/254/208").unwrap(),
        None
    );
}

#[test]
fn bare_comment_lines_parse_to_nothing() {
    assert_eq!(parse("# lighting on the porch").unwrap(), None);
    assert_eq!(parse("#").unwrap(), None);
}

#[test]
fn keywords_are_case_insensitive() {
    let cmd = parse("LIGHTING RAMP //HOME/254/56/46 50% 12m").unwrap().unwrap();
    assert_eq!(cmd, Command::ramp(addr("//HOME/254/56/46"), 128, 720));

    let cmd = parse("ON //HOME/254/56/3").unwrap().unwrap();
    assert_eq!(cmd, Command::on(addr("//HOME/254/56/3")));
}

#[test]
fn unit_suffixes_are_case_sensitive_literals() {
    // Keywords are case-insensitive; the s/m time suffixes are not.
    assert!(parse("lighting ramp //HOME/254/56/46 50% 12M").is_err());
}

#[test]
fn command_then_trailing_comment_without_space() {
    let cmd = parse("on //HOME/254/56/3#sourceunit=6").unwrap().unwrap();
    assert_eq!(cmd, Command::on(addr("//HOME/254/56/3")));
}

#[test]
fn named_addresses_parse_verbatim() {
    let cmd = parse("ramp kitchen 50%").unwrap().unwrap();
    assert_eq!(cmd, Command::ramp(addr("kitchen"), 128, 0));
}
