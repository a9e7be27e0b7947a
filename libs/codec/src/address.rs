//! Hierarchical bus-address grammar.
//!
//! Addresses come out of the parser as verbatim text; nothing here interprets
//! the components. Rules mirror the gateway's addressing forms:
//!
//! ```text
//! object_identifier   = name / group_address / application_address
//!                     / network_address / physical_address / project_address
//! project_prefix      = "//" project_name "/"
//! network_name        = digits / name
//! application_address = (project_prefix / "/")? network_name
//!                       (("/" application_number) / "//")
//! group_address       = application_address "/" numeric
//! physical_address    = (project_prefix / "/")+ "p" "/" network_name
//!                       "/" numeric ("/" numeric)?
//! numeric             = digits / "$" hex / "*"
//! ```
//!
//! Ordered choice throughout: the first alternative that matches wins, even
//! when a later one would have matched more text.

use crate::scan::Scanner;

/// Any addressable object, first-match-wins across the address forms.
pub(crate) fn object_identifier<'a>(s: &mut Scanner<'a>) -> Option<&'a str> {
    let start = s.pos();
    let alternatives: [for<'b> fn(&mut Scanner<'b>) -> bool; 6] = [
        name,
        group_address,
        application_address,
        network_address,
        physical_address,
        project_address,
    ];
    for alternative in alternatives {
        if alternative(s) {
            return Some(s.slice_from(start));
        }
        s.reset(start);
    }
    None
}

pub(crate) fn group_address_text<'a>(s: &mut Scanner<'a>) -> Option<&'a str> {
    let start = s.pos();
    if group_address(s) {
        Some(s.slice_from(start))
    } else {
        s.reset(start);
        None
    }
}

pub(crate) fn application_address_text<'a>(s: &mut Scanner<'a>) -> Option<&'a str> {
    let start = s.pos();
    if application_address(s) {
        Some(s.slice_from(start))
    } else {
        s.reset(start);
        None
    }
}

/// Letter followed by letters, digits and a restricted punctuation set
/// (notably excluding `$ , - . / : ~` and whitespace).
fn name(s: &mut Scanner<'_>) -> bool {
    if !s.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    s.bump();
    while s.peek().is_some_and(is_name_continue) {
        s.bump();
    }
    true
}

fn is_name_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, 0x21..=0x23 | 0x25..=0x2b | 0x3b..=0x40 | 0x5b..=0x60 | 0x7b..=0x7d)
}

/// `"//" project_name "/"` where a project name is 1-8 word characters.
fn project_prefix(s: &mut Scanner<'_>) -> bool {
    let start = s.pos();
    if s.eat_literal(b"//") && s.eat_project_name() && s.eat_byte(b'/') {
        true
    } else {
        s.reset(start);
        false
    }
}

fn prefix_or_slash(s: &mut Scanner<'_>) -> bool {
    if project_prefix(s) {
        return true;
    }
    s.eat_byte(b'/')
}

fn network_name(s: &mut Scanner<'_>) -> bool {
    if s.eat_digits1() {
        return true;
    }
    name(s)
}

/// Digits, `$`-prefixed hex, or the `*` wildcard.
fn numeric_address(s: &mut Scanner<'_>) -> bool {
    if s.eat_digits1() {
        return true;
    }
    let start = s.pos();
    if s.eat_byte(b'$') {
        if s.eat_hex_digits1() {
            return true;
        }
        s.reset(start);
    }
    s.eat_byte(b'*')
}

fn application_number(s: &mut Scanner<'_>) -> bool {
    numeric_address(s) || s.eat_byte(b'~')
}

fn application_address(s: &mut Scanner<'_>) -> bool {
    let start = s.pos();
    let mark = s.pos();
    if !prefix_or_slash(s) {
        s.reset(mark);
    }
    if !network_name(s) {
        s.reset(start);
        return false;
    }
    // ("/" application_number) / "//" — the literal "//" suffix means
    // "no application number".
    let tail = s.pos();
    if s.eat_byte(b'/') && application_number(s) {
        return true;
    }
    s.reset(tail);
    if s.eat_literal(b"//") {
        return true;
    }
    s.reset(start);
    false
}

fn group_address(s: &mut Scanner<'_>) -> bool {
    let start = s.pos();
    if application_address(s) && s.eat_byte(b'/') && numeric_address(s) {
        true
    } else {
        s.reset(start);
        false
    }
}

fn network_address(s: &mut Scanner<'_>) -> bool {
    let start = s.pos();
    let mark = s.pos();
    if !prefix_or_slash(s) {
        s.reset(mark);
    }
    if network_name(s) {
        true
    } else {
        s.reset(start);
        false
    }
}

fn physical_address(s: &mut Scanner<'_>) -> bool {
    let start = s.pos();
    let mut prefixes = 0;
    loop {
        let mark = s.pos();
        if prefix_or_slash(s) {
            prefixes += 1;
        } else {
            s.reset(mark);
            break;
        }
    }
    if prefixes == 0 {
        s.reset(start);
        return false;
    }
    if s.eat_byte(b'p')
        && s.eat_byte(b'/')
        && network_name(s)
        && s.eat_byte(b'/')
        && numeric_address(s)
    {
        let mark = s.pos();
        if !(s.eat_byte(b'/') && numeric_address(s)) {
            s.reset(mark);
        }
        true
    } else {
        s.reset(start);
        false
    }
}

fn project_address(s: &mut Scanner<'_>) -> bool {
    let start = s.pos();
    if s.eat_literal(b"//") && s.eat_project_name() {
        true
    } else {
        s.reset(start);
        false
    }
}
