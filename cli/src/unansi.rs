//! `unansi`: strip ANSI escape sequences from stdin.

use std::io::{Read, Write};
use std::sync::LazyLock;

use cmdtree_core::Command;
use regex::bytes::Regex;

/// CSI sequences (colours, cursor movement) and OSC sequences (titles,
/// hyperlinks) terminated by BEL or ST.
static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)")
        .expect("static regex must compile")
});

pub fn command() -> Command {
    Command::new("unansi")
        .with_description("Copy stdin to stdout without ANSI escape sequences")
        .with_run(|mut ctx| {
            let mut input = Vec::new();
            ctx.input.read_to_end(&mut input)?;
            ctx.out.write_all(&strip_ansi(&input))?;
            Ok(())
        })
}

pub fn strip_ansi(input: &[u8]) -> Vec<u8> {
    ANSI_RE.replace_all(input, &b""[..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_colours() {
        let input = b"\x1b[1;31merror\x1b[0m: \x1b[4mbad\x1b[24m";
        assert_eq!(strip_ansi(input), b"error: bad");
    }

    #[test]
    fn test_strips_osc_hyperlink() {
        let input = b"\x1b]8;;https://example.com\x07link\x1b]8;;\x1b\\ done";
        assert_eq!(strip_ansi(input), b"link done");
    }

    #[test]
    fn test_plain_and_binary_input_pass_through() {
        assert_eq!(strip_ansi(b"plain text\n"), b"plain text\n");
        assert_eq!(strip_ansi(b"\xff\xfe\x1b[2Kx"), b"\xff\xfex");
    }
}
