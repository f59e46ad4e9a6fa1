//! Token grammar shared by extraction and completion.

use cmdtree_core::O;

/// Classification of a single command-line token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'t> {
    /// `-x`
    Short(&'t str),
    /// `--name`
    Long(&'t str),
    /// `-x=value` or `--name=value`; the value is everything after the first `=`.
    Assign(&'t str, &'t str),
    /// `--`, ends option processing.
    Terminator,
    /// Anything else: plain words, `-` and the empty token.
    Positional,
}

impl<'t> Token<'t> {
    /// Name the token refers to, for flag-shaped tokens.
    pub(crate) fn name(&self) -> Option<&'t str> {
        match *self {
            Token::Short(name) | Token::Long(name) | Token::Assign(name, _) => Some(name),
            Token::Terminator | Token::Positional => None,
        }
    }
}

pub(crate) fn classify(token: &str) -> Token<'_> {
    if token == "--" {
        return Token::Terminator;
    }
    if let Some(rest) = token.strip_prefix("--") {
        return match rest.split_once('=') {
            Some((name, value)) => Token::Assign(name, value),
            None => Token::Long(rest),
        };
    }
    if let Some(rest) = token.strip_prefix('-') {
        if rest.is_empty() {
            return Token::Positional;
        }
        return match rest.split_once('=') {
            Some((name, value)) => Token::Assign(name, value),
            None => Token::Short(rest),
        };
    }
    Token::Positional
}

/// Finds the descriptor a flag-shaped token refers to.
///
/// `-x` only matches single-character aliases; `--name` and assignments
/// match any alias.
pub(crate) fn find_option<'o>(opts: &'o [O], token: Token<'_>) -> Option<&'o O> {
    match token {
        Token::Short(name) => opts.iter().find(|o| o.matches_short(name)),
        Token::Long(name) | Token::Assign(name, _) => opts.iter().find(|o| o.matches(name)),
        Token::Terminator | Token::Positional => None,
    }
}
