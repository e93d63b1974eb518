//! Command-line tokenizer.

use std::collections::BTreeSet;

const FLAG_PREFIX: &str = "--";

/// Flag name that renders help instead of executing.
pub const HELP_FLAG: &str = "help";

/// Flag name that broadcasts the reply to the whole channel.
pub const VISIBLE_FLAG: &str = "visible";

/// A command line split into command word, residual arguments, and flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    command: String,
    args: String,
    flags: BTreeSet<String>,
}

impl CommandLine {
    /// Tokenizes a line of command text.
    ///
    /// Every whitespace-delimited `--name` token is collected as a flag
    /// wherever it appears and removed from the line. The first remaining
    /// word is the command and the rest, re-joined with single spaces, are
    /// the arguments.
    #[must_use]
    pub fn tokenize(text: &str) -> Self {
        let mut flags = BTreeSet::new();
        let mut words = Vec::new();
        for token in text.split_whitespace() {
            match flag_name(token) {
                Some(name) => {
                    flags.insert(name.to_owned());
                }
                None => words.push(token),
            }
        }

        let mut remaining = words.into_iter();
        let command = remaining.next().unwrap_or_default().to_owned();
        let args = remaining.collect::<Vec<_>>().join(" ");
        Self {
            command,
            args,
            flags,
        }
    }

    /// Returns the command word, or an empty string.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the residual argument text.
    #[must_use]
    pub fn args(&self) -> &str {
        &self.args
    }

    /// Returns every flag found on the line.
    #[must_use]
    pub const fn flags(&self) -> &BTreeSet<String> {
        &self.flags
    }

    /// Splits the flags into router-level flags and command flags.
    #[must_use]
    pub fn split_flags(&self) -> (GlobalFlags, BTreeSet<String>) {
        let global = GlobalFlags {
            help: self.flags.contains(HELP_FLAG),
            visible: self.flags.contains(VISIBLE_FLAG),
        };
        let local = self
            .flags
            .iter()
            .filter(|flag| !GlobalFlags::is_global(flag))
            .cloned()
            .collect();
        (global, local)
    }
}

fn flag_name(token: &str) -> Option<&str> {
    token
        .strip_prefix(FLAG_PREFIX)
        .filter(|name| !name.is_empty())
}

/// Flags interpreted by the router rather than passed to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalFlags {
    /// `--help` was given.
    pub help: bool,
    /// `--visible` was given.
    pub visible: bool,
}

impl GlobalFlags {
    /// Returns `true` if `name` is reserved by the router.
    #[must_use]
    pub fn is_global(name: &str) -> bool {
        name == HELP_FLAG || name == VISIBLE_FLAG
    }
}
