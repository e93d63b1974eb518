//! Help and rejection texts rendered from registered command metadata.
//!
//! Everything here is derived from [`CommandSchema`] values built at
//! registration; handlers are never consulted. `trigger` is the slash
//! command the user typed, e.g. `/calc`.

use super::CommandSchema;

/// Metadata needed to describe one command.
#[derive(Debug, Clone, Copy)]
pub struct HelpEntry<'a> {
    /// Command name.
    pub name: &'a str,
    /// One-line summary for the global listing.
    pub summary: Option<&'a str>,
    /// Free-text help body.
    pub help: Option<&'a str>,
    /// Classified parameters.
    pub schema: &'a CommandSchema,
}

impl HelpEntry<'_> {
    /// Command name followed by every argument and flag descriptor in
    /// declaration order, e.g. `math <x: float> <y: float> [--round]`.
    #[must_use]
    pub fn signature(&self) -> String {
        let arguments = self
            .schema
            .arguments()
            .iter()
            .map(|slot| (slot.ordinal, slot.arg_type.global_describe(&slot.name)));
        let flags = self
            .schema
            .flags()
            .iter()
            .map(|slot| (slot.ordinal, format!("[--{}]", slot.name)));
        let mut parts: Vec<(usize, String)> = arguments.chain(flags).collect();
        parts.sort_by_key(|(ordinal, _)| *ordinal);

        std::iter::once(self.name.to_owned())
            .chain(parts.into_iter().map(|(_, part)| part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Listing of every command with its summary and signature.
#[must_use]
pub fn global_help<'a>(
    trigger: &str,
    description: Option<&str>,
    entries: impl IntoIterator<Item = HelpEntry<'a>>,
) -> String {
    let signatures = entries
        .into_iter()
        .map(|entry| {
            let summary = entry
                .summary
                .map(|text| format!("> {text}\n"))
                .unwrap_or_default();
            format!("{summary}> `{trigger}` {}", entry.signature())
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "`{trigger}` help.\n\
         To view this message run `{trigger} help`\n\
         > By default bot replies are only visible to the requestor. To make the reply \
         visible to everyone in the channel use the `--visible` flag anywhere in your command.\n\
         \n\
         > To view help for a specific command use the `--help` flag\n\
         > EX: `{trigger} <command> --help`\n\
         {description}\n\
         \n\
         *Available Commands:*\n\
         {signatures}",
        description = description.unwrap_or_default(),
    )
}

/// Signature, help body, and one line per argument and flag.
#[must_use]
pub fn command_help(trigger: &str, entry: &HelpEntry<'_>) -> String {
    let mut lines = vec![format!("`{trigger} {}`", entry.signature())];
    if let Some(help) = entry.help {
        lines.push(help.to_owned());
    }

    let arguments = entry.schema.arguments();
    if !arguments.is_empty() {
        lines.push(String::new());
        lines.push("*Arguments:*".to_owned());
        lines.extend(arguments.iter().map(|slot| {
            described(
                &format!("`{}` {}", slot.name, slot.arg_type.describe()),
                slot.help.as_deref(),
            )
        }));
    }

    let flags = entry.schema.flags();
    if !flags.is_empty() {
        lines.push(String::new());
        lines.push("*Flags:*".to_owned());
        lines.extend(
            flags
                .iter()
                .map(|slot| described(&format!("`--{}`", slot.name), slot.help.as_deref())),
        );
    }

    lines.join("\n")
}

fn described(head: &str, help: Option<&str>) -> String {
    help.map_or_else(|| format!("> {head}"), |text| format!("> {head}: {text}"))
}

/// Reply for a command word that is not registered.
#[must_use]
pub fn command_not_found(trigger: &str, text: &str) -> String {
    format!(
        "The command `{trigger} {text}` did not match any commands I know. Please try again.\n\
         To view help run the command `{trigger} help`"
    )
}

/// Reply for argument text the command's schema rejects.
#[must_use]
pub fn invalid_arguments(trigger: &str, text: &str, command: &str) -> String {
    format!(
        "The command run was unable to be parsed by the `{command}` input schema:\n\
         ```\n{trigger} {text}\n```\n\
         To view help for this command enter the command:\n\
         ```\n{trigger} {command} --help\n```"
    )
}

/// Generic reply sent when a handler fails.
#[must_use]
pub fn apology(contact: Option<&str>) -> String {
    let base = "I was unable to respond to your request due to an internal error. \
                Please contact the bot administrator.";
    contact.map_or_else(|| base.to_owned(), |text| format!("{base}\n{text}"))
}
