//! Help pages and the built-in `help` command

use crate::command::{Command, CommandContext, CommandRegistry};

/// Commands per help page
pub const COMMANDS_PER_PAGE: usize = 4;

/// First line of every help message
pub const HELP_HEADER: &str = "[] marks optional arguments, () marks required arguments";

const NO_SUCH_PAGE: &str = "no such page";
const NO_SUCH_COMMAND: &str = "no such command";

/// Number of pages needed for `total` commands
#[must_use]
pub const fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total.div_ceil(page_size)
    }
}

fn write_command_block(out: &mut String, prefix: &str, command: &Command) {
    out.push_str(&format!("\n{prefix}{}\n{}", command.usage(), command.description()));
    if !command.aliases().is_empty() {
        out.push_str(&format!("\naliases: {}", command.aliases().join(",")));
    }
}

impl CommandRegistry {
    /// Render one page of the command list; `page_index` is 0-based
    ///
    /// `None` when the page does not exist.
    #[must_use]
    pub fn render_help_page(&self, page_index: i64, page_size: usize) -> Option<String> {
        let page_index = usize::try_from(page_index).ok()?;
        if page_size == 0 {
            return None;
        }

        let commands = self.commands();
        let total = commands.len();
        let start = page_index.checked_mul(page_size).filter(|start| *start < total)?;
        let end = start.saturating_add(page_size).min(total);

        let mut out = String::from(HELP_HEADER);
        for command in &commands[start..end] {
            write_command_block(&mut out, self.prefix(), command);
        }
        out.push_str(&format!(
            "\npage {} of {}",
            page_index + 1,
            page_count(total, page_size)
        ));

        Some(out)
    }

    /// Render the help block of a single command
    #[must_use]
    pub fn render_command_help(&self, command: &Command) -> String {
        let mut out = String::new();
        write_command_block(&mut out, self.prefix(), command);
        out
    }
}

/// The built-in `help` command
///
/// - no argument: first page
/// - a number `n`: page `n`
/// - anything else: the command with that name or alias
#[must_use]
pub fn help_command() -> Command {
    Command::new("help", run_help)
        .with_usage("help [command/alias/page]")
        .with_description("show the command list or help for one command")
}

async fn run_help(ctx: CommandContext) -> anyhow::Result<()> {
    let registry = ctx.bot.commands();

    let Some(argument) = ctx.params.first() else {
        match registry.render_help_page(0, COMMANDS_PER_PAGE) {
            Some(page) => ctx.send(&page).await?,
            None => ctx.reply(NO_SUCH_PAGE).await?,
        }
        return Ok(());
    };

    if let Ok(page_number) = argument.parse::<i64>() {
        match registry.render_help_page(page_number.saturating_sub(1), COMMANDS_PER_PAGE) {
            Some(page) => ctx.send(&page).await?,
            None => ctx.reply(NO_SUCH_PAGE).await?,
        }
        return Ok(());
    }

    match registry.get(argument) {
        Some(command) => {
            let text = format!("{HELP_HEADER}{}", registry.render_command_help(&command));
            ctx.reply(&text).await?;
        }
        None => ctx.reply(NO_SUCH_COMMAND).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(count: usize) -> CommandRegistry {
        let registry = CommandRegistry::new(".");
        for i in 1..=count {
            registry.add(
                Command::new(format!("cmd{i}"), |_| async { anyhow::Ok(()) })
                    .with_description(format!("command number {i}")),
            );
        }
        registry
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 4), 0);
        assert_eq!(page_count(4, 4), 1);
        assert_eq!(page_count(5, 4), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_second_page_of_six() {
        let page = registry_with(6).render_help_page(1, COMMANDS_PER_PAGE).unwrap();

        assert_eq!(
            page,
            "[] marks optional arguments, () marks required arguments\n\
             .cmd5\ncommand number 5\n\
             .cmd6\ncommand number 6\n\
             page 2 of 2"
        );
    }

    #[test]
    fn test_full_first_page() {
        let page = registry_with(6).render_help_page(0, COMMANDS_PER_PAGE).unwrap();

        assert!(page.contains(".cmd4"));
        assert!(!page.contains(".cmd5"));
        assert!(page.ends_with("page 1 of 2"));
    }

    #[test]
    fn test_page_bounds_for_any_total() {
        for total in 0..10 {
            let registry = registry_with(total);
            let pages = page_count(total, COMMANDS_PER_PAGE) as i64;

            for index in 0..pages {
                assert!(registry.render_help_page(index, COMMANDS_PER_PAGE).is_some());
            }
            assert!(registry.render_help_page(pages, COMMANDS_PER_PAGE).is_none());
            assert!(registry.render_help_page(-1, COMMANDS_PER_PAGE).is_none());
        }
    }

    #[test]
    fn test_zero_page_size() {
        assert!(registry_with(3).render_help_page(0, 0).is_none());
    }

    #[test]
    fn test_command_block_with_aliases() {
        let registry = CommandRegistry::new("!");
        let command = registry.add(
            Command::new("roll", |_| async { anyhow::Ok(()) })
                .with_usage("roll (sides)")
                .with_description("roll a die")
                .with_alias("r")
                .with_alias("dice"),
        );

        assert_eq!(
            registry.render_command_help(&command),
            "\n!roll (sides)\nroll a die\naliases: r,dice"
        );
    }
}
