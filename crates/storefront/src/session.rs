//! Line commands for the interactive storefront session.
//!
//! Each stdin line is split into words with shell quoting rules and parsed
//! with clap. [`apply`] maps a parsed command onto the
//! matching [`Storefront`] action.

use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use lustre_core::ProductId;

use crate::controller::Storefront;
use crate::intake::ContactFields;
use crate::view::{ClickTarget, Key, KeyPress};

/// One parsed input line.
#[derive(Debug, Parser)]
#[command(name = "storefront", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SessionCommand {
    /// Add one of a product to the cart
    Add { id: ProductId },
    /// Increase a cart line's quantity by one
    Inc { id: ProductId },
    /// Decrease a cart line's quantity by one (removes it at zero)
    Dec { id: ProductId },
    /// Empty the cart
    Clear,
    /// Show one category ("all" shows everything)
    Filter { category: String },
    /// Type into the search box (searches after a short pause)
    Type {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Press Enter in the search box, optionally typing first
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Open or close the cart panel
    Cart,
    /// Press a key: escape, enter, ctrl+k, cmd+k or a single character
    Key {
        #[arg(value_parser = parse_key)]
        key: KeyPress,
    },
    /// Click somewhere outside the cart panel
    ClickOutside,
    /// Place the order for the cart's contents
    Checkout,
    /// Submit the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long)]
        message: String,
    },
    /// Let timers run for a number of milliseconds
    Wait { ms: u64 },
    /// Print where the page is written
    Page,
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// What the session loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowPage,
    Wait(Duration),
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns the clap error (including help output for `help`) when the line
/// is not a valid command or has an unterminated quote.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, clap::Error> {
    let words = shell_words::split(line)
        .map_err(|e| SessionLine::command().error(ErrorKind::ValueValidation, e))?;
    if words.is_empty() {
        return Ok(None);
    }
    SessionLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

/// Run a command against the storefront.
pub fn apply(shop: &mut Storefront, command: SessionCommand) -> Flow {
    match command {
        SessionCommand::Add { id } => {
            if !shop.add_to_cart(id) {
                tracing::warn!(product_id = %id, "No such product");
            }
        }
        SessionCommand::Inc { id } => {
            shop.update_quantity(id, 1);
        }
        SessionCommand::Dec { id } => {
            shop.update_quantity(id, -1);
        }
        SessionCommand::Clear => shop.clear_cart(),
        SessionCommand::Filter { category } => shop.filter(&category),
        SessionCommand::Type { text } => shop.search_input(&text.join(" ")),
        SessionCommand::Search { text } => {
            if !text.is_empty() {
                shop.search_input(&text.join(" "));
            }
            shop.search_submit();
        }
        SessionCommand::Cart => shop.toggle_cart(),
        SessionCommand::Key { key } => {
            shop.key_press(key);
        }
        SessionCommand::ClickOutside => {
            shop.click(ClickTarget::Elsewhere);
        }
        SessionCommand::Checkout => {
            // Failures are already shown to the user as notices.
            let _ = shop.checkout();
        }
        SessionCommand::Contact {
            name,
            email,
            phone,
            message,
        } => {
            let _ = shop.submit_contact(ContactFields {
                name,
                email,
                phone,
                message,
            });
        }
        SessionCommand::Wait { ms } => return Flow::Wait(Duration::from_millis(ms)),
        SessionCommand::Page => return Flow::ShowPage,
        SessionCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn parse_key(value: &str) -> Result<KeyPress, String> {
    let lower = value.to_lowercase();
    let (modifier, key) = match lower
        .strip_prefix("ctrl+")
        .or_else(|| lower.strip_prefix("cmd+"))
    {
        Some(rest) => (true, rest),
        None => (false, lower.as_str()),
    };

    let key = match key {
        "escape" | "esc" => Key::Escape,
        "enter" | "return" => Key::Enter,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return Err(format!("unknown key '{value}'")),
            }
        }
    };

    Ok(KeyPress { key, modifier })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_group_words() {
        assert_eq!(
            parse_line(r#"filter 'Engagement Rings'"#).unwrap(),
            Some(SessionCommand::Filter {
                category: "Engagement Rings".to_string()
            })
        );
        assert_eq!(
            parse_line(r#"filter """#).unwrap(),
            Some(SessionCommand::Filter {
                category: String::new()
            })
        );
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn test_unterminated_quote_is_rejected() {
        let err = parse_line("type \"open ended").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(
            parse_line("add 3").unwrap(),
            Some(SessionCommand::Add {
                id: ProductId::new(3)
            })
        );
        assert_eq!(
            parse_line("click-outside").unwrap(),
            Some(SessionCommand::ClickOutside)
        );
        assert_eq!(parse_line("exit").unwrap(), Some(SessionCommand::Quit));
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_search_text_keeps_words() {
        assert_eq!(
            parse_line("type gold bangle").unwrap(),
            Some(SessionCommand::Type {
                text: vec!["gold".to_string(), "bangle".to_string()]
            })
        );
        assert_eq!(
            parse_line("search").unwrap(),
            Some(SessionCommand::Search { text: Vec::new() })
        );
    }

    #[test]
    fn test_parse_contact() {
        let command =
            parse_line(r#"contact --name Ruwan --email ruwan@example.com --message "Ring sizes?""#)
                .unwrap()
                .unwrap();
        assert_eq!(
            command,
            SessionCommand::Contact {
                name: "Ruwan".to_string(),
                email: "ruwan@example.com".to_string(),
                phone: String::new(),
                message: "Ring sizes?".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!(parse_key("Escape").unwrap(), KeyPress::plain(Key::Escape));
        assert_eq!(
            parse_key("ctrl+k").unwrap(),
            KeyPress::with_modifier(Key::Char('k'))
        );
        assert_eq!(
            parse_key("cmd+K").unwrap(),
            KeyPress::with_modifier(Key::Char('k'))
        );
        assert!(parse_key("ctrl+shift").is_err());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse_line("add ruby").is_err());
        assert!(parse_line("teleport").is_err());
        let help = parse_line("help").unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
