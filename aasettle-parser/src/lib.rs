#![warn(clippy::uninlined_format_args)]

mod amount;

pub use amount::{AmountToken, amount_token};

const LIST_KEYWORDS: &[&str] = &["查", "list"];
const DETAIL_KEYWORDS: &[&str] = &["对账", "detail"];
const CLEAR_KEYWORDS: &[&str] = &["清账", "clear"];
const HELP_KEYWORDS: &[&str] = &["帮助", "help"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Pending,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs<'a> {
    pub participants: Vec<&'a str>,
    pub amount: AmountToken<'a>,
    /// Tokens after the amount joined by single spaces; `None` when absent.
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    List { filter: Option<StatusFilter> },
    Detail { bill_id: &'a str },
    Clear { bill_id: &'a str },
    Create(CreateArgs<'a>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillCommand {
    Detail,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("a bill needs at least one participant and an amount")]
    MissingArguments,
    #[error("no amount found in the command")]
    MissingAmount,
    #[error("{0:?} needs a bill id")]
    MissingBillId(BillCommand),
    #[error("unknown status filter '{0}'")]
    UnknownStatusFilter(String),
}

/// Returns the text after `prefix` when `content` is a command for this bot.
///
/// The prefix must be followed by whitespace or the end of the message, so
/// `/aabc` is not a `/aa` command.
pub fn strip_command_prefix<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

/// Splits on any Unicode whitespace (including U+3000), dropping empty tokens.
pub fn tokenize(input: &str) -> Vec<&str> {
    input.split(char::is_whitespace).filter(|token| !token.is_empty()).collect()
}

fn is_keyword(token: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| {
        if keyword.is_ascii() {
            token.eq_ignore_ascii_case(keyword)
        } else {
            token == *keyword
        }
    })
}

fn status_filter(token: &str) -> Result<Option<StatusFilter>, ParseError> {
    if is_keyword(token, &["待清账", "pending"]) {
        Ok(Some(StatusFilter::Pending))
    } else if is_keyword(token, &["已清账", "cleared"]) {
        Ok(Some(StatusFilter::Cleared))
    } else if is_keyword(token, &["全部", "all"]) {
        Ok(None)
    } else {
        Err(ParseError::UnknownStatusFilter(token.to_string()))
    }
}

/// Locates the amount among create-command tokens.
///
/// A token with a currency mark wins outright; otherwise the last numeric
/// token counts. A description that is itself a bare number (`陈 100 5`)
/// is therefore read as the amount.
fn find_amount<'a>(tokens: &[&'a str]) -> Option<(usize, AmountToken<'a>)> {
    let candidates = || {
        tokens
            .iter()
            .copied()
            .enumerate()
            .rev()
            .filter_map(|(idx, token)| amount_token(token).map(|amount| (idx, amount)))
    };
    candidates()
        .find(|(_, amount)| amount.marked)
        .or_else(|| candidates().next())
}

fn create_args<'a>(tokens: &[&'a str]) -> Result<CreateArgs<'a>, ParseError> {
    if tokens.len() < 2 {
        return Err(ParseError::MissingArguments);
    }

    let (idx, amount) = find_amount(tokens).ok_or(ParseError::MissingAmount)?;
    let description = tokens[idx + 1..].join(" ");

    Ok(CreateArgs {
        participants: tokens[..idx].to_vec(),
        amount,
        description: (!description.is_empty()).then_some(description),
    })
}

/// Parses the arguments following the command prefix.
pub fn parse_command(args: &str) -> Result<Command<'_>, ParseError> {
    let tokens = tokenize(args);
    let Some((&head, rest)) = tokens.split_first() else {
        return Ok(Command::Help);
    };

    if is_keyword(head, LIST_KEYWORDS) {
        let filter = match rest.first() {
            Some(token) => status_filter(token)?,
            None => None,
        };
        Ok(Command::List { filter })
    } else if is_keyword(head, DETAIL_KEYWORDS) {
        let bill_id = rest
            .first()
            .copied()
            .ok_or(ParseError::MissingBillId(BillCommand::Detail))?;
        Ok(Command::Detail { bill_id })
    } else if is_keyword(head, CLEAR_KEYWORDS) {
        let bill_id = rest
            .first()
            .copied()
            .ok_or(ParseError::MissingBillId(BillCommand::Clear))?;
        Ok(Command::Clear { bill_id })
    } else if is_keyword(head, HELP_KEYWORDS) {
        Ok(Command::Help)
    } else {
        create_args(&tokens).map(Command::Create)
    }
}
