use aasettle_application::{Command, CommandParser, CreateRequest, LedgerError, Usage};
use aasettle_domain::{AmountError, BillId, BillStatus};
use aasettle_parser::{
    BillCommand, Command as ParserCommand, ParseError, StatusFilter, parse_command,
    strip_command_prefix,
};

pub struct AaCommandParser {
    prefix: String,
}

impl AaCommandParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for AaCommandParser {
    fn default() -> Self {
        Self::new("/aa")
    }
}

impl CommandParser for AaCommandParser {
    fn parse(&self, content: &str) -> Result<Option<Command>, LedgerError> {
        let Some(args) = strip_command_prefix(content, &self.prefix) else {
            return Ok(None);
        };

        let command = match parse_command(args) {
            Ok(ParserCommand::Help) => Command::Help,
            Ok(ParserCommand::List { filter }) => Command::List {
                filter: filter.map(to_status),
            },
            Ok(ParserCommand::Detail { bill_id }) => Command::Detail {
                bill_id: BillId::from(bill_id),
            },
            Ok(ParserCommand::Clear { bill_id }) => Command::Clear {
                bill_id: BillId::from(bill_id),
            },
            Ok(ParserCommand::Create(create)) => Command::Create(CreateRequest {
                participants: create
                    .participants
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
                amount: create.amount.literal.to_string(),
                description: create.description,
            }),
            Err(err) => return Err(to_ledger_error(err, args)),
        };
        Ok(Some(command))
    }
}

fn to_status(filter: StatusFilter) -> BillStatus {
    match filter {
        StatusFilter::Pending => BillStatus::Pending,
        StatusFilter::Cleared => BillStatus::Cleared,
    }
}

fn to_ledger_error(err: ParseError, args: &str) -> LedgerError {
    match err {
        ParseError::MissingArguments => LedgerError::MissingArguments(Usage::Create),
        ParseError::MissingAmount => {
            LedgerError::InvalidAmount(AmountError::NotANumber(args.trim().to_string()))
        }
        ParseError::MissingBillId(BillCommand::Detail) => {
            LedgerError::MissingArguments(Usage::Detail)
        }
        ParseError::MissingBillId(BillCommand::Clear) => {
            LedgerError::MissingArguments(Usage::Clear)
        }
        ParseError::UnknownStatusFilter(filter) => LedgerError::InvalidFilter(filter),
    }
}
