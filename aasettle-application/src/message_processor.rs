use aasettle_domain::{Bill, Identity, Money};

use crate::{
    error::LedgerError,
    ledger::BillLedger,
    model::{BillListing, ClearResult, Command, CreateRequest, Persisted},
    ports::CommandParser,
};

#[derive(Clone, Copy)]
pub struct MessageProcessor<'a> {
    parser: &'a dyn CommandParser,
    ledger: &'a BillLedger<'a>,
    list_limit: usize,
}

#[derive(Debug)]
pub enum ProcessingOutcome {
    /// Not addressed to this bot; nothing should be sent back.
    Ignored,
    Help,
    Created(Persisted<Bill>),
    Listed(BillListing),
    Detail(Bill),
    Cleared(Persisted<ClearResult>),
    Failed(LedgerError),
}

impl<'a> MessageProcessor<'a> {
    pub fn new(
        parser: &'a dyn CommandParser,
        ledger: &'a BillLedger<'a>,
        list_limit: usize,
    ) -> Self {
        Self {
            parser,
            ledger,
            list_limit: list_limit.max(1),
        }
    }

    /// Handles one chat message from `sender` against the sender's own bills.
    pub fn process(&self, sender: &Identity, content: &str) -> ProcessingOutcome {
        let command = match self.parser.parse(content) {
            Ok(Some(command)) => command,
            Ok(None) => return ProcessingOutcome::Ignored,
            Err(err) => return ProcessingOutcome::Failed(err),
        };

        tracing::debug!(sender = %sender.id, ?command, "Processing command");

        match self.execute(sender, command) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::info!(sender = %sender.id, error = %err, "Command rejected");
                ProcessingOutcome::Failed(err)
            }
        }
    }

    fn execute(
        &self,
        sender: &Identity,
        command: Command,
    ) -> Result<ProcessingOutcome, LedgerError> {
        let owner = sender.id.as_str();
        let outcome = match command {
            Command::Help => ProcessingOutcome::Help,
            Command::Create(request) => ProcessingOutcome::Created(self.create(sender, request)?),
            Command::List { filter } => ProcessingOutcome::Listed(BillListing {
                bills: self.ledger.list_bills(owner, filter, Some(self.list_limit)),
                pending_count: self.ledger.pending_count(owner),
                filter,
            }),
            Command::Detail { bill_id } => {
                ProcessingOutcome::Detail(self.ledger.get_bill(owner, &bill_id)?)
            }
            Command::Clear { bill_id } => {
                ProcessingOutcome::Cleared(self.ledger.clear_bill(owner, &bill_id, sender)?)
            }
        };
        Ok(outcome)
    }

    fn create(
        &self,
        sender: &Identity,
        request: CreateRequest,
    ) -> Result<Persisted<Bill>, LedgerError> {
        let amount = Money::parse(&request.amount, self.ledger.rounding_mode())?;
        self.ledger.create_bill(
            sender,
            &request.participants,
            amount,
            request.description.as_deref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Usage,
        ledger::LedgerConfig,
        testing::{FixedClock, InMemoryStore, SequentialIds},
    };
    use aasettle_domain::{AmountError, BillId, BillStatus, RoundingMode};
    use rstest::rstest;

    /// Reads `create <names..> <amount>`, `list`, `detail <id>`, `clear <id>`
    /// and `help`; anything else is not addressed to the bot.
    struct StubParser;

    impl CommandParser for StubParser {
        fn parse(&self, content: &str) -> Result<Option<Command>, LedgerError> {
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let command = match tokens.as_slice() {
                ["help"] => Command::Help,
                ["list"] => Command::List { filter: None },
                ["list", "pending"] => Command::List {
                    filter: Some(BillStatus::Pending),
                },
                ["detail", id] => Command::Detail {
                    bill_id: BillId::from(*id),
                },
                ["clear", id] => Command::Clear {
                    bill_id: BillId::from(*id),
                },
                ["create"] => return Err(LedgerError::MissingArguments(Usage::Create)),
                ["create", names @ .., amount] => Command::Create(CreateRequest {
                    participants: names.iter().map(|name| name.to_string()).collect(),
                    amount: amount.to_string(),
                    description: None,
                }),
                _ => return Ok(None),
            };
            Ok(Some(command))
        }
    }

    struct Harness {
        store: InMemoryStore,
        clock: FixedClock,
        ids: SequentialIds,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: InMemoryStore::default(),
                clock: FixedClock::at(1_700_000_000),
                ids: SequentialIds::default(),
            }
        }

        fn ledger(&self) -> BillLedger<'_> {
            BillLedger::open(
                &self.store,
                &self.clock,
                &self.ids,
                LedgerConfig {
                    rounding_mode: RoundingMode::HalfUp,
                    default_description: "日常消费".to_string(),
                },
            )
        }
    }

    fn sender() -> Identity {
        Identity::new("u1", "u1")
    }

    #[rstest]
    #[case::unrelated("good morning")]
    #[case::empty("")]
    fn unaddressed_messages_are_ignored(#[case] content: &str) {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 10);

        assert!(matches!(processor.process(&sender(), content), ProcessingOutcome::Ignored));
    }

    #[test]
    fn create_then_detail_returns_same_bill() {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 10);

        let ProcessingOutcome::Created(created) = processor.process(&sender(), "create Chen 100")
        else {
            panic!("expected a created bill");
        };
        assert!(created.durable);
        assert_eq!(created.value.per_person_share(), Money::from_minor_units(5_000));

        let detail = format!("detail {}", created.value.id());
        let ProcessingOutcome::Detail(bill) = processor.process(&sender(), &detail) else {
            panic!("expected bill detail");
        };
        assert_eq!(bill, created.value);
    }

    #[rstest]
    #[case::not_a_number("create Chen abc")]
    #[case::negative("create Chen -5")]
    fn invalid_amounts_create_nothing(#[case] content: &str) {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 10);

        let outcome = processor.process(&sender(), content);

        assert!(matches!(
            outcome,
            ProcessingOutcome::Failed(LedgerError::InvalidAmount(
                AmountError::NotANumber(_) | AmountError::NotPositive(_)
            ))
        ));
        assert!(ledger.list_bills("u1", None, None).is_empty());
    }

    #[test]
    fn parser_errors_are_reported() {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 10);

        assert!(matches!(
            processor.process(&sender(), "create"),
            ProcessingOutcome::Failed(LedgerError::MissingArguments(Usage::Create))
        ));
    }

    #[test]
    fn list_is_capped_but_counts_all_pending() {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 2);
        for _ in 0..3 {
            processor.process(&sender(), "create A 30");
        }

        let ProcessingOutcome::Listed(listing) = processor.process(&sender(), "list pending")
        else {
            panic!("expected a listing");
        };
        assert_eq!(listing.bills.len(), 2);
        assert_eq!(listing.pending_count, 3);
        assert_eq!(listing.filter, Some(BillStatus::Pending));
    }

    #[test]
    fn clear_is_scoped_to_sender() {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 10);
        let ProcessingOutcome::Created(created) = processor.process(&sender(), "create Chen 100")
        else {
            panic!("expected a created bill");
        };
        let clear = format!("clear {}", created.value.id());

        let stranger = Identity::new("u9", "Eve");
        assert!(matches!(
            processor.process(&stranger, &clear),
            ProcessingOutcome::Failed(LedgerError::NotFound { .. })
        ));

        let ProcessingOutcome::Cleared(cleared) = processor.process(&sender(), &clear) else {
            panic!("expected the bill to clear");
        };
        assert!(matches!(cleared.value, ClearResult::Cleared(_)));
        assert_eq!(cleared.value.bill().status(), BillStatus::Cleared);

        let ProcessingOutcome::Cleared(again) = processor.process(&sender(), &clear) else {
            panic!("expected an idempotent clear");
        };
        assert!(matches!(again.value, ClearResult::AlreadyCleared(_)));
        assert_eq!(ledger.settlements("u1").len(), 1);
    }

    #[test]
    fn detail_of_unknown_bill_is_not_found() {
        let harness = Harness::new();
        let ledger = harness.ledger();
        let processor = MessageProcessor::new(&StubParser, &ledger, 10);

        assert!(matches!(
            processor.process(&sender(), "detail nope00"),
            ProcessingOutcome::Failed(LedgerError::NotFound { bill_id }) if bill_id.as_str() == "nope00"
        ));
    }
}
