use aasettle_application::{MessageProcessor, ReplySink};
use aasettle_domain::Identity;
use aasettle_presentation::ReplyPresenter;

/// Host meta-command that changes who is speaking: `!as <id> [name]`.
const SWITCH_SENDER: &str = "!as";

/// Builds a sender identity, falling back to a name derived from the id.
pub fn sender_identity(id: &str, name: &str) -> Identity {
    let name = name.trim();
    if name.is_empty() {
        let id_prefix: String = id.chars().take(4).collect();
        Identity::new(id, aasettle_i18n::fallback_name(&id_prefix))
    } else {
        Identity::new(id, name)
    }
}

/// A single conversation: each line is a message from the current sender.
pub struct ChatSession<'a, S: ReplySink> {
    processor: MessageProcessor<'a>,
    presenter: ReplyPresenter,
    sink: S,
    sender: Identity,
}

impl<'a, S: ReplySink> ChatSession<'a, S> {
    pub fn new(
        processor: MessageProcessor<'a>,
        presenter: ReplyPresenter,
        sink: S,
        sender: Identity,
    ) -> Self {
        Self {
            processor,
            presenter,
            sink,
            sender,
        }
    }

    #[cfg(test)]
    pub fn sender(&self) -> &Identity {
        &self.sender
    }

    pub fn handle_line(&mut self, line: &str) {
        let content = line.trim();
        if content.is_empty() {
            return;
        }

        if let Some(rest) = content.strip_prefix(SWITCH_SENDER) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                self.switch_sender(rest);
                return;
            }
        }

        let outcome = self.processor.process(&self.sender, content);
        if let Some(reply) = self.presenter.render(&outcome) {
            self.sink.reply(&self.sender, &reply);
        }
    }

    fn switch_sender(&mut self, args: &str) {
        let mut parts = args.split_whitespace();
        let Some(id) = parts.next() else {
            tracing::warn!("'{SWITCH_SENDER}' needs a sender id");
            return;
        };
        let name = parts.collect::<Vec<_>>().join(" ");
        self.sender = sender_identity(id, &name);
        tracing::info!(sender = %self.sender.id, name = %self.sender.name, "Switched sender");
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingSink;
    use aasettle_application::{
        BillLedger, LedgerConfig,
        testing::{FixedClock, InMemoryStore, SequentialIds},
    };
    use aasettle_domain::RoundingMode;
    use aasettle_i18n as i18n;
    use aasettle_infrastructure::AaCommandParser;
    use chrono::FixedOffset;
    use rstest::rstest;

    struct Host {
        store: InMemoryStore,
        clock: FixedClock,
        ids: SequentialIds,
        parser: AaCommandParser,
    }

    impl Host {
        fn new() -> Self {
            Self {
                store: InMemoryStore::default(),
                clock: FixedClock::at(1_700_000_000),
                ids: SequentialIds::default(),
                parser: AaCommandParser::default(),
            }
        }

        fn ledger(&self) -> BillLedger<'_> {
            BillLedger::open(
                &self.store,
                &self.clock,
                &self.ids,
                LedgerConfig {
                    rounding_mode: RoundingMode::HalfUp,
                    default_description: i18n::DEFAULT_DESCRIPTION.to_string(),
                },
            )
        }
    }

    fn session<'a>(host: &'a Host, ledger: &'a BillLedger<'a>) -> ChatSession<'a, RecordingSink> {
        ChatSession::new(
            MessageProcessor::new(&host.parser, ledger, 10),
            ReplyPresenter::with_offset("/aa", FixedOffset::east_opt(0).expect("utc")),
            RecordingSink::default(),
            Identity::new("10001", "陈"),
        )
    }

    #[rstest]
    #[case::with_name("10001", "陈", "陈")]
    #[case::blank_name("123456", "  ", &i18n::fallback_name("1234"))]
    #[case::short_id("7", "", &i18n::fallback_name("7"))]
    fn sender_identity_cases(#[case] id: &str, #[case] name: &str, #[case] expected: &str) {
        assert_eq!(sender_identity(id, name).name, expected);
    }

    #[test]
    fn create_then_list_replies_to_sender() {
        let host = Host::new();
        let ledger = host.ledger();
        let mut session = session(&host, &ledger);

        session.handle_line("/aa 李 王 90 火锅");
        session.handle_line("/aa 查");

        let replies = session.sink().replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].0.id, "10001");
        assert!(replies[0].1.starts_with(i18n::BILL_CREATED));
        assert!(replies[0].1.contains("b00001"));
        assert!(replies[1].1.starts_with(&i18n::list_header(1)));
    }

    #[test]
    fn empty_cleared_list_still_reports_pending_bills() {
        let host = Host::new();
        let ledger = host.ledger();
        let mut session = session(&host, &ledger);

        session.handle_line("/aa 李 100");
        session.handle_line("/aa 查 已清账");

        let replies = session.sink().replies();
        assert_eq!(replies[1].1, i18n::no_bills_with_status(i18n::FILTER_CLEARED, 1));
    }

    #[test]
    fn chatter_and_blank_lines_are_ignored() {
        let host = Host::new();
        let ledger = host.ledger();
        let mut session = session(&host, &ledger);

        session.handle_line("");
        session.handle_line("今天天气不错");

        assert!(session.sink().replies().is_empty());
    }

    #[test]
    fn switching_sender_scopes_bills() {
        let host = Host::new();
        let ledger = host.ledger();
        let mut session = session(&host, &ledger);

        session.handle_line("/aa 李 100");
        session.handle_line("!as 20002 李");
        assert_eq!(session.sender(), &Identity::new("20002", "李"));
        session.handle_line("/aa 清账 b00001");

        let replies = session.sink().replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[1].0.id, "20002");
        assert_eq!(replies[1].1, i18n::not_found("b00001", "/aa"));
        assert_eq!(ledger.pending_count("10001"), 1);
    }

    #[test]
    fn bills_survive_a_restart_on_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = aasettle_infrastructure::JsonFileStore::new(dir.path());
        let host = Host::new();
        let config = || LedgerConfig {
            rounding_mode: RoundingMode::HalfUp,
            default_description: i18n::DEFAULT_DESCRIPTION.to_string(),
        };

        {
            let ledger = BillLedger::open(&store, &host.clock, &host.ids, config());
            let mut session = session(&host, &ledger);
            session.handle_line("/aa 李 100");
            session.handle_line("/aa 清账 b00001");
            assert!(
                session.sink().replies()[1]
                    .1
                    .starts_with(&i18n::bill_cleared("b00001"))
            );
        }

        let ledger = BillLedger::open(&store, &host.clock, &host.ids, config());
        let mut session = session(&host, &ledger);
        session.handle_line("/aa 对账 b00001");

        let replies = session.sink().replies();
        assert!(replies[0].1.contains(i18n::STATUS_CLEARED));
        assert_eq!(ledger.settlements("10001").len(), 1);
    }

    #[rstest]
    #[case::missing_id("!as")]
    #[case::glued("!asdf")]
    fn malformed_switch_keeps_sender(#[case] line: &str) {
        let host = Host::new();
        let ledger = host.ledger();
        let mut session = session(&host, &ledger);

        session.handle_line(line);

        assert_eq!(session.sender().id, "10001");
        assert!(session.sink().replies().is_empty());
    }
}
