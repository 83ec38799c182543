use aasettle_application::ReplySink;
use aasettle_domain::Identity;
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::Path,
};

/// Prints replies as they would appear in the chat.
pub struct StdoutReplySink;

impl ReplySink for StdoutReplySink {
    fn reply(&self, to: &Identity, text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "@{} {text}\n", to.name).and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write reply");
        }
    }
}

pub type MessageLines = Box<dyn Iterator<Item = io::Result<String>>>;

/// One chat message per line, from `script` or stdin.
pub fn read_messages(script: Option<&Path>) -> io::Result<MessageLines> {
    Ok(match script {
        Some(path) => Box::new(BufReader::new(File::open(path)?).lines()),
        None => Box::new(io::stdin().lines()),
    })
}
