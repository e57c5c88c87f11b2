// src/transport.rs
//
// Delivery boundary. The pipeline hands over a finished report body and a
// recipient list; how it travels is the transport's business.
//
// `OutboxTransport` writes one ready-to-send MIME message per delivery into a
// pickup directory (the layout local relays such as a sendmail/postfix
// pickup or a cron'd `msmtp` loop consume). Relay credentials never pass
// through this crate.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;

use crate::config::MailOptions;
use crate::config::consts::STAMP_FORMAT;
use crate::error::TransportError;

pub trait Transport {
    fn deliver(&mut self, recipients: &[String], body: &str) -> Result<(), TransportError>;
}

/// Writes `<stamp>-<n>.eml` files into an outbox directory.
#[derive(Clone, Debug)]
pub struct OutboxTransport {
    dir: PathBuf,
    from: String,
    subject: String,
    /// Messages written by this instance, oldest first.
    written: Vec<PathBuf>,
}

impl OutboxTransport {
    pub fn new(dir: impl Into<PathBuf>, from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self { dir: dir.into(), from: from.into(), subject: subject.into(), written: Vec::new() }
    }

    pub fn from_options(opts: &MailOptions) -> Self {
        Self::new(&opts.outbox_dir, &opts.from, &opts.subject)
    }

    pub fn written(&self) -> &[PathBuf] { &self.written }

    fn open_outbox(&self) -> Result<(), TransportError> {
        fs::create_dir_all(&self.dir).map_err(|e| TransportError::Connect {
            target: self.dir.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl Transport for OutboxTransport {
    fn deliver(&mut self, recipients: &[String], body: &str) -> Result<(), TransportError> {
        if recipients.is_empty() {
            return Err(TransportError::Send(s!("no recipients")));
        }
        if let Some(bad) = recipients.iter().find(|r| !looks_like_address(r)) {
            return Err(TransportError::Send(format!("invalid recipient address {bad:?}")));
        }
        for (name, value) in [("From", &self.from), ("Subject", &self.subject)] {
            if has_line_break(value) {
                return Err(TransportError::Send(format!("line break in {name} header")));
            }
        }
        self.open_outbox()?;

        let message = compose(&self.from, recipients, &self.subject, body);
        let stamp = Utc::now().format(STAMP_FORMAT).to_string();

        let mut n = 1u32;
        let path = loop {
            let path = self.dir.join(format!("{stamp}-{n}.eml"));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(message.as_bytes())
                        .and_then(|_| file.flush())
                        .map_err(|e| TransportError::Send(s!("{}: {e}", path.display())))?;
                    break path;
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => {
                    return Err(TransportError::Send(s!("{}: {e}", path.display())));
                }
            }
        };

        logf!(path = %path.display(), recipients = recipients.len(), "queued report");
        self.written.push(path);
        Ok(())
    }
}

/// Cheap shape check; the relay does the real validation.
fn looks_like_address(addr: &str) -> bool {
    if has_line_break(addr) {
        return false;
    }
    let addr = addr.trim();
    match addr.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !addr.contains(|c: char| c.is_whitespace() || c == ',' || c == ';')
        }
        None => false,
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\r', '\n'])
}

/// Single-part `text/html` message with CRLF line endings.
pub fn compose(from: &str, recipients: &[String], subject: &str, body: &str) -> String {
    let mut msg = String::with_capacity(body.len() + 256);
    msg.push_str(&format!("From: {from}\r\n"));
    msg.push_str(&format!("To: {}\r\n", recipients.join(", ")));
    msg.push_str(&format!("Subject: {subject}\r\n"));
    msg.push_str(&format!("Date: {}\r\n", Utc::now().to_rfc2822()));
    msg.push_str("MIME-Version: 1.0\r\n");
    msg.push_str("Content-Type: text/html; charset=utf-8\r\n");
    msg.push_str("Content-Transfer-Encoding: 8bit\r\n");
    msg.push_str("\r\n");
    for line in body.lines() {
        msg.push_str(line);
        msg.push_str("\r\n");
    }
    msg
}
