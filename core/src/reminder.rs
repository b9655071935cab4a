//! Fee reminders: recipient selection, message composition and batch
//! delivery through a mail collaborator.
//!
//! RULE: A failed recipient never stops the batch. Failures are collected
//! and reported together once every recipient has been tried.

use crate::{
    error::{IndexError, LedgerError, LedgerResult},
    record::{format_date, FeeRecord},
    types::RecordIndex,
};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const REMINDER_SUBJECT: &str = "Fee Payment Reminder";

/// At most this many failure diagnostics are shown in a summary.
pub const MAX_REPORTED_FAILURES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{recipient}: {diagnostic}")]
pub struct DeliveryError {
    pub recipient: String,
    pub diagnostic: String,
}

/// The mail-delivery collaborator.
pub trait Mailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError>;
}

/// Who a reminder run is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ReminderScope {
    /// Every record with a positive balance.
    AllWithDues,
    /// One record, by table index.
    Record { index: RecordIndex },
}

/// Reminders ready to send, plus how many owing records had no address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderBatch {
    pub mails: Vec<OutgoingMail>,
    pub skipped_no_email: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Addresses that accepted a reminder, in send order.
    pub delivered: Vec<String>,
    pub failures: Vec<DeliveryError>,
    pub skipped_no_email: usize,
}

impl DeliveryReport {
    pub fn sent(&self) -> usize {
        self.delivered.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// "Sent: N[, Failed: M]" followed by the first few failure diagnostics.
    pub fn summary(&self) -> String {
        let mut out = format!("Sent: {}", self.sent());
        if !self.failures.is_empty() {
            out.push_str(&format!(", Failed: {}", self.failures.len()));
        }
        if self.skipped_no_email > 0 {
            out.push_str(&format!(", Skipped (no email): {}", self.skipped_no_email));
        }
        if !self.failures.is_empty() {
            out.push_str("\n\nSome failures:");
            for failure in self.failures.iter().take(MAX_REPORTED_FAILURES) {
                out.push('\n');
                out.push_str(&failure.to_string());
            }
        }
        out
    }
}

/// Pick the records a reminder run goes to and compose their messages.
pub fn build_batch(
    records: &[FeeRecord],
    scope: ReminderScope,
    signature: &str,
) -> LedgerResult<ReminderBatch> {
    let owing: Vec<&FeeRecord> = match scope {
        ReminderScope::AllWithDues => records.iter().filter(|r| r.has_dues()).collect(),
        ReminderScope::Record { index } => {
            let record = records.get(index).ok_or(IndexError::OutOfRange {
                index,
                len: records.len(),
            })?;
            if !record.has_dues() {
                return Err(LedgerError::NoBalanceDue);
            }
            vec![record]
        }
    };
    if owing.is_empty() {
        return Err(LedgerError::NoRecipients);
    }

    let mut batch = ReminderBatch::default();
    for record in owing {
        if record.email.trim().is_empty() {
            batch.skipped_no_email += 1;
        } else {
            batch.mails.push(compose_reminder(record, signature));
        }
    }
    if batch.mails.is_empty() {
        return Err(LedgerError::NoRecipients);
    }
    Ok(batch)
}

pub fn compose_reminder(record: &FeeRecord, signature: &str) -> OutgoingMail {
    let mut body = format!(
        "Hello {},\n\nThis is a gentle reminder that your pending fee balance is {}.\n",
        record.name, record.balance
    );
    if record.due_date.is_some() {
        body.push_str(&format!("Due Date: {}\n", format_date(record.due_date)));
    }
    body.push_str(
        "Kindly make the payment at the earliest to avoid any late charges.\n\
         If you have already completed the payment, please disregard this message.\n\
         Thank you for your prompt attention.\n\n\
         Regards,\n",
    );
    body.push_str(signature);

    OutgoingMail {
        to: record.email.trim().to_string(),
        subject: REMINDER_SUBJECT.to_string(),
        body,
    }
}

/// Send every mail in order, one at a time.
pub fn dispatch(mailer: &dyn Mailer, batch: ReminderBatch) -> DeliveryReport {
    let mut report = DeliveryReport {
        skipped_no_email: batch.skipped_no_email,
        ..Default::default()
    };
    for mail in &batch.mails {
        match mailer.send(mail) {
            Ok(()) => {
                log::debug!("Reminder sent to {}", mail.to);
                report.delivered.push(mail.to.clone());
            }
            Err(e) => {
                log::warn!("Reminder to {} failed: {}", e.recipient, e.diagnostic);
                report.failures.push(e);
            }
        }
    }
    report
}

/// SMTP session parameters. The credential is never part of the config file.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub sender: String,
    pub password: String,
    pub timeout_secs: u64,
}

/// STARTTLS SMTP delivery, authenticated as the sender.
pub struct SmtpMailer {
    sender: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> LedgerResult<Self> {
        if settings.host.trim().is_empty() {
            return Err(LedgerError::MailSetup("missing SMTP host".into()));
        }
        let sender: Mailbox = settings
            .sender
            .parse()
            .map_err(|e| LedgerError::MailSetup(format!("invalid sender address: {e}")))?;
        let transport = SmtpTransport::starttls_relay(settings.host.trim())
            .map_err(|e| LedgerError::MailSetup(format!("invalid SMTP host: {e}")))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();
        Ok(Self { sender, transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
        let fail = |diagnostic: String| DeliveryError {
            recipient: mail.to.clone(),
            diagnostic,
        };
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| fail(format!("invalid address: {e}")))?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| fail(format!("failed to build email: {e}")))?;
        self.transport
            .send(&message)
            .map(|_| ())
            .map_err(|e| fail(e.to_string()))
    }
}
