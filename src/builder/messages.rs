/// How serious a diagnostic is. Errors do not abort the export; they mark
/// the result as degraded.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    pub severity: Severity,
    pub text: String,
}

/// Ordered list of diagnostics accumulated during an export.
///
/// The library never displays these itself; the caller decides whether to
/// log them, show them in a UI, or ignore them. Entries are mirrored to the
/// `log` facade as they arrive.
#[derive(Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn add(&mut self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        match severity {
            Severity::Info => log::info!("{text}"),
            Severity::Warning => log::warn!("{text}"),
            Severity::Error => log::error!("{text}"),
        }
        self.messages.push(Message { severity, text });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.add(Severity::Info, text);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.add(Severity::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.add(Severity::Error, text);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages of one severity, in arrival order.
    pub fn filter(&self, severity: Severity) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(move |message| message.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.filter(Severity::Error).next().is_some()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
