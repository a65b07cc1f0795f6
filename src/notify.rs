use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// How a notice is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Shown in the message bar and dismissed after the given time
    Transient(Duration),
    /// Modal message box the user has to acknowledge
    Blocking,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn bar_info(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            level: NoticeLevel::Info,
            kind: NoticeKind::Transient(duration),
            text: text.into(),
        }
    }

    pub fn bar_warn(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            level: NoticeLevel::Warning,
            kind: NoticeKind::Transient(duration),
            text: text.into(),
        }
    }

    pub fn show_warn(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            kind: NoticeKind::Blocking,
            text: text.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.kind == NoticeKind::Blocking
    }
}

/// Receives notices meant for the user
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}
