use std::time::Duration;

/// User-facing message raised by a UI action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(t) | Notice::Warning(t) | Notice::Error(t) => t,
        }
    }
}

/// Queue of notices produced during a frame, flushed into toasts at the end.
#[derive(Debug, Default)]
pub struct Notices {
    pending: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        self.pending.push(notice);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Notice::Info(text.into()));
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(Notice::Warning(text.into()));
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Notice::Error(text.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Notice> + '_ {
        self.pending.drain(..)
    }

    pub fn flush_into(&mut self, toasts: &mut egui_notify::Toasts) {
        for notice in self.drain() {
            let toast = match &notice {
                Notice::Info(t) => toasts.info(t.clone()),
                Notice::Warning(t) => toasts.warning(t.clone()),
                Notice::Error(t) => toasts.error(t.clone()),
            };
            toast.duration(Some(Duration::from_secs(4)));
        }
    }
}
