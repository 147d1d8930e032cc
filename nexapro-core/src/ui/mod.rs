//! User-facing side effects of the access layer
//!
//! The access layer never draws anything itself. Notices, confirmation
//! prompts and navigation go through [`Notifier`] and [`Navigator`], which
//! the embedding front end implements.

use crate::router::RouteTarget;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// How long the notice stays visible; `None` leaves it to the front end
    pub duration: Option<Duration>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    /// Ask a yes/no question; `true` means the user accepted.
    fn confirm(&self, message: &str) -> bool;
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, target: RouteTarget);
}

/// Notifier and navigator handed to the access layer
#[derive(Clone)]
pub struct Ui {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
}

impl Ui {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            notifier,
            navigator,
        }
    }

    /// Headless UI that only logs; confirmations are declined.
    pub fn headless() -> Self {
        let ui = Arc::new(LogUi);
        Self::new(ui.clone(), ui)
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    pub fn confirm(&self, message: &str) -> bool {
        self.notifier.confirm(message)
    }

    pub fn navigate(&self, target: RouteTarget) {
        self.navigator.navigate(target);
    }
}

/// Writes every side effect to the log
pub struct LogUi;

impl Notifier for LogUi {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(text = %notice.message, "notice"),
            _ => tracing::info!(text = %notice.message, "notice"),
        }
    }

    fn confirm(&self, message: &str) -> bool {
        tracing::info!(prompt = %message, "confirmation declined (headless)");
        false
    }
}

impl Navigator for LogUi {
    fn navigate(&self, target: RouteTarget) {
        tracing::info!(route = %target, "navigate");
    }
}

/// Records side effects in memory. Used by tests and by front ends that poll.
#[derive(Default)]
pub struct RecordingUi {
    notices: Mutex<Vec<Notice>>,
    prompts: Mutex<Vec<String>>,
    navigations: Mutex<Vec<RouteTarget>>,
    accept_confirm: bool,
}

impl RecordingUi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Recording UI that answers every confirmation with `true`
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept_confirm: true,
            ..Default::default()
        })
    }

    pub fn ui(self: &Arc<Self>) -> Ui {
        Ui::new(self.clone(), self.clone())
    }

    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn navigations(&self) -> Vec<RouteTarget> {
        lock(&self.navigations).clone()
    }
}

impl Notifier for RecordingUi {
    fn notify(&self, notice: Notice) {
        lock(&self.notices).push(notice);
    }

    fn confirm(&self, message: &str) -> bool {
        lock(&self.prompts).push(message.to_string());
        self.accept_confirm
    }
}

impl Navigator for RecordingUi {
    fn navigate(&self, target: RouteTarget) {
        lock(&self.navigations).push(target);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
