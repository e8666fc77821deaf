//! Short-lived user notifications.
//!
//! `Notifier` is what the catalog view talks to. `ToastQueue` is the state
//! behind the on-screen toasts: it owns the auto-dismiss timers and is
//! advanced by the `ToastContainer` component on a fixed tick.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Info,
    Error,
}

impl ToastKind {
    pub fn as_class(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Screen corner or edge a toast stacks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    #[default]
    TopRight,
    TopLeft,
    TopCenter,
    BottomRight,
    BottomLeft,
    BottomCenter,
}

impl ToastPosition {
    pub const ALL: [ToastPosition; 6] = [
        Self::TopRight,
        Self::TopLeft,
        Self::TopCenter,
        Self::BottomRight,
        Self::BottomLeft,
        Self::BottomCenter,
    ];

    pub fn as_class(&self) -> &'static str {
        match self {
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
        }
    }
}

/// Display behaviour of a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub position: ToastPosition,
    /// `None` keeps the toast until it is dismissed.
    pub auto_close: Option<Duration>,
    pub show_progress_bar: bool,
    pub close_on_click: bool,
    pub pause_on_hover: bool,
    pub draggable: bool,
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            position: ToastPosition::TopRight,
            auto_close: Some(Duration::from_millis(5000)),
            show_progress_bar: true,
            close_on_click: true,
            pause_on_hover: true,
            draggable: true,
        }
    }
}

impl ToastOptions {
    /// Options for the "Selected: ..." toast.
    pub fn selection() -> Self {
        Self {
            auto_close: Some(Duration::from_millis(3000)),
            ..Self::default()
        }
    }
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub options: ToastOptions,
}

impl Toast {
    pub fn info(message: impl Into<String>, options: ToastOptions) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
            options,
        }
    }

    pub fn error(message: impl Into<String>, options: ToastOptions) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            options,
        }
    }
}

/// Accepts toasts for display.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Identifier of a toast in a `ToastQueue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

/// A toast on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveToast {
    pub id: ToastId,
    pub toast: Toast,
    remaining: Option<Duration>,
    hovered: bool,
}

impl LiveToast {
    /// Whether the dismiss timer is currently suspended.
    pub fn is_paused(&self) -> bool {
        self.hovered && self.toast.options.pause_on_hover
    }

    /// Fraction of the display time left, from 1.0 down to 0.0.
    pub fn progress(&self) -> Option<f64> {
        let total = self.toast.options.auto_close?;
        let remaining = self.remaining?;
        if total.is_zero() {
            return Some(0.0);
        }
        Some(remaining.as_secs_f64() / total.as_secs_f64())
    }
}

/// Toasts currently displayed, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    toasts: Vec<LiveToast>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.toasts.push(LiveToast {
            id,
            remaining: toast.options.auto_close,
            toast,
            hovered: false,
        });
        id
    }

    pub fn get(&self, id: ToastId) -> Option<&LiveToast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LiveToast> {
        self.toasts.iter()
    }

    /// Ids of toasts shown at `position`.
    pub fn ids_at(&self, position: ToastPosition) -> Vec<ToastId> {
        self.toasts
            .iter()
            .filter(|t| t.toast.options.position == position)
            .map(|t| t.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Remove a toast. Returns false when it was already gone.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// User clicked the toast body.
    pub fn click(&mut self, id: ToastId) -> bool {
        let closable = self
            .get(id)
            .is_some_and(|t| t.toast.options.close_on_click);
        closable && self.dismiss(id)
    }

    pub fn hover_start(&mut self, id: ToastId) {
        if let Some(t) = self.toasts.iter_mut().find(|t| t.id == id) {
            t.hovered = true;
        }
    }

    pub fn hover_end(&mut self, id: ToastId) {
        if let Some(t) = self.toasts.iter_mut().find(|t| t.id == id) {
            t.hovered = false;
        }
    }

    /// Let `elapsed` pass on every running timer and drop expired toasts.
    ///
    /// Returns the ids removed.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ToastId> {
        let mut expired = Vec::new();
        for t in &mut self.toasts {
            if t.is_paused() {
                continue;
            }
            if let Some(remaining) = t.remaining {
                let left = remaining.saturating_sub(elapsed);
                t.remaining = Some(left);
                if left.is_zero() {
                    expired.push(t.id);
                }
            }
        }
        self.toasts.retain(|t| !expired.contains(&t.id));
        expired
    }
}
