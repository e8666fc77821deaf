//! On-screen toasts.

use std::time::Duration;

use leptos::prelude::*;

use crate::notify::{Notifier, Toast, ToastId, ToastPosition, ToastQueue};

/// Timer resolution of auto-dismiss and the progress bar.
const TICK: Duration = Duration::from_millis(100);

/// `Notifier` that pushes into a reactive `ToastQueue`.
#[derive(Debug, Clone, Copy)]
pub struct ToastNotifier {
    queue: RwSignal<ToastQueue>,
}

impl ToastNotifier {
    pub fn new(queue: RwSignal<ToastQueue>) -> Self {
        Self { queue }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, toast: Toast) {
        tracing::debug!(kind = toast.kind.as_class(), message = %toast.message, "toast");
        self.queue.update(|q| {
            q.push(toast);
        });
    }
}

/// Renders every toast in `queue`, grouped by position, and runs their
/// timers.
#[component]
pub fn ToastContainer(queue: RwSignal<ToastQueue>) -> impl IntoView {
    let timer = set_interval_with_handle(
        move || {
            if queue.with_untracked(|q| q.is_empty()) {
                return;
            }
            queue.update(|q| {
                q.advance(TICK);
            });
        },
        TICK,
    );
    match timer {
        Ok(handle) => on_cleanup(move || handle.clear()),
        Err(_) => tracing::warn!("toast timer unavailable, toasts will not auto-close"),
    }

    ToastPosition::ALL
        .into_iter()
        .map(|position| {
            view! {
                <div class=format!("toast-container {}", position.as_class())>
                    <For
                        each=move || queue.with(|q| q.ids_at(position))
                        key=|id| *id
                        children=move |id| view! { <ToastItem id=id queue=queue/> }
                    />
                </div>
            }
        })
        .collect::<Vec<_>>()
}

#[component]
fn ToastItem(id: ToastId, queue: RwSignal<ToastQueue>) -> impl IntoView {
    let toast = queue.with_untracked(|q| q.get(id).map(|t| t.toast.clone()));
    let progress = move || {
        queue
            .with(|q| q.get(id).and_then(|t| t.progress()))
            .unwrap_or(0.0)
    };

    toast.map(|toast| {
        let class = format!("toast {}", toast.kind.as_class());
        let show_progress = toast.options.show_progress_bar && toast.options.auto_close.is_some();

        view! {
            <div
                class=class
                role="alert"
                data-draggable=toast.options.draggable.to_string()
                on:click=move |_| {
                    queue.update(|q| {
                        q.click(id);
                    });
                }
                on:mouseenter=move |_| queue.update(|q| q.hover_start(id))
                on:mouseleave=move |_| queue.update(|q| q.hover_end(id))
            >
                <span class="toast-message">{toast.message}</span>
                <Show when=move || show_progress>
                    <div
                        class="toast-progress"
                        style=move || format!("width: {:.1}%", progress() * 100.0)
                    ></div>
                </Show>
            </div>
        }
    })
}
