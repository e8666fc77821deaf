//! Overlay presenter and the product detail modal.

use leptos::html::Div;
use leptos::portal::Portal;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::view::ModalContent;

/// Id of the element the application is mounted into. It is hidden from
/// assistive technology while a modal is open.
pub const APP_ROOT_ID: &str = "root";

const FOCUSABLE: &str = "a[href], button:not([disabled]), input:not([disabled]), \
    select:not([disabled]), textarea:not([disabled]), [tabindex]:not([tabindex=\"-1\"])";

/// Index of the element Tab moves to among `len` focusable elements.
///
/// `current` is the focused element, `None` when focus is on the panel
/// itself. Focus wraps at both ends. Returns `None` when there is nothing to
/// focus.
pub fn cycle_focus(current: Option<usize>, len: usize, backwards: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match (current.filter(|&i| i < len), backwards) {
        (None, false) => 0,
        (None, true) => len - 1,
        (Some(i), false) => (i + 1) % len,
        (Some(0), true) => len - 1,
        (Some(i), true) => i - 1,
    };
    Some(next)
}

fn focusable_within(panel: &Element) -> Vec<HtmlElement> {
    let Ok(nodes) = panel.query_selector_all(FOCUSABLE) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Move focus to the next focusable element inside `panel`, wrapping around.
fn trap_tab(panel: &HtmlElement, backwards: bool) {
    let elements = focusable_within(panel);
    let active = document().active_element();
    let current = active.as_ref().and_then(|active| {
        elements
            .iter()
            .position(|el| AsRef::<Element>::as_ref(el) == active)
    });

    match cycle_focus(current, elements.len(), backwards).and_then(|i| elements.get(i)) {
        Some(el) => {
            let _ = el.focus();
        }
        None => {
            let _ = panel.focus();
        }
    }
}

fn set_app_hidden(hidden: bool) {
    let Some(root) = document().get_element_by_id(APP_ROOT_ID) else {
        return;
    };
    let _ = if hidden {
        root.set_attribute("aria-hidden", "true")
    } else {
        root.remove_attribute("aria-hidden")
    };
}

/// Panel shown above the page while `open` is true.
///
/// The panel is rendered outside the application root, which is marked
/// `aria-hidden` while it is open. Clicking the backdrop or pressing Escape
/// calls `on_close`; clicks inside the panel stay inside it. Tab and
/// Shift+Tab cycle through the panel's controls. Focus moves to the panel
/// on open and back to the previously focused element on close.
#[component]
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    let panel = NodeRef::<Div>::new();
    let children = StoredValue::new(children);

    let mut opener: Option<HtmlElement> = None;
    Effect::new(move |was_open: Option<bool>| {
        let is_open = open.get();
        let was_open = was_open.unwrap_or(false);
        if is_open && !was_open {
            opener = document()
                .active_element()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            set_app_hidden(true);
        } else if was_open && !is_open {
            set_app_hidden(false);
            if let Some(el) = opener.take() {
                let _ = el.focus();
            }
        }
        if is_open {
            if let Some(el) = panel.get() {
                let _ = el.focus();
            }
        }
        is_open
    });
    on_cleanup(|| set_app_hidden(false));

    view! {
        <Portal>
            <Show when=move || open.get()>
                <div class="modal-overlay" on:click=move |_| on_close.run(())>
                    <div
                        node_ref=panel
                        class="modal-content"
                        role="dialog"
                        aria-modal="true"
                        tabindex="-1"
                        on:click=|ev| ev.stop_propagation()
                        on:keydown=move |ev| match ev.key().as_str() {
                            "Escape" => on_close.run(()),
                            "Tab" => {
                                if let Some(el) = panel.get_untracked() {
                                    ev.prevent_default();
                                    trap_tab(&el, ev.shift_key());
                                }
                            }
                            _ => {}
                        }
                    >
                        {children.with_value(|children| children())}
                    </div>
                </div>
            </Show>
        </Portal>
    }
}

#[component]
pub fn ProductModal(
    #[prop(into)] content: Signal<Option<ModalContent>>,
    #[prop(into)] open: Signal<bool>,
    on_close: Callback<()>,
) -> impl IntoView {
    view! {
        <Modal open=open on_close=on_close>
            {move || {
                content
                    .get()
                    .map(|c| {
                        view! {
                            <div class="modal-inner">
                                <button class="close-button" on:click=move |_| on_close.run(())>
                                    "\u{00d7}"
                                </button>
                                <h2>{c.title}</h2>
                                <div class="modal-images">
                                    {c
                                        .images
                                        .into_iter()
                                        .map(|img| {
                                            view! { <img src=img.src alt=img.alt class="modal-image"/> }
                                        })
                                        .collect::<Vec<_>>()}
                                </div>
                                <div class="modal-details">
                                    <p class="price">{c.price}</p>
                                    <p class="discount">{c.discount}</p>
                                    <p class="description">{c.description}</p>
                                    <p class="brand">{c.brand}</p>
                                    <p class="category">{c.category}</p>
                                    <p>{c.rating}</p>
                                    <p>{c.stock}</p>
                                </div>
                            </div>
                        }
                    })
            }}
        </Modal>
    }
}
