//! Product grid and cards.

use catalog_core::ProductId;
use leptos::prelude::*;

use crate::view::ProductCardModel;

#[component]
pub fn ProductGrid(cards: Vec<ProductCardModel>, on_select: Callback<ProductId>) -> impl IntoView {
    view! {
        <div class="products-list">
            {cards
                .into_iter()
                .map(|card| view! { <ProductCard card=card on_select=on_select/> })
                .collect::<Vec<_>>()}
        </div>
    }
}

#[component]
pub fn ProductCard(card: ProductCardModel, on_select: Callback<ProductId>) -> impl IntoView {
    let ProductCardModel {
        id,
        thumbnail,
        title,
        price,
        description,
        category,
        rating,
        stock,
    } = card;
    let key_id = id.clone();

    // Focusable so the modal can hand focus back to the card on close.
    view! {
        <div
            class="product-card"
            style="cursor: pointer"
            role="button"
            tabindex="0"
            on:click=move |_| on_select.run(id.clone())
            on:keydown=move |ev| {
                if ev.key() == "Enter" || ev.key() == " " {
                    ev.prevent_default();
                    on_select.run(key_id.clone());
                }
            }
        >
            <img src=thumbnail alt=title.clone() class="product-thumbnail"/>
            <h3>{title}</h3>
            <p class="price">{price}</p>
            <p class="description">{description}</p>
            <p class="category">{category}</p>
            <p>{rating}</p>
            <p>{stock}</p>
        </div>
    }
}
