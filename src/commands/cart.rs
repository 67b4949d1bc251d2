//! Cart commands.
//!
//! Every command loads the saved carts into a [`Store`], applies its change
//! through the store and saves the result.

use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::display::format_price;
use crate::error::{Result, StorefrontError};
use crate::store::{Cart, CartBook, CartItem, Store};

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Total")]
    total: String,
}

fn cart_table(cart: &Cart) -> String {
    let rows: Vec<CartRow> = cart
        .items
        .iter()
        .map(|item| CartRow {
            id: item.id,
            name: item.name.clone(),
            price: format_price(item.price),
            quantity: item.quantity,
            total: format_price(item.line_total()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn cart_json(user: &str, cart: &Cart) -> serde_json::Value {
    json!({
        "user": user,
        "merchant_id": cart.merchant_id(),
        "items": cart.items,
        "total_items": cart.total_items(),
        "total_price": cart.total_price(),
    })
}

fn load_store() -> Result<Store<CartBook>> {
    Ok(Store::new(CartBook::load()?))
}

fn save_store(store: &Store<CartBook>) -> Result<()> {
    store.read(CartBook::save)
}

/// Show the active user's cart
pub fn cmd_cart_show(output: OutputOptions) -> Result<()> {
    let book = CartBook::load()?;
    let cart = book.current().cloned().unwrap_or_default();
    let user = book.user_id();

    let text = if cart.is_empty() {
        format!("{}", format!("Cart for {user} is empty.").dimmed())
    } else {
        format!(
            "{}\n{}\n{} item(s), total {}",
            format!("Cart for {user}").cyan().bold(),
            cart_table(&cart),
            cart.total_items(),
            format_price(cart.total_price()).green()
        )
    };

    CommandOutput::new(cart_json(user, &cart))
        .with_text(text)
        .print(output)
}

/// Add an item to the active user's cart
pub fn cmd_cart_add(item: CartItem, output: OutputOptions) -> Result<()> {
    let store = load_store()?;
    let name = item.name.clone();
    let quantity = item.quantity;

    let mut replaced = false;
    store.update(|book| replaced = book.current_mut().add_item(item));
    save_store(&store)?;

    let mut text = String::new();
    if replaced {
        text.push_str(&format!(
            "{}\n",
            "Cart held items from another merchant and was cleared.".yellow()
        ));
    }
    text.push_str(&format!("Added {} x{}", name.cyan(), quantity));

    let (user, cart) = store.read(|b| (b.user_id().to_string(), b.current().cloned()));
    let cart = cart.unwrap_or_default();
    CommandOutput::new(json!({
        "action": "cart_add",
        "replaced": replaced,
        "cart": cart_json(&user, &cart),
    }))
    .with_text(text)
    .print(output)
}

/// Set an item's quantity; zero removes it
pub fn cmd_cart_update(id: u64, quantity: u32, output: OutputOptions) -> Result<()> {
    let store = load_store()?;
    let mut result = Ok(());
    store.update(|book| result = book.current_mut().update_quantity(id, quantity));
    result?;
    save_store(&store)?;

    let text = if quantity == 0 {
        format!("Removed item {}", id.to_string().cyan())
    } else {
        format!("Set item {} quantity to {}", id.to_string().cyan(), quantity)
    };
    CommandOutput::new(json!({
        "action": "cart_update",
        "id": id,
        "quantity": quantity,
    }))
    .with_text(text)
    .print(output)
}

/// Remove an item from the active user's cart
pub fn cmd_cart_remove(id: u64, output: OutputOptions) -> Result<()> {
    let store = load_store()?;
    let mut result = Err(StorefrontError::CartItemNotFound(id));
    store.update(|book| result = book.current_mut().remove_item(id));
    let removed = result?;
    save_store(&store)?;

    CommandOutput::new(json!({
        "action": "cart_remove",
        "id": id,
        "name": removed.name,
    }))
    .with_text(format!("Removed {}", removed.name.cyan()))
    .print(output)
}

/// Empty the active user's cart
pub fn cmd_cart_clear(output: OutputOptions) -> Result<()> {
    let store = load_store()?;
    store.update(|book| book.current_mut().clear());
    save_store(&store)?;

    let user = store.read(|b| b.user_id().to_string());
    CommandOutput::new(json!({
        "action": "cart_clear",
        "user": user,
    }))
    .with_text(format!("Cleared cart for {user}"))
    .print(output)
}

/// Switch to a user, merging the guest cart into theirs
pub fn cmd_cart_login(user_id: &str, output: OutputOptions) -> Result<()> {
    let store = load_store()?;
    store.update(|book| book.login(user_id));
    save_store(&store)?;

    let total = store.read(|b| b.current().map(Cart::total_items).unwrap_or_default());
    CommandOutput::new(json!({
        "action": "cart_login",
        "user": user_id,
        "total_items": total,
    }))
    .with_text(format!("Switched to {} ({} item(s) in cart)", user_id.cyan(), total))
    .print(output)
}

/// Return to the guest cart
pub fn cmd_cart_logout(output: OutputOptions) -> Result<()> {
    let store = load_store()?;
    store.update(CartBook::logout);
    save_store(&store)?;

    CommandOutput::new(json!({ "action": "cart_logout" }))
        .with_text("Switched to guest cart")
        .print(output)
}
