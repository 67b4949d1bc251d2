//! Terminal rendering for list items.

use owo_colors::OwoColorize;

use crate::types::{Category, Locale, Order, OrderItem, OrderStatus, Product, Promotion};

/// Maximum description width before truncation.
const DESCRIPTION_WIDTH: usize = 60;

/// A list item that can be rendered as one terminal row.
pub trait RenderItem {
    fn render_line(&self, locale: Locale) -> String;
}

pub fn format_status_colored(status: Option<OrderStatus>, code: u32) -> String {
    let Some(status) = status else {
        return format!("[status {code}]").dimmed().to_string();
    };
    let badge = format!("[{status}]");
    match status {
        OrderStatus::Pending => badge.yellow().to_string(),
        OrderStatus::Confirmed => badge.cyan().to_string(),
        OrderStatus::Shipped => badge.magenta().to_string(),
        OrderStatus::Completed => badge.green().to_string(),
        OrderStatus::Cancelled | OrderStatus::Rejected => badge.red().to_string(),
    }
}

pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{cut}…")
}

impl RenderItem for Product {
    fn render_line(&self, locale: Locale) -> String {
        let id = format!("{:>6}", self.id);
        let mut line = format!("{} {}", id.cyan(), self.p_name.bold());

        let price = self.effective_price();
        if price < self.p_price {
            line.push_str(&format!(
                "  {} {}",
                format_price(self.p_price).dimmed().strikethrough(),
                format_price(price).green()
            ));
        } else {
            line.push_str(&format!("  {}", format_price(price).green()));
        }

        if let Some(shop) = self.shop_name.as_deref().or(self.m_name.as_deref()) {
            line.push_str(&format!("  {}", format!("@{shop}").dimmed()));
        }

        let description = self.description(locale);
        if !description.is_empty() {
            line.push_str(&format!(" - {}", truncate(description, DESCRIPTION_WIDTH)));
        }
        line
    }
}

impl RenderItem for OrderItem {
    fn render_line(&self, _locale: Locale) -> String {
        let order_no = format!("{:>10}", self.order_no);
        let mut line = format!(
            "{} {} {} x{} {}",
            order_no.cyan(),
            format_status_colored(self.order_status(), self.status),
            self.name,
            self.quantity,
            self.total.green()
        );
        if let Some(date) = &self.order_date {
            line.push_str(&format!("  {}", date.dimmed()));
        }
        if let Some(driver) = &self.driver {
            line.push_str(&format!("  {}", format!("driver: {}", driver.name).dimmed()));
        }
        line
    }
}

impl RenderItem for Order {
    fn render_line(&self, _locale: Locale) -> String {
        let order_no = format!("{:>10}", self.order_no);
        let mut line = format!(
            "{} {} {} item(s) {}",
            order_no.cyan(),
            format_status_colored(self.order_status(), self.status),
            self.order_items.len(),
            self.grand_total.green()
        );
        if let Some(date) = &self.date {
            line.push_str(&format!("  {}", date.dimmed()));
        }
        line
    }
}

impl RenderItem for Promotion {
    fn render_line(&self, locale: Locale) -> String {
        let id = format!("{:>6}", self.id);
        let mut line = format!("{} {}", id.cyan(), self.name.bold());
        let description = self.description(locale);
        if !description.is_empty() {
            line.push_str(&format!(" - {}", truncate(description, DESCRIPTION_WIDTH)));
        }
        line
    }
}

impl RenderItem for Category {
    fn render_line(&self, _locale: Locale) -> String {
        let id = format!("{:>6}", self.id);
        format!("{} {}", id.cyan(), self.name.bold())
    }
}
