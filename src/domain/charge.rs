use super::order::PricedLine;

/// Provider limit on `item_details[].name`, in characters.
pub const ITEM_NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub order_id: String,
    pub gross_amount: i64,
    pub items: Vec<ChargeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeItem {
    pub id: String,
    pub price: i64,
    pub quantity: i32,
    pub name: String,
}

impl ChargeItem {
    pub fn from_line(line: &PricedLine) -> Self {
        Self {
            id: line.menu_id.to_string(),
            price: line.unit_price,
            quantity: line.qty,
            name: line.name.chars().take(ITEM_NAME_MAX_CHARS).collect(),
        }
    }
}

impl ChargeRequest {
    pub fn new(order_id: &str, gross_amount: i64, lines: &[PricedLine]) -> Self {
        Self {
            order_id: order_id.to_string(),
            gross_amount,
            items: lines.iter().map(ChargeItem::from_line).collect(),
        }
    }
}

/// What the diner uses to pay. Both fields empty means the order exists
/// but no payment link could be obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayableReference {
    pub qr_url: Option<String>,
    pub redirect_url: Option<String>,
}

impl PayableReference {
    pub fn is_empty(&self) -> bool {
        self.qr_url.is_none() && self.redirect_url.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(name: &str) -> PricedLine {
        PricedLine {
            menu_id: 7,
            name: name.to_string(),
            unit_price: 25_000,
            qty: 2,
        }
    }

    #[test]
    fn long_names_are_truncated_to_provider_limit() {
        let item = ChargeItem::from_line(&priced(&"x".repeat(80)));
        assert_eq!(item.name.chars().count(), ITEM_NAME_MAX_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let name = "é".repeat(60);
        let item = ChargeItem::from_line(&priced(&name));
        assert_eq!(item.name, "é".repeat(ITEM_NAME_MAX_CHARS));
    }

    #[test]
    fn short_names_are_untouched() {
        let item = ChargeItem::from_line(&priced("Latte"));
        assert_eq!(item.name, "Latte");
        assert_eq!(item.id, "7");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, 25_000);
    }

    #[test]
    fn reference_with_either_link_is_not_empty() {
        assert!(PayableReference::default().is_empty());
        assert!(!PayableReference {
            qr_url: Some("https://x/qr".to_string()),
            redirect_url: None,
        }
        .is_empty());
    }
}
