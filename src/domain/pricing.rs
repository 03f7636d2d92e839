use std::collections::HashMap;

use super::errors::DomainError;
use super::order::{CheckoutItem, MenuEntry, PricedLine};

/// Sum of `unit_price * qty` over all lines, in integer minor units.
///
/// Negative prices, non-positive quantities and overflow are rejected so the
/// result is always a valid non-negative amount.
pub fn order_total(lines: &[PricedLine]) -> Result<i64, DomainError> {
    lines.iter().try_fold(0i64, |sum, line| {
        if line.unit_price < 0 {
            return Err(DomainError::InvalidInput(format!(
                "menu {} has a negative price",
                line.menu_id
            )));
        }
        if line.qty <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "qty for menu {} must be positive",
                line.menu_id
            )));
        }
        line.unit_price
            .checked_mul(i64::from(line.qty))
            .and_then(|subtotal| sum.checked_add(subtotal))
            .ok_or_else(|| DomainError::InvalidInput("order total is out of range".to_string()))
    })
}

/// Re-prices checkout lines from the catalog. Client-supplied names and
/// prices never reach the result.
pub fn price_lines(
    items: &[CheckoutItem],
    catalog: &HashMap<i64, MenuEntry>,
) -> Result<Vec<PricedLine>, DomainError> {
    items
        .iter()
        .map(|item| {
            let menu = catalog
                .get(&item.menu_id)
                .filter(|m| m.is_active)
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!("unknown menu item {}", item.menu_id))
                })?;
            let qty = i32::try_from(item.qty)
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "qty for menu {} must be a positive integer",
                        item.menu_id
                    ))
                })?;
            if item.price.is_some_and(|p| p != menu.price) {
                log::debug!(
                    "client price for menu {} differs from catalog, using catalog price",
                    menu.id
                );
            }
            Ok(PricedLine {
                menu_id: menu.id,
                name: menu.name.clone(),
                unit_price: menu.price,
                qty,
            })
        })
        .collect()
}
