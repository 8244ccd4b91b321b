//! A single slot's product record.

use vendo_core::{Error, Money, Result};

/// Product stored in one grid slot.
///
/// An item with zero stock is still present; an empty slot has no item at
/// all. Cost is never negative and stock can never be adjusted below zero;
/// a rejected adjustment leaves the item untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    name: String,
    cost: Money,
    stock: u32,
}

impl Item {
    /// Create an item.
    ///
    /// # Errors
    /// - `Error::EmptyItemName` if the name is blank.
    /// - `Error::NegativeCost` if the cost is below zero.
    /// - `Error::NegativeStock` if the initial stock is below zero.
    pub fn new(name: impl Into<String>, cost: Money, stock: i64) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::EmptyItemName);
        }
        if cost.is_negative() {
            return Err(Error::NegativeCost);
        }
        let stock = u32::try_from(stock).map_err(|_| Error::NegativeStock)?;

        Ok(Item { name, cost, stock })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn cost(&self) -> Money {
        self.cost
    }

    #[must_use]
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// Replace the unit cost.
    ///
    /// # Errors
    /// `Error::NegativeCost` if the new cost is below zero.
    pub fn set_cost(&mut self, cost: Money) -> Result<()> {
        if cost.is_negative() {
            return Err(Error::NegativeCost);
        }
        self.cost = cost;
        Ok(())
    }

    /// Apply a signed stock adjustment.
    ///
    /// # Errors
    /// `Error::NegativeStock` if the adjustment would take stock below
    /// zero; the current stock is left unchanged in that case.
    pub fn adjust_stock(&mut self, delta: i64) -> Result<()> {
        let adjusted = i64::from(self.stock) + delta;
        self.stock = u32::try_from(adjusted).map_err(|_| Error::NegativeStock)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item() {
        let item = Item::new("Soda", Money::from_dollars(1.5), 10).unwrap();
        assert_eq!(item.name(), "Soda");
        assert_eq!(item.cost(), Money::from_cents(150));
        assert_eq!(item.stock(), 10);
    }

    #[test]
    fn test_new_item_defaults_allow_zero() {
        // Zero-cost items exist (free promotions) and zero stock is a
        // present-but-sold-out slot.
        let item = Item::new("Flyer", Money::ZERO, 0).unwrap();
        assert!(item.cost().is_zero());
        assert_eq!(item.stock(), 0);
    }

    #[test]
    fn test_new_item_rejects_negative_cost() {
        let result = Item::new("Soda", Money::from_cents(-1), 10);
        assert!(matches!(result, Err(Error::NegativeCost)));
    }

    #[test]
    fn test_new_item_rejects_negative_stock() {
        let result = Item::new("Soda", Money::from_cents(150), -1);
        assert!(matches!(result, Err(Error::NegativeStock)));
    }

    #[test]
    fn test_new_item_rejects_blank_name() {
        assert!(matches!(
            Item::new("", Money::ZERO, 0),
            Err(Error::EmptyItemName)
        ));
        assert!(matches!(
            Item::new("   ", Money::ZERO, 0),
            Err(Error::EmptyItemName)
        ));
    }

    #[test]
    fn test_set_cost() {
        let mut item = Item::new("Soda", Money::from_cents(150), 10).unwrap();
        item.set_cost(Money::from_cents(175)).unwrap();
        assert_eq!(item.cost(), Money::from_cents(175));

        let result = item.set_cost(Money::from_cents(-5));
        assert!(matches!(result, Err(Error::NegativeCost)));
        assert_eq!(item.cost(), Money::from_cents(175));
    }

    #[test]
    fn test_adjust_stock() {
        let mut item = Item::new("Soda", Money::from_cents(150), 10).unwrap();

        item.adjust_stock(-2).unwrap();
        assert_eq!(item.stock(), 8);

        item.adjust_stock(5).unwrap();
        assert_eq!(item.stock(), 13);
    }

    #[test]
    fn test_adjust_stock_below_zero_leaves_stock_unchanged() {
        let mut item = Item::new("Soda", Money::from_cents(150), 3).unwrap();
        let result = item.adjust_stock(-4);
        assert!(matches!(result, Err(Error::NegativeStock)));
        assert_eq!(item.stock(), 3);
    }
}
