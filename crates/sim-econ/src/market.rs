//! Greedy price-ordered matching over the per-material listing board.
//!
//! The engine only reserves quantity; it never moves currency. Callers
//! apply the returned fills, crediting sellers immediately (see
//! [`apply_fills`]), which keeps the matching step side-effect-minimal
//! and testable in isolation.

use serde::{Deserialize, Serialize};
use sim_core::{Company, CompanyId, GameError, MarketListing, Material};
use std::collections::BTreeMap;

/// One fill produced by matching: `qty` units reserved from `seller`'s
/// listing at that listing's unit price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub listing_id: String,
    pub seller: CompanyId,
    pub qty: u64,
    pub unit_price: i64,
}

/// Aggregate result of applying a batch of fills for one buyer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub qty: u64,
    pub spent: i64,
}

/// Append a listing to the board.
///
/// The engine validates only that the offer is non-empty at a positive
/// price; anything beyond that is the caller's responsibility.
pub fn post_listing(
    board: &mut Vec<MarketListing>,
    listing: MarketListing,
) -> Result<(), GameError> {
    if listing.qty == 0 {
        return Err(GameError::InvalidListing("quantity must be positive"));
    }
    if listing.unit_price <= 0 {
        return Err(GameError::InvalidListing("unit price must be positive"));
    }
    board.push(listing);
    Ok(())
}

/// Match a buy request for `requested` units at up to `max_unit_price`
/// per unit against the board.
///
/// Listings are visited cheapest first; ties go to the earlier posting.
/// The board is updated in place: matched quantity comes off each listing
/// and exhausted listings leave the board.
///
/// Guarantees: the fills never total more than `requested`, every fill
/// price is <= `max_unit_price`, and no listing is oversold.
pub fn match_buy(
    board: &mut Vec<MarketListing>,
    requested: u64,
    max_unit_price: i64,
) -> Vec<Fill> {
    let mut order: Vec<usize> = (0..board.len()).collect();
    // Stable sort: equal prices keep board insertion order.
    order.sort_by_key(|&i| board[i].unit_price);

    let mut fills = Vec::new();
    let mut remaining = requested;
    for i in order {
        if remaining == 0 {
            break;
        }
        let listing = &mut board[i];
        if listing.unit_price > max_unit_price {
            break;
        }
        let take = remaining.min(listing.qty);
        fills.push(Fill {
            listing_id: listing.id.clone(),
            seller: listing.seller.clone(),
            qty: take,
            unit_price: listing.unit_price,
        });
        listing.qty -= take;
        remaining -= take;
    }
    board.retain(|l| l.qty > 0);
    fills
}

/// Apply a batch of fills: credit each seller immediately and
/// unconditionally, then debit the buyer and stock the bought raws.
///
/// A buyer may match its own listing; the cash movement nets to zero and
/// the inventory still transfers off the board.
pub fn apply_fills(
    companies: &mut BTreeMap<CompanyId, Company>,
    buyer: &CompanyId,
    material: Material,
    fills: &[Fill],
) -> Result<PurchaseOutcome, GameError> {
    if !companies.contains_key(buyer) {
        return Err(GameError::CompanyNotFound(buyer.clone()));
    }
    let mut qty = 0u64;
    let mut spent = 0i64;
    for fill in fills {
        let proceeds = fill.qty as i64 * fill.unit_price;
        if let Some(seller) = companies.get_mut(&fill.seller) {
            seller.cash += proceeds;
        }
        qty += fill.qty;
        spent += proceeds;
    }
    let buyer = companies
        .get_mut(buyer)
        .ok_or_else(|| GameError::CompanyNotFound(buyer.clone()))?;
    buyer.cash -= spent;
    buyer.add_raw(material, qty);
    Ok(PurchaseOutcome { qty, spent })
}
