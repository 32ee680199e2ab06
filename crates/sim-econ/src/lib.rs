#![deny(warnings)]

//! Economic ruleset for the newbiz simulation.
//!
//! Pure per-company operations: extraction, production, sale to a demand
//! sink, year-end settlement, asset valuation, and business-cycle
//! classification. Insufficient cash or resources is never an error —
//! every operation clips to what the company can afford and reports the
//! realized quantity.

pub mod market;

pub use market::{apply_fills, match_buy, post_listing, Fill, PurchaseOutcome};

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sim_core::{
    AiMarket, BusinessCycle, Company, GameConfig, GovernmentConfig, Material,
    PRODUCTION_COST_PER_ITEM, RAW_BASE_EXTRACTION_COST,
};

/// Estimated market unit price for a material: a fixed base with ±10%
/// uniform noise, floored at 1.
///
/// The material does not differentiate the base yet; it is part of the
/// contract so per-material pricing can land without touching callers.
pub fn estimate_unit_price(rng: &mut impl Rng, _material: Material) -> i64 {
    let base = 1_000.0;
    let var = (rng.gen::<f64>() - 0.5) * 0.2;
    ((base * (1.0 + var)) as i64).max(1)
}

/// Result of an extraction request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// The company owns no miners; nothing changed.
    NoMiner,
    /// `qty` units were extracted for `cost` in total.
    Extracted { qty: u64, cost: i64 },
}

/// Extract raw `material`.
///
/// Output is capped by the combined miner output, then by affordability:
/// extraction never drives cash below 0.
pub fn extract(company: &mut Company, material: Material, requested: u64) -> ExtractionOutcome {
    let output = company.total_miner_output();
    if output == 0 {
        return ExtractionOutcome::NoMiner;
    }
    let mut qty = requested.min(output);
    if qty as i64 * RAW_BASE_EXTRACTION_COST > company.cash {
        qty = (company.cash.max(0) / RAW_BASE_EXTRACTION_COST) as u64;
    }
    let cost = qty as i64 * RAW_BASE_EXTRACTION_COST;
    company.cash -= cost;
    company.add_raw(material, qty);
    ExtractionOutcome::Extracted { qty, cost }
}

/// Result of a production request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProductionOutcome {
    /// The company owns no production lines; nothing changed.
    NoLine,
    /// `qty` finished products were assembled for `cost` in total.
    Produced { qty: u64, cost: i64 },
}

/// Assemble finished products.
///
/// Bounded by line capacity, by the scarcer of the two product raws, and
/// by affordability. Both raws are consumed by the same realized
/// quantity, floored at 0.
pub fn produce(company: &mut Company, requested: u64) -> ProductionOutcome {
    let capacity = company.total_line_capacity();
    if capacity == 0 {
        return ProductionOutcome::NoLine;
    }
    let by_raw = company
        .product_raws
        .iter()
        .map(|&r| company.raw_inventory(r))
        .min()
        .unwrap_or(0);
    let mut qty = requested.min(capacity).min(by_raw);
    if qty as i64 * PRODUCTION_COST_PER_ITEM > company.cash {
        qty = (company.cash.max(0) / PRODUCTION_COST_PER_ITEM) as u64;
    }
    let cost = qty as i64 * PRODUCTION_COST_PER_ITEM;
    for material in company.product_raws {
        let held = company.inventory_raw.entry(material).or_insert(0);
        *held = held.saturating_sub(qty);
    }
    company.cash -= cost;
    company.inventory_products += qty;
    ProductionOutcome::Produced { qty, cost }
}

/// Result of offering the finished inventory to one market.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub qty_sold: u64,
    pub revenue: i64,
}

/// Sell finished products to `market` at `unit_price`.
///
/// Perceived customer value is `base value × wealth × population ×
/// material bonus × (1 + brand / 200)`, with a 1.2 bonus when the
/// market's preferred material is one of the company's product raws.
/// Asking at or below that value clears the whole inventory; asking
/// above it clears only the `value / price` fraction.
pub fn sell_to_market(company: &mut Company, market: &AiMarket, unit_price: i64) -> SaleOutcome {
    if company.inventory_products == 0 {
        return SaleOutcome {
            qty_sold: 0,
            revenue: 0,
        };
    }
    let price = unit_price.max(0);
    let bonus = if company.product_raws.contains(&market.preference) {
        Decimal::new(12, 1)
    } else {
        Decimal::ONE
    };
    let customer_value = company.product_base_value
        * market.wealth
        * market.population
        * bonus
        * (Decimal::ONE + company.brand_value / Decimal::new(200, 0));

    let qty_sold = if Decimal::from(price) <= customer_value {
        company.inventory_products
    } else {
        let ratio = customer_value / Decimal::from(price);
        (Decimal::from(company.inventory_products) * ratio)
            .trunc()
            .to_u64()
            .unwrap_or(0)
    };

    let revenue = qty_sold as i64 * price;
    company.inventory_products -= qty_sold;
    company.cash += revenue;
    company.brand_value += Decimal::from(qty_sold) * Decimal::new(1, 3);
    SaleOutcome { qty_sold, revenue }
}

/// Depreciated book value of a capital asset:
/// `cost × max(0.2, 1 − 0.2 × age)`.
pub fn depreciated_value(cost: i64, age: u32) -> Decimal {
    let factor =
        (Decimal::ONE - Decimal::new(2, 1) * Decimal::from(age)).max(Decimal::new(2, 1));
    Decimal::from(cost) * factor
}

/// Pure valuation of a company: cash + depreciated asset book value +
/// inventory at cost. Does not mutate; see [`refresh_total_assets`].
pub fn company_asset_value(company: &Company) -> i64 {
    let mut fixed = Decimal::ZERO;
    for miner in &company.miners {
        fixed += depreciated_value(miner.cost, miner.age);
    }
    for line in &company.production_lines {
        fixed += depreciated_value(line.cost, line.age);
    }
    let inventory = company.inventory_products as i64 * PRODUCTION_COST_PER_ITEM
        + company.inventory_raw.values().map(|&q| q as i64).sum::<i64>()
            * RAW_BASE_EXTRACTION_COST;
    company.cash + fixed.trunc().to_i64().unwrap_or(0) + inventory
}

/// Recompute and store the derived total-assets snapshot.
pub fn refresh_total_assets(company: &mut Company) -> i64 {
    company.total_assets = company_asset_value(company);
    company.total_assets
}

/// Year-end settlement report, returned for observability.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub loans_repaid: u32,
    pub tax_paid: i64,
    pub warehouse_fee: i64,
    pub total_assets: i64,
}

/// Settle one company at year end.
///
/// Order matters for the cash floor: loans fall due first, then profit
/// tax, then the warehousing fee; every subtraction floors cash at 0.
/// Assets then age by one year and the total-assets snapshot is
/// refreshed. Settlement never fails.
pub fn settle_year(
    company: &mut Company,
    config: &GameConfig,
    government: &GovernmentConfig,
) -> SettlementReport {
    let mut loans_repaid = 0u32;
    let mut kept = Vec::with_capacity(company.loans.len());
    for mut loan in std::mem::take(&mut company.loans) {
        if loan.remaining_years <= 1 {
            let repayment = (Decimal::from(loan.principal) * (Decimal::ONE + loan.rate))
                .trunc()
                .to_i64()
                .unwrap_or(0);
            company.cash = (company.cash - repayment).max(0);
            loans_repaid += 1;
        } else {
            loan.remaining_years -= 1;
            kept.push(loan);
        }
    }
    company.loans = kept;

    let profit_indicator = (company.cash - config.initial_capital).max(0);
    let tax_paid = (Decimal::from(profit_indicator) * government.tax_rate)
        .trunc()
        .to_i64()
        .unwrap_or(0);
    company.cash = (company.cash - tax_paid).max(0);

    let warehouse_fee =
        company.inventory_products as i64 * company.product_tier.warehouse_rate();
    company.cash = (company.cash - warehouse_fee).max(0);

    for miner in &mut company.miners {
        miner.age += 1;
    }
    for line in &mut company.production_lines {
        line.age += 1;
    }

    let total_assets = refresh_total_assets(company);
    tracing::debug!(
        company = %company.id,
        tax_paid,
        warehouse_fee,
        total_assets,
        "settled year"
    );
    SettlementReport {
        loans_repaid,
        tax_paid,
        warehouse_fee,
        total_assets,
    }
}

/// Classify a country's business cycle from the average total assets of
/// its resident companies relative to the starting capital.
pub fn classify_cycle(avg_assets: Decimal, initial_capital: i64) -> BusinessCycle {
    let capital = Decimal::from(initial_capital);
    if avg_assets > capital * Decimal::new(15, 1) {
        BusinessCycle::Overheat
    } else if avg_assets > capital * Decimal::new(11, 1) {
        BusinessCycle::Boom
    } else if avg_assets < capital * Decimal::new(8, 1) {
        BusinessCycle::Recession
    } else {
        BusinessCycle::Normal
    }
}
