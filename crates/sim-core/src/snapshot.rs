//! Compact state snapshot: the message contract handed to the transport
//! layer after every successful mutation and on explicit `get_state`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    AiMarket, Company, CompanyId, Country, GameConfig, GameWorld, GovernmentConfig,
    MarketListing, Material, Miner, ProductTier, ProductionLine,
};
use rust_decimal::Decimal;

/// Per-company summary exposed to clients. Carries the occupant's display
/// name, never the session token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
    pub country: String,
    pub cash: i64,
    pub inventory_products: u64,
    pub inventory_raw: BTreeMap<Material, u64>,
    pub miners: Vec<Miner>,
    pub production_lines: Vec<ProductionLine>,
    pub brand_value: Decimal,
    pub owner: Option<String>,
    pub product_base_value: Decimal,
    pub product_tier: ProductTier,
    pub product_raws: [Material; 2],
    pub total_assets: i64,
}

impl CompanySummary {
    /// Summarize one company for the wire.
    pub fn of(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            name: company.name.clone(),
            country: company.country.clone(),
            cash: company.cash,
            inventory_products: company.inventory_products,
            inventory_raw: company.inventory_raw.clone(),
            miners: company.miners.clone(),
            production_lines: company.production_lines.clone(),
            brand_value: company.brand_value,
            owner: company
                .owner
                .as_ref()
                .and_then(|_| company.player_name.clone()),
            product_base_value: company.product_base_value,
            product_tier: company.product_tier,
            product_raws: company.product_raws,
            total_assets: company.total_assets,
        }
    }
}

/// Full compact snapshot broadcast to all observers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Monotonically increasing mutation counter. Observers may assert
    /// freshness by comparing revisions; broadcasts arrive in order.
    pub revision: u64,
    pub year: u32,
    pub is_trial: bool,
    pub companies: BTreeMap<CompanyId, CompanySummary>,
    pub market_listings: BTreeMap<Material, Vec<MarketListing>>,
    pub ai_markets: Vec<AiMarket>,
    pub countries: Vec<Country>,
    pub government: GovernmentConfig,
    pub config: GameConfig,
}

impl GameSnapshot {
    /// Capture the current state of `world` under the given revision.
    pub fn capture(world: &GameWorld, revision: u64) -> Self {
        Self {
            revision,
            year: world.year,
            is_trial: world.is_trial,
            companies: world
                .companies
                .iter()
                .map(|(id, c)| (id.clone(), CompanySummary::of(c)))
                .collect(),
            market_listings: world.listings.clone(),
            ai_markets: world.ai_markets.clone(),
            countries: world.countries.clone(),
            government: world.government,
            config: world.config,
        }
    }
}
