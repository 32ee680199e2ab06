#![deny(warnings)]

//! Core domain models and invariants for the newbiz business simulation.
//!
//! This crate defines the serializable types shared across the simulation
//! with validation helpers to guarantee basic invariants. All mutation of
//! the [`GameWorld`] aggregate goes through the runtime's serialization
//! point; the types here only enforce structural rules.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

mod snapshot;

pub use snapshot::{CompanySummary, GameSnapshot};

/// Cash every company is seeded with, in whole currency units.
pub const INITIAL_CAPITAL: i64 = 10_000_000;
/// Cost of assembling one finished product.
pub const PRODUCTION_COST_PER_ITEM: i64 = 1_000;
/// Cost of extracting one unit of raw material.
pub const RAW_BASE_EXTRACTION_COST: i64 = 500;
/// Purchase price of one miner.
pub const MINER_BASE_COST: i64 = 100_000;
/// Raw-material units a single miner can extract per request.
pub const MINER_OUTPUT: u64 = 1;
/// Purchase price of one production line.
pub const PRODUCTION_LINE_COST: i64 = 200_000;
/// Finished products a single production line can assemble per request.
pub const PRODUCTION_LINE_CAPACITY: u64 = 200;
/// Default interest rate applied to loans when the caller names none.
pub const DEFAULT_LOAN_RATE_PCT: i64 = 12;

/// Raw materials tradable on the market board.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Wood,
    Metal,
    Cloth,
    Plastic,
}

impl Material {
    /// All materials, in canonical order.
    pub const ALL: [Material; 4] = [
        Material::Wood,
        Material::Metal,
        Material::Cloth,
        Material::Plastic,
    ];

    /// Lowercase display name, matching the wire encoding.
    pub fn name(self) -> &'static str {
        match self {
            Material::Wood => "wood",
            Material::Metal => "metal",
            Material::Cloth => "cloth",
            Material::Plastic => "plastic",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unique identifier for a company, e.g. "company-3".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque capability token identifying one connected session.
///
/// Issued by the runtime at connection time and threaded through every
/// call; ownership checks compare tokens, never transport identifiers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product tier, determining the per-unit warehousing fee at settlement.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProductTier {
    Low,
    Mid,
    High,
}

impl ProductTier {
    /// Warehousing fee charged per stored finished product at year end.
    pub fn warehouse_rate(self) -> i64 {
        match self {
            ProductTier::Low => 50,
            ProductTier::Mid => 100,
            ProductTier::High => 150,
        }
    }
}

/// A mining rig. Ages one year at every settlement; book value depreciates
/// with age down to a 20% floor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Miner {
    pub id: String,
    /// Acquisition cost, the base for depreciation.
    pub cost: i64,
    /// Raw-material units extractable per request.
    pub output: u64,
    /// Whole years since acquisition.
    pub age: u32,
}

/// An assembly line turning raw materials into finished products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionLine {
    pub id: String,
    pub cost: i64,
    /// Finished products assemblable per request.
    pub capacity: u64,
    pub age: u32,
}

/// An outstanding loan. Principal plus interest falls due at the year-end
/// settlement in which the remaining term runs out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub principal: i64,
    /// Interest rate over the whole term, e.g. 0.12.
    pub rate: Decimal,
    /// Term agreed at issue, in years.
    pub term_years: u32,
    /// Years left before repayment; always <= `term_years`.
    pub remaining_years: u32,
}

/// A standing sell order for a raw material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketListing {
    pub id: String,
    pub seller: CompanyId,
    pub material: Material,
    /// Remaining quantity; a listing that reaches 0 leaves the board.
    pub qty: u64,
    pub unit_price: i64,
    /// Wall-clock posting time, for display only. Matching tie-breaks use
    /// board insertion order, never this timestamp.
    pub posted_at: DateTime<Utc>,
}

/// A demand sink that buys finished products from companies.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiMarket {
    pub name: String,
    /// Wealth multiplier on perceived customer value.
    pub wealth: Decimal,
    /// Population multiplier on perceived customer value.
    pub population: Decimal,
    /// Preferred material; products consuming it enjoy a 1.2x demand bonus.
    pub preference: Material,
}

/// Country-level business cycle, derived each year from the trailing
/// average total assets of resident companies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BusinessCycle {
    Normal,
    Boom,
    Overheat,
    Recession,
}

impl BusinessCycle {
    /// Advisory price/sales multiplier associated with the cycle label.
    /// Pass-through context for pricing extensions; the matching and sale
    /// formulas do not apply it.
    pub fn multiplier(self) -> Decimal {
        match self {
            BusinessCycle::Normal => Decimal::new(100, 2),
            BusinessCycle::Boom => Decimal::new(110, 2),
            BusinessCycle::Overheat => Decimal::new(125, 2),
            BusinessCycle::Recession => Decimal::new(90, 2),
        }
    }
}

/// A country hosting companies, with a resource specialization and a
/// derived business-cycle label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub resource: Material,
    pub cycle: BusinessCycle,
    pub multiplier: Decimal,
}

/// One simulated company.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Display name recorded at claim time; cleared on release.
    pub player_name: Option<String>,
    /// Name of the hosting country.
    pub country: String,
    /// Cash balance in whole currency units. Signed: asset purchases may
    /// overdraw it; extraction, production, sale, and settlement never do.
    pub cash: i64,
    pub inventory_products: u64,
    pub inventory_raw: BTreeMap<Material, u64>,
    pub miners: Vec<Miner>,
    pub production_lines: Vec<ProductionLine>,
    pub loans: Vec<Loan>,
    /// Cumulative R&D spend; reset by the trial year.
    pub rnd_spent: i64,
    /// Non-negative, monotonically non-decreasing except via trial reset.
    pub brand_value: Decimal,
    pub product_base_value: Decimal,
    pub product_tier: ProductTier,
    /// The two materials the company's product formula consumes.
    pub product_raws: [Material; 2],
    /// Controlling session, if claimed. At most one at a time.
    pub owner: Option<SessionId>,
    /// Derived snapshot of cash + depreciated assets + inventory valuation.
    pub total_assets: i64,
}

impl Company {
    /// Raw inventory held for `material` (0 when never stocked).
    pub fn raw_inventory(&self, material: Material) -> u64 {
        self.inventory_raw.get(&material).copied().unwrap_or(0)
    }

    /// Add raw inventory for `material`.
    pub fn add_raw(&mut self, material: Material, qty: u64) {
        *self.inventory_raw.entry(material).or_insert(0) += qty;
    }

    /// Combined extraction output across all miners.
    pub fn total_miner_output(&self) -> u64 {
        self.miners.iter().map(|m| m.output).sum()
    }

    /// Combined assembly capacity across all production lines.
    pub fn total_line_capacity(&self) -> u64 {
        self.production_lines.iter().map(|l| l.capacity).sum()
    }

    /// Buy a miner at list price. Debits cash unconditionally.
    pub fn add_miner(&mut self, id: String) -> Miner {
        let miner = Miner {
            id,
            cost: MINER_BASE_COST,
            output: MINER_OUTPUT,
            age: 0,
        };
        self.cash -= miner.cost;
        self.miners.push(miner.clone());
        miner
    }

    /// Buy a production line at list price. Debits cash unconditionally.
    pub fn add_production_line(&mut self, id: String) -> ProductionLine {
        let line = ProductionLine {
            id,
            cost: PRODUCTION_LINE_COST,
            capacity: PRODUCTION_LINE_CAPACITY,
            age: 0,
        };
        self.cash -= line.cost;
        self.production_lines.push(line.clone());
        line
    }

    /// Take out a loan, crediting the principal immediately.
    pub fn take_loan(
        &mut self,
        id: String,
        principal: i64,
        term_years: u32,
        rate: Decimal,
    ) -> Loan {
        let loan = Loan {
            id,
            principal,
            rate,
            term_years,
            remaining_years: term_years,
        };
        self.cash += principal;
        self.loans.push(loan.clone());
        loan
    }
}

/// Immutable game configuration, fixed once a game starts. Replaced only
/// by an explicit restart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub companies: u32,
    pub countries: u32,
    /// Total years to play, trial year included.
    pub years: u32,
    /// 1-based index of the practice year whose outcomes are discarded;
    /// 0 disables the trial round.
    pub trial_year_index: u32,
    pub initial_capital: i64,
    /// Seed for the deterministic RNG driving events and price estimates.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            companies: 6,
            countries: 8,
            years: 4,
            trial_year_index: 1,
            initial_capital: INITIAL_CAPITAL,
            rng_seed: 42,
        }
    }
}

/// Partial configuration overrides applied on top of [`GameConfig`] at
/// start. Absent fields keep the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(default)]
    pub companies: Option<u32>,
    #[serde(default)]
    pub countries: Option<u32>,
    #[serde(default)]
    pub years: Option<u32>,
    #[serde(default)]
    pub trial_year_index: Option<u32>,
    #[serde(default)]
    pub initial_capital: Option<i64>,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl ConfigPatch {
    /// Merge the patch into `base`, returning the effective configuration.
    pub fn apply(self, base: GameConfig) -> GameConfig {
        GameConfig {
            companies: self.companies.unwrap_or(base.companies),
            countries: self.countries.unwrap_or(base.countries),
            years: self.years.unwrap_or(base.years),
            trial_year_index: self.trial_year_index.unwrap_or(base.trial_year_index),
            initial_capital: self.initial_capital.unwrap_or(base.initial_capital),
            rng_seed: self.rng_seed.unwrap_or(base.rng_seed),
        }
    }
}

/// Government fiscal parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GovernmentConfig {
    /// Tax rate applied to the year's profit indicator.
    pub tax_rate: Decimal,
}

impl Default for GovernmentConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(20, 2),
        }
    }
}

/// A stochastic government event drawn during a year advance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// One-off payout split across the companies of one country.
    Subsidy { country: String, amount: i64 },
    /// Announced bulk purchase order at a premium over the estimated price.
    GovernmentOrder {
        material: Material,
        qty: u64,
        unit_price: i64,
    },
}

/// One record per elapsed year, capturing the government events that fired.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub year: u32,
    pub events: Vec<GameEvent>,
    pub recorded_at: DateTime<Utc>,
}

/// Errors surfaced by the game engine.
///
/// Insufficient funds or resources are never errors: operations report a
/// reduced realized quantity instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GameError {
    /// The aggregate has not been initialized with `start` yet.
    #[error("the game has not been started")]
    NotStarted,
    /// All configured years have been played out.
    #[error("all {0} configured years have been played")]
    GameComplete(u32),
    /// Unknown company id.
    #[error("unknown company: {0}")]
    CompanyNotFound(CompanyId),
    /// Claim conflict: the company is controlled by another session.
    #[error("company {company} is already claimed by {occupant}")]
    AlreadyOwned {
        company: CompanyId,
        /// Display name of the current occupant.
        occupant: String,
    },
    /// The requesting session does not control the company.
    #[error("session does not control company {0}")]
    NotOwner(CompanyId),
    /// A listing must offer a positive quantity at a positive price.
    #[error("invalid listing: {0}")]
    InvalidListing(&'static str),
    /// An action message could not be parsed into a known action.
    #[error("invalid action: {0}")]
    InvalidAction(String),
    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// An internal structural invariant does not hold.
    #[error("invariant violated: {0}")]
    Invariant(&'static str),
}

/// Fixed demand-sink roster: (name, wealth x100, population x100).
const AI_MARKET_DEFS: [(&str, i64, i64); 4] = [
    ("Market A", 110, 120),
    ("Market B", 90, 100),
    ("Market C", 120, 80),
    ("Market D", 100, 110),
];

/// Top-level aggregate: every piece of mutable game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameWorld {
    pub config: GameConfig,
    pub government: GovernmentConfig,
    /// Current year; 0 before the first advance.
    pub year: u32,
    /// Whether the current year is the discarded practice round.
    pub is_trial: bool,
    pub companies: BTreeMap<CompanyId, Company>,
    /// Active sell listings per material, in board insertion order.
    pub listings: BTreeMap<Material, Vec<MarketListing>>,
    pub ai_markets: Vec<AiMarket>,
    pub countries: Vec<Country>,
    pub history: Vec<HistoryEntry>,
    next_id: u64,
}

impl GameWorld {
    /// Seed a fresh world: AI markets with random material preferences,
    /// countries with round-robin resource specializations, and companies
    /// each holding one miner and one production line bought from their
    /// starting capital.
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        validate_config(&config)?;

        let ai_markets = AI_MARKET_DEFS
            .iter()
            .map(|&(name, wealth, population)| AiMarket {
                name: name.to_string(),
                wealth: Decimal::new(wealth, 2),
                population: Decimal::new(population, 2),
                preference: *Material::ALL
                    .choose(rng)
                    .expect("material roster is non-empty"),
            })
            .collect();

        let countries: Vec<Country> = (0..config.countries)
            .map(|i| Country {
                name: format!("Country {}", i + 1),
                resource: Material::ALL[i as usize % Material::ALL.len()],
                cycle: BusinessCycle::Normal,
                multiplier: BusinessCycle::Normal.multiplier(),
            })
            .collect();

        let mut world = GameWorld {
            config,
            government: GovernmentConfig::default(),
            year: 0,
            is_trial: false,
            companies: BTreeMap::new(),
            listings: BTreeMap::new(),
            ai_markets,
            countries,
            history: Vec::new(),
            next_id: 0,
        };

        for i in 0..config.companies {
            let id = CompanyId(format!("company-{}", i + 1));
            let country = world.countries[i as usize % world.countries.len()]
                .name
                .clone();
            let raws: Vec<Material> =
                Material::ALL.choose_multiple(rng, 2).copied().collect();
            let mut company = Company {
                id: id.clone(),
                name: id.0.clone(),
                player_name: None,
                country,
                cash: config.initial_capital,
                inventory_products: 0,
                inventory_raw: BTreeMap::new(),
                miners: Vec::new(),
                production_lines: Vec::new(),
                loans: Vec::new(),
                rnd_spent: 0,
                brand_value: Decimal::ZERO,
                product_base_value: Decimal::new(2_500, 0),
                product_tier: ProductTier::Low,
                product_raws: [raws[0], raws[1]],
                owner: None,
                total_assets: config.initial_capital,
            };
            let miner_id = world.next_id("miner");
            company.add_miner(miner_id);
            let line_id = world.next_id("pline");
            company.add_production_line(line_id);
            world.companies.insert(id, company);
        }

        tracing::debug!(
            companies = world.companies.len(),
            countries = world.countries.len(),
            "seeded world"
        );
        Ok(world)
    }

    /// Mint the next unique entity id for the given prefix.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{:06}", self.next_id)
    }

    /// Look up a company.
    pub fn company(&self, id: &CompanyId) -> Result<&Company, GameError> {
        self.companies
            .get(id)
            .ok_or_else(|| GameError::CompanyNotFound(id.clone()))
    }

    /// Look up a company for mutation.
    pub fn company_mut(&mut self, id: &CompanyId) -> Result<&mut Company, GameError> {
        self.companies
            .get_mut(id)
            .ok_or_else(|| GameError::CompanyNotFound(id.clone()))
    }

    /// Active listing board for a material.
    pub fn listings(&self, material: Material) -> &[MarketListing] {
        self.listings.get(&material).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mutable listing board for a material.
    pub fn listings_mut(&mut self, material: Material) -> &mut Vec<MarketListing> {
        self.listings.entry(material).or_default()
    }

    /// Total quantity currently listed for a material.
    pub fn listed_quantity(&self, material: Material) -> u64 {
        self.listings(material).iter().map(|l| l.qty).sum()
    }
}

/// Validate a configuration before it seeds a world.
pub fn validate_config(config: &GameConfig) -> Result<(), GameError> {
    if config.companies == 0 {
        return Err(GameError::InvalidConfig("companies must be >= 1"));
    }
    if config.countries == 0 {
        return Err(GameError::InvalidConfig("countries must be >= 1"));
    }
    if config.years == 0 {
        return Err(GameError::InvalidConfig("years must be >= 1"));
    }
    if config.trial_year_index > config.years {
        return Err(GameError::InvalidConfig(
            "trial year index must not exceed total years",
        ));
    }
    if config.initial_capital <= 0 {
        return Err(GameError::InvalidConfig("initial capital must be positive"));
    }
    Ok(())
}

/// Validate structural invariants of a world, including cross-references.
pub fn validate_world(world: &GameWorld) -> Result<(), GameError> {
    for listings in world.listings.values() {
        for listing in listings {
            if listing.qty == 0 {
                return Err(GameError::Invariant("listing with zero quantity"));
            }
            if listing.unit_price <= 0 {
                return Err(GameError::Invariant("listing with non-positive price"));
            }
            if !world.companies.contains_key(&listing.seller) {
                return Err(GameError::Invariant("listing references unknown seller"));
            }
        }
    }
    for company in world.companies.values() {
        if company.product_raws[0] == company.product_raws[1] {
            return Err(GameError::Invariant("product raws must be distinct"));
        }
        if company.brand_value < Decimal::ZERO {
            return Err(GameError::Invariant("negative brand value"));
        }
        if !world.countries.iter().any(|c| c.name == company.country) {
            return Err(GameError::Invariant("company references unknown country"));
        }
        for loan in &company.loans {
            if loan.remaining_years > loan.term_years {
                return Err(GameError::Invariant("loan term exceeded by remainder"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded_world(seed: u64) -> GameWorld {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        GameWorld::new(GameConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn materials_are_distinct() {
        for (i, a) in Material::ALL.iter().enumerate() {
            for b in &Material::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn config_patch_keeps_unset_fields() {
        let patch = ConfigPatch {
            years: Some(10),
            initial_capital: Some(5_000_000),
            ..ConfigPatch::default()
        };
        let cfg = patch.apply(GameConfig::default());
        assert_eq!(cfg.years, 10);
        assert_eq!(cfg.initial_capital, 5_000_000);
        assert_eq!(cfg.companies, 6);
        assert_eq!(cfg.trial_year_index, 1);
    }

    #[test]
    fn config_rejects_degenerate_values() {
        let mut cfg = GameConfig::default();
        cfg.companies = 0;
        assert!(matches!(
            validate_config(&cfg),
            Err(GameError::InvalidConfig(_))
        ));

        let mut cfg = GameConfig::default();
        cfg.trial_year_index = cfg.years + 1;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = GameConfig::default();
        cfg.initial_capital = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn seeding_buys_one_miner_and_one_line() {
        let world = seeded_world(7);
        assert_eq!(world.companies.len(), 6);
        for company in world.companies.values() {
            assert_eq!(company.miners.len(), 1);
            assert_eq!(company.production_lines.len(), 1);
            assert_eq!(
                company.cash,
                INITIAL_CAPITAL - MINER_BASE_COST - PRODUCTION_LINE_COST
            );
            assert_ne!(company.product_raws[0], company.product_raws[1]);
            assert!(company.owner.is_none());
        }
        assert_eq!(world.year, 0);
        assert!(!world.is_trial);
        assert_eq!(world.ai_markets.len(), 4);
        assert_eq!(world.countries.len(), 8);
        validate_world(&world).unwrap();
    }

    #[test]
    fn next_id_is_unique_and_prefixed() {
        let mut world = seeded_world(1);
        let a = world.next_id("list");
        let b = world.next_id("list");
        assert_ne!(a, b);
        assert!(a.starts_with("list-"));
    }

    #[test]
    fn world_serde_roundtrip() {
        let world = seeded_world(3);
        let text = serde_json::to_string(&world).unwrap();
        let back: GameWorld = serde_json::from_str(&text).unwrap();
        assert_eq!(back, world);
    }

    #[test]
    fn snapshot_hides_session_tokens() {
        let mut world = seeded_world(5);
        let id = CompanyId("company-1".to_string());
        let company = world.companies.get_mut(&id).unwrap();
        company.owner = Some(SessionId("secret-token".to_string()));
        company.player_name = Some("alice".to_string());

        let snapshot = GameSnapshot::capture(&world, 9);
        assert_eq!(snapshot.revision, 9);
        assert_eq!(
            snapshot.companies[&id].owner.as_deref(),
            Some("alice")
        );
        let text = serde_json::to_string(&snapshot).unwrap();
        assert!(!text.contains("secret-token"));
    }

    #[test]
    fn warehouse_rates_follow_tiers() {
        assert_eq!(ProductTier::Low.warehouse_rate(), 50);
        assert_eq!(ProductTier::Mid.warehouse_rate(), 100);
        assert_eq!(ProductTier::High.warehouse_rate(), 150);
    }

    proptest! {
        #[test]
        fn seeded_worlds_validate(
            seed in 0u64..1_000,
            companies in 1u32..12,
            countries in 1u32..10,
        ) {
            let config = GameConfig {
                companies,
                countries,
                ..GameConfig::default()
            };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let world = GameWorld::new(config, &mut rng).unwrap();
            prop_assert_eq!(world.companies.len(), companies as usize);
            prop_assert!(validate_world(&world).is_ok());
        }
    }
}
