#![deny(warnings)]

//! Runtime for the newbiz simulation.
//!
//! Owns the authoritative in-memory aggregate behind a single mutation
//! gateway, arbitrates the company claim/release protocol, dispatches
//! player actions, drives the year-advance state machine, and hands a
//! fresh snapshot to registered observers after every successful
//! mutation.

mod action;
mod turn;

pub use action::{Action, ActionDetail, ActionReceipt};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim_core::{
    CompanyId, CompanySummary, ConfigPatch, GameConfig, GameError, GameSnapshot, GameWorld,
    SessionId,
};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Observer of state snapshots — the boundary the transport's broadcast
/// fan-out plugs into.
///
/// Hooks run on the mutating thread while the store lock is held, so
/// every observer sees snapshots in exactly mutation order, each
/// reflecting the most recently completed mutation. Implementations must
/// not block.
pub trait SnapshotHook: Send {
    fn on_snapshot(&mut self, snapshot: &GameSnapshot);
}

/// A started game: the world plus the seeded RNG service driving its
/// stochastic events and price estimates.
pub(crate) struct ActiveGame {
    pub(crate) world: GameWorld,
    pub(crate) rng: ChaCha8Rng,
}

struct Store {
    game: Option<ActiveGame>,
    revision: u64,
    hooks: Vec<Box<dyn SnapshotHook>>,
    session_rng: ChaCha8Rng,
}

impl Store {
    fn game_mut(&mut self) -> Result<&mut ActiveGame, GameError> {
        self.game.as_mut().ok_or(GameError::NotStarted)
    }

    /// Bump the revision and fan the fresh snapshot out to every hook.
    /// Called after each successful mutation, still under the lock.
    fn publish(&mut self) {
        self.revision += 1;
        if self.hooks.is_empty() {
            return;
        }
        if let Some(game) = &self.game {
            let snapshot = GameSnapshot::capture(&game.world, self.revision);
            for hook in &mut self.hooks {
                hook.on_snapshot(&snapshot);
            }
        }
    }
}

/// Handle to the shared game.
///
/// Cloning is cheap; every clone funnels its mutations through the same
/// internal lock, so concurrent claims, actions, and year advances never
/// interleave partial state. No operation blocks on I/O while the lock
/// is held.
#[derive(Clone)]
pub struct GameHandle {
    store: Arc<Mutex<Store>>,
}

impl Default for GameHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl GameHandle {
    /// Create a handle with no game started. Every operation except
    /// `start` fails with [`GameError::NotStarted`] until the first
    /// successful `start`.
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store {
                game: None,
                revision: 0,
                hooks: Vec::new(),
                session_rng: ChaCha8Rng::from_entropy(),
            })),
        }
    }

    /// Register a broadcast observer. Hooks receive every snapshot
    /// published after registration.
    pub fn add_hook(&self, hook: Box<dyn SnapshotHook>) {
        self.lock().hooks.push(hook);
    }

    /// Mint a fresh session capability token for a new connection.
    pub fn issue_session(&self) -> SessionId {
        let token: u64 = self.lock().session_rng.gen();
        SessionId(format!("session-{token:016x}"))
    }

    /// (Re-)initialize the whole aggregate from the default configuration
    /// with `patch` applied. The previous game, if any, is replaced — not
    /// merged. Returns the effective configuration.
    pub fn start(&self, patch: ConfigPatch) -> Result<GameConfig, GameError> {
        let mut store = self.lock();
        let config = patch.apply(GameConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let world = GameWorld::new(config, &mut rng)?;
        info!(
            companies = config.companies,
            countries = config.countries,
            years = config.years,
            "game initialized"
        );
        store.game = Some(ActiveGame { world, rng });
        store.publish();
        Ok(config)
    }

    /// Read the current compact snapshot. Read-only: the revision does
    /// not change and nothing is broadcast.
    pub fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        let mut store = self.lock();
        let revision = store.revision;
        let game = store.game_mut()?;
        Ok(GameSnapshot::capture(&game.world, revision))
    }

    /// Claim exclusive control of a company for `session`.
    ///
    /// Succeeds if the company is unowned or already owned by the same
    /// session; otherwise fails with [`GameError::AlreadyOwned`] naming
    /// the current occupant.
    pub fn claim_company(
        &self,
        company_id: &CompanyId,
        session: &SessionId,
        display_name: &str,
    ) -> Result<CompanySummary, GameError> {
        let mut store = self.lock();
        let summary = {
            let game = store.game_mut()?;
            let company = game.world.company_mut(company_id)?;
            if let Some(owner) = &company.owner {
                if owner != session {
                    return Err(GameError::AlreadyOwned {
                        company: company_id.clone(),
                        occupant: company
                            .player_name
                            .clone()
                            .unwrap_or_else(|| "another session".to_string()),
                    });
                }
            }
            company.owner = Some(session.clone());
            company.player_name = Some(display_name.to_string());
            info!(company = %company_id, player = display_name, "company claimed");
            CompanySummary::of(company)
        };
        store.publish();
        Ok(summary)
    }

    /// Release a company if `session` is the current owner; a silent
    /// no-op otherwise. Idempotent.
    pub fn release_company(
        &self,
        company_id: &CompanyId,
        session: &SessionId,
    ) -> Result<(), GameError> {
        let mut store = self.lock();
        let released = {
            let game = store.game_mut()?;
            let company = game.world.company_mut(company_id)?;
            if company.owner.as_ref() == Some(session) {
                company.owner = None;
                company.player_name = None;
                info!(company = %company_id, "company released");
                true
            } else {
                false
            }
        };
        if released {
            store.publish();
        }
        Ok(())
    }

    /// Dispatch a player action against a company `session` controls.
    ///
    /// Validation — ownership first — happens before any mutation: a
    /// failed action returns without touching the world and without a
    /// broadcast.
    pub fn player_action(
        &self,
        session: &SessionId,
        company_id: &CompanyId,
        action: Action,
    ) -> Result<ActionReceipt, GameError> {
        let mut store = self.lock();
        let receipt = {
            let game = store.game_mut()?;
            let company = game.world.company(company_id)?;
            if company.owner.as_ref() != Some(session) {
                return Err(GameError::NotOwner(company_id.clone()));
            }
            action::dispatch(game, company_id, action)?
        };
        store.publish();
        Ok(receipt)
    }

    /// Advance the game by one year (see the turn module for the exact
    /// step order). Atomic from the callers' perspective. Returns the new
    /// year number.
    pub fn advance_year(&self) -> Result<u32, GameError> {
        let mut store = self.lock();
        let year = {
            let game = store.game_mut()?;
            turn::advance_year(&mut game.world, &mut game.rng)?
        };
        store.publish();
        Ok(year)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().expect("game store lock poisoned")
    }
}
