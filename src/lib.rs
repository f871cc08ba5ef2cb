//! # DeFi Dojo - Gamified DeFi Training Quests
//!
//! DeFi Dojo teaches decentralized-finance concepts through simulated
//! training quests. Participants work through ordered steps, earn XP with
//! difficulty-scaled time bonuses, collect completion badges, and compete
//! on a leaderboard.
//!
//! ## Features
//!
//! - **Quest Progress Engine**: Pure computation from step completions to
//!   progress percentage, completion state, and XP payout with time-bonus
//!   tiers. Deterministic via an injected clock.
//! - **Quest Catalog**: Sled-backed catalog seeded with the four canonical
//!   DeFi training quests (Liquidity Kata through DeFi Ninja).
//! - **XP & Badge Ledger**: Per-participant XP tally and an
//!   authorization-gated badge mint, one badge per quest.
//! - **Leaderboard**: Deterministic XP ranking with badge counts.
//! - **CLI**: A thin local front-end in `src/main.rs`; the library itself
//!   is an in-process contract with no wire format.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use defidojo::dojo::{self, DojoStore, SystemClock};
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = DojoStore::open("./data/dojo")?;
//!     let clock = SystemClock;
//!
//!     dojo::start_quest(&store, &clock, "alice", "liquidity-kata")?;
//!     let (run, event) = dojo::complete_step(&store, &clock, "alice", "liquidity-kata", 1)?;
//!     assert!(event.is_none(), "three steps to go");
//!     assert_eq!(run.completed_step_ids.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`dojo`] - Quest engine, catalog, storage, ledger, and leaderboard
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Identifier validation for the service boundary
//!
//! ## Concurrency
//!
//! The engine is pure and synchronous. Callers must serialize operations
//! per `(participant, quest)` pair; the library provides no locking of its
//! own.

pub mod config;
pub mod dojo;
pub mod validation;
