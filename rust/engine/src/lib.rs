//! # diemso-engine: Card-Game Score Ledger
//!
//! Scorekeeping for two Vietnamese card games played at a table: Tiến Lên
//! (finishing-order points and pig penalties) and Xì Dách (dealer-vs-players
//! betting). Every scored event is appended to a history that can be undone
//! one round at a time.
//!
//! ## Core Modules
//!
//! - [`player`] - Player identity, names, and running scores
//! - [`ledger`] - Score deltas, round records, history, apply and undo
//! - [`rank`] - Tiến Lên ranking and penalty settlement
//! - [`bet`] - Xì Dách settlement and the round being collected
//! - [`rules`] - Input validation ahead of settlement
//! - [`session`] - Session state and its transitions
//! - [`notify`] - Feedback hooks fired after a transition
//! - [`storage`] - Snapshot persistence
//! - [`errors`] - Error types for session operations
//!
//! ## Quick Start
//!
//! ```rust
//! use diemso_engine::player::{seat_players, PlayerId};
//! use diemso_engine::rank::RankPoints;
//! use diemso_engine::session::SessionState;
//!
//! let players = seat_players(["An", "Binh", "Chi", "Dung"]).unwrap();
//! let order: Vec<PlayerId> = players.iter().map(|p| p.id().clone()).collect();
//!
//! let session = SessionState::new_tien_len(players, RankPoints::default()).unwrap();
//! let settled = session.submit_ranking(&order).unwrap();
//!
//! let scores: Vec<i64> = settled.state.players().iter().map(|p| p.score()).collect();
//! assert_eq!(scores, vec![5, 3, -3, -5]);
//!
//! let (undone, record) = settled.state.undo();
//! assert!(record.is_some());
//! assert!(undone.players().iter().all(|p| p.score() == 0));
//! ```
//!
//! ## Xì Dách Rounds
//!
//! ```rust
//! use diemso_engine::bet::{Outcome, Tier};
//! use diemso_engine::player::seat_players;
//! use diemso_engine::session::SessionState;
//!
//! let players = seat_players(["Dealer", "Phuong", "Quan"]).unwrap();
//! let phuong = players[1].id().clone();
//!
//! let session = SessionState::new_xi_dach(players, None).unwrap();
//! let settled = session
//!     .open_round(10)
//!     .unwrap()
//!     .edit_round(|draft| draft.set_tier(&phuong, Tier::XiDach))
//!     .unwrap()
//!     .settle_round()
//!     .unwrap();
//!
//! assert!(settled.outcome.big_win);
//! assert!(settled.outcome.record.score_changes.is_zero_sum());
//! ```

pub mod bet;
pub mod errors;
pub mod ledger;
pub mod notify;
pub mod player;
pub mod rank;
pub mod rules;
pub mod session;
pub mod storage;
