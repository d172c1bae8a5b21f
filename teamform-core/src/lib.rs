//! # teamform-core: CP-SAT-backed team formation engine
//!
//! Splits a roster of participants into fixed-size teams while maximizing
//! or minimizing weighted objectives over the roster's attributes —
//! clustering participants who share a value, spreading out a numeric
//! attribute, forcing diversity, or matching a team's composition to the
//! roster's overall population split. Internally this is an integer
//! constraint-satisfaction problem, solved with a CP-SAT backend (see
//! [`solver::backend`]).
//!
//! ## Quick example
//!
//! ```no_run
//! use teamform_core::models::{ApiInput, ConstraintKind, ConstraintSpec, Participant, ParticipantId};
//! use teamform_core::solver;
//! use std::collections::HashMap;
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! let mut attributes = HashMap::new();
//! attributes.insert("job".to_string(), serde_json::json!("Manager"));
//! let input = ApiInput {
//!     participants: vec![
//!         Participant { id: ParticipantId::Int(1), attributes: attributes.clone() },
//!         Participant { id: ParticipantId::Int(2), attributes: attributes.clone() },
//!         Participant { id: ParticipantId::Int(3), attributes },
//!     ],
//!     constraints: vec![ConstraintSpec {
//!         attribute: "job".to_string(),
//!         kind: ConstraintKind::Cluster,
//!         weight: 1.0,
//!     }],
//!     target_team_size: 3,
//!     less_than_target: false,
//!     max_time: 10,
//! };
//!
//! let (subscriber, handle) = solver::solve(input, Arc::new(AtomicBool::new(false)));
//! let terminal = subscriber.recv_terminal();
//! handle.join().expect("worker thread should not panic");
//! println!("{terminal:?}");
//! ```

pub mod error;
pub mod models;
pub mod normalizer;
pub mod solver;
pub mod team_sizes;
