//! OgmaNeo actor layer.
//!
//! A single reinforcement-learning layer from a sparse predictive hierarchy.
//! The [`Actor`] reads one or more sparse categorical codes (one active cell
//! per column) and produces a sparse hidden code that selects one action per
//! hidden column. Each [`Actor::step`] runs three passes:
//!
//! - **forward**: every hidden cell sums the weights picked out by the active
//!   visible cells in its receptive field;
//! - **inhibit**: each hidden column keeps its highest activation (lowest
//!   index on ties);
//! - **learn** (optional): a temporal-difference update credits the action
//!   taken last step, using the previous step's activations kept in a
//!   double buffer.
//!
//! Passes are dispatched through a [`ComputeSystem`], either
//! [`SerialSystem`] or the rayon-backed [`ParallelSystem`].
//!
//! ```
//! use ogmaneo::{Actor, Int3, Params, SerialSystem, VisibleLayerDesc};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let mut actor = Actor::new();
//! actor
//!     .init_random(
//!         Int3::new(2, 2, 4),
//!         vec![VisibleLayerDesc { size: Int3::new(4, 4, 8), radius: 1 }],
//!         &mut rng,
//!     )
//!     .unwrap();
//!
//! let input = vec![3i32; 16];
//! let taken = vec![0i32; 4];
//! actor
//!     .step(&SerialSystem, &[&input], &taken, 1.0, true, &Params::default())
//!     .unwrap();
//!
//! assert!(actor.get_hidden_cs().iter().all(|&ci| (0..4).contains(&ci)));
//! ```

pub mod actor;
pub mod compute;
pub mod error;
pub mod field;
pub mod helpers;
pub mod kernels;

pub use actor::{Actor, Params, VisibleLayer, VisibleLayerDesc};
pub use compute::{ComputeSystem, ParallelSystem, SerialSystem};
pub use error::{ActorError, Result};
pub use helpers::{Float2, Int2, Int3};
