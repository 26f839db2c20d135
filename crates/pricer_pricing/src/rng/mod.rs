//! # Random Number Generation
//!
//! Seeded generators for the path simulator.
//!
//! - **Reproducibility**: every path owns a generator seeded from the run seed
//!   and its path index, so results do not depend on thread scheduling
//! - **Efficiency**: zero-allocation batch fills into `&mut [f64]` slices
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::for_path(12345, 3);
//! assert_eq!(rng.seed(), 12348);
//!
//! let mut buffer = vec![0.0; 4];
//! rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::{InnovationSampler, PricerRng};
