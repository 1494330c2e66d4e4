//! # rngsieve-core
//!
//! Generator plumbing for the rngsieve test battery.
//!
//! Every generator under test implements the [`RngSource`] trait: uniform
//! 32-bit draws, explicit reseeding and a name. Tests never reach for a
//! global generator; they receive `&mut dyn RngSource` and pull bits through
//! a [`BitStream`], which hands them out most-significant first across
//! successive draws.
//!
//! ## Quick Start
//!
//! ```
//! use rngsieve_core::{BitStream, create_generator};
//!
//! // "counter" returns seed, seed + 1, ... so the bits are predictable.
//! let mut rng = create_generator("counter", 0x0102_0304).unwrap();
//! let mut bits = BitStream::new(rng.as_mut());
//! assert_eq!(bits.next_byte(), 0x01);
//! assert_eq!(bits.next_bits(4), 0x0);
//! assert_eq!(bits.next_bits(4), 0x2);
//! assert_eq!(bits.next_bits(16), 0x0304);
//! assert_eq!(bits.next_bits(32), 0x0102_0305);
//! ```

pub mod bits;
pub mod error;
pub mod generators;
pub mod source;

pub use bits::{BitStream, get_bits};
pub use error::SourceError;
pub use generators::{
    Counter, Lcg64, Randu, SmallRngSource, StdRngSource, available_generators, create_generator,
    random_seed, resolve_seed,
};
pub use source::{GeneratorInfo, GeneratorQuality, RngSource};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
