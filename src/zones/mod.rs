//! Board zones and geometry.
//!
//! ## Key Types
//!
//! - `SpotRef`: A location in one of the four zones (base, track, home, center)
//! - `PegRef`: A specific peg (owner + index)
//! - `Topology`: Seat to track-offset arithmetic for 4/6/8-arm boards
//! - `Occupancy`: Which peg stands on which exclusive spot

pub mod occupancy;
pub mod spot;
pub mod topology;

pub use occupancy::Occupancy;
pub use spot::{PegRef, SpotRef, HOME_LENGTH};
pub use topology::{Topology, ARM_LENGTH};
