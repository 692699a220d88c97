//! Vehicle trajectory construction for the preemption study's route maps.
//!
//! Position samples arrive as table rows of (scenario, ev, lon, lat). This
//! crate groups them per (scenario, entity) pair, preserving the row order
//! that encodes the driving direction, and converts each group into a line
//! geometry ready for map rendering.
//!
//! # Modules
//!
//! - [`record`]: position sample rows as read from the table
//! - [`builder`]: grouping of samples into line geometries
//! - [`view`]: map view centering from the boundary entity
//!
//! # Examples
//!
//! ```
//! use preemptviz_trajectory::{
//!     builder::{DegeneratePolicy, build_trajectories},
//!     record::PositionRecord,
//! };
//!
//! let rows = vec![
//!     PositionRecord::new("turin", "vehev1", 7.68, 45.07),
//!     PositionRecord::new("turin", "vehev1", 7.69, 45.08),
//! ];
//! let trajectories = build_trajectories(&rows, DegeneratePolicy::Skip).unwrap();
//! assert_eq!(trajectories.len(), 1);
//! ```

pub mod builder;
pub mod record;
pub mod view;
