//! Strongly-typed ids for the coupled discretizations.
//!
//! # Example
//!
//! ```
//! use volmortar::types::{ElementIndex, NodeIndex};
//!
//! let elem = ElementIndex::new(12);
//! let node = NodeIndex::new(12);
//! assert_eq!(elem.get(), node.get());
//! assert_ne!(elem.to_string(), node.to_string());
//! ```

mod indices;

pub use indices::{ElementIndex, NodeIndex};
