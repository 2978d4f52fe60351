//! Domain normalization, categorization and credibility scoring.
//!
//! - [`normalize`]: reduces a raw host or URL to its registrable host string.
//! - [`classifier`]: assigns each normalized domain exactly one
//!   [`DomainCategory`](crate::models::DomainCategory) using ordered rules.
//! - [`score`]: static category → credibility weight lookup.

pub mod classifier;
pub mod normalize;
pub mod score;
