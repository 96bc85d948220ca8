//! Sheet-driven content for a character-rigging service site: CSV ingestion
//! per section, section normalizers, and the order-form price quote.

pub mod clipboard;
pub mod config;
pub mod fetch;
pub mod media;
pub mod quote;
pub mod sections;
pub mod table;

pub use config::Config;
pub use fetch::{load_all, load_section, FetchError, SectionState, SiteContent};
pub use quote::{compute, EffectKind, PricingSelection, QuoteResult, UnitLine};
pub use table::{parse, Record};
