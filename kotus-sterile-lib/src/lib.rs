pub mod types;
pub mod error;
pub mod taxonomy;
pub mod xml;
pub mod persist;
pub mod corpus;
pub mod filter;
pub mod derivation;
pub mod output;
pub mod pipeline;

pub use corpus::Corpus;
pub use derivation::{Matcher, Thresholds};
pub use error::SterileError;
pub use filter::filter_categories;
pub use pipeline::{run, RunConfig};
pub use taxonomy::Taxonomy;
pub use types::{DerivationPair, Entry, RunSummary, Sense, ThresholdReport};
