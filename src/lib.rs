#![forbid(unsafe_code)]

//! TypeScript interface generation from an exported object-model type graph.
//!
//! The input is a *type universe* — a JSON export of every type the external
//! class enumerator materialized — plus a configuration bundle. The output
//! is one `.ts` file per requested type (an interface, or a union alias for
//! enumerations) with correct relative imports, and one `index.ts` barrel
//! per generated directory.

pub mod config;
pub mod error;
pub mod generator;
pub mod model;

pub use config::{DateMapping, EnumStyle, GeneratorConfig};
pub use error::GenerateError;
pub use generator::{GenerationSummary, generate};
