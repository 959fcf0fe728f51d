//! Generation passes.
//!
//! - [`collection`]: Pass 1 - turn the symbol stream into method descriptors
//! - [`binding`]: Pass 2 - resolve marshaling rules and C symbols for the whole batch

pub mod binding;
pub mod collection;

pub use binding::{BoundMethod, BoundParameter, ExportSymbols, ImportSymbols, MethodSymbols, bind};
pub use collection::DescriptorCollector;
