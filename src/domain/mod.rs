//! Domain layer: the lexicon document model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod xml;

pub use entities::{EntryView, LexicalDatabase, SenseView};
pub use error::DomainError;
pub use xml::{Document, Element, XmlNode};
