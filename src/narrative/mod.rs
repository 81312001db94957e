//! @ai:module:intent Narrative analysis model and parser
//! @ai:module:layer domain
//! @ai:module:public_api NarrativeSection, NarrativeSections, NarrativeParser, NarrativeError

pub mod parser;
pub mod sections;

pub use parser::{recognize_heading, NarrativeError, NarrativeParser};
pub use sections::{NarrativeSection, NarrativeSections};
