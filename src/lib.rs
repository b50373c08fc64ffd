//! txtview
//!
//! Terminal reader for large text files. A chunked line indexer records
//! where every line starts without decoding the whole file; a virtual
//! viewport loads and renders only the lines near the scroll position.
//!
//! Pure core (`index`, `document`, `view_state`, `progress`, `reader`)
//! with an impure shell (`view`, `logging`, `source`).

pub mod config;
pub mod document;
pub mod index;
pub mod logging;
pub mod model;
pub mod progress;
pub mod reader;
pub mod source;
pub mod view;
pub mod view_state;
