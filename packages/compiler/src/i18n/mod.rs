//! I18n Module
//!
//! Phrase detection, key building and the runtime side of translation

pub mod escape;
pub mod extractor;
pub mod flags;
pub mod fold;
pub mod helpers;
pub mod phrase;
pub mod translation;

pub use escape::{escape, quote_literal, unescape};
pub use extractor::{CatalogFormat, PhraseCatalog};
pub use flags::propagate_flags;
pub use fold::{FoldKind, FoldRule, FoldTable, SENTINEL_CLOSE, SENTINEL_OPEN};
pub use helpers::{internationalize_folds, internationalize_helpers};
pub use phrase::{assemble_phrases, Phrase, Segment};
pub use translation::{
    current_translator, register_translator, translate, translate_with_wrappers, Interpolator,
    MessageTable, Translator, UNTRANSLATED_MARKER,
};
