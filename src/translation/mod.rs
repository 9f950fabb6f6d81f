/*!
 * Translation of caption texts.
 *
 * This module is split into several submodules:
 *
 * - `core`: Service turning texts and documents into their translation
 * - `batch`: Chunking, multiplexed requests and the halving fallback
 * - `informal`: Everyday-register rewriting for Indonesian output
 */

// Re-export main types for easier usage
pub use self::batch::{BatchTranslator, ChunkLimits, IndexedText};
pub use self::core::TranslationService;
pub use self::informal::{formalize_to_informal, InformalStyle};

// Submodules
pub mod batch;
pub mod core;
pub mod informal;
