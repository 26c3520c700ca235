//*** START FILE: src/parsing/mod.rs ***//
pub mod segmenter;

// Re-export the main parsing function for convenience
pub use segmenter::segment;
//*** END FILE: src/parsing/mod.rs ***//
