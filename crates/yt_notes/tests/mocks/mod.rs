pub mod generator;
pub mod synthesizer;
pub mod transcript_provider;
pub mod translator;
