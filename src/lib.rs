// src/lib.rs

// word2tensor: converts word2vec models to the TSV tensor + metadata file
// pair the TensorBoard Embedding Projector loads.

pub mod exporter;
pub mod keyed_vectors;
pub mod runtime_interface;
