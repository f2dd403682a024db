// src/runtime_interface.rs

use clap::Parser;
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::exporter;
use crate::keyed_vectors;

// 1. Define CLI Arguments
#[derive(Parser, Debug)]
#[clap(author, version, long_about = None)]
#[clap(about = "Convert a word2vec model to TensorBoard Embedding Projector TSV files")]
struct CliArgs {
    /// Input word2vec model file
    #[clap(short, long, value_parser)]
    input: String,
    /// Output tensor file name prefix
    #[clap(short, long, value_parser)]
    output: String,
    /// Set if the input model is in the word2vec binary format
    #[clap(short, long, action)]
    binary: bool,
}

// 2. Error Handling

// Custom error wrapper to combine the library error types
#[derive(Debug)]
pub enum RuntimeError {
    ModelLoader(keyed_vectors::KeyedVectorsError),
    Exporter(exporter::ExporterError),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::ModelLoader(e) => write!(f, "ModelLoader error: {}", e),
            RuntimeError::Exporter(e) => write!(f, "Exporter error: {}", e),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::ModelLoader(e) => Some(e),
            RuntimeError::Exporter(e) => Some(e),
        }
    }
}

impl From<keyed_vectors::KeyedVectorsError> for RuntimeError {
    fn from(err: keyed_vectors::KeyedVectorsError) -> Self {
        RuntimeError::ModelLoader(err)
    }
}

impl From<exporter::ExporterError> for RuntimeError {
    fn from(err: exporter::ExporterError) -> Self {
        RuntimeError::Exporter(err)
    }
}

// 3. `run_cli` Function
pub fn run_cli() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    // Logs go to stderr so the terminal stays usable in pipelines.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "word2tensor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("loading word2vec model from {}", args.input);
    let model = keyed_vectors::load_word2vec_format(&args.input, args.binary)
        .map_err(RuntimeError::from)?;
    tracing::info!(
        words = model.len(),
        dim = model.dim,
        "model loaded, starting export"
    );

    let artifacts = exporter::export(&model, &args.output).map_err(RuntimeError::from)?;

    tracing::info!("2D tensor file saved to {}", artifacts.tensor_path);
    tracing::info!("tensor metadata file saved to {}", artifacts.metadata_path);

    Ok(())
}
