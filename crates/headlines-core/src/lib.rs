//! Core of the headline scorer: data model, error taxonomy, the embed/classify
//! contract, and the file input/output shared by the CLI and the HTTP service.

pub mod error;
pub mod input;
pub mod label;
pub mod output;
pub mod pipeline;

pub use error::{InputError, ModelLoadError, OutputError, ScoringError, Stage};
pub use input::{ensure_input_exists, read_headlines};
pub use label::{Label, ScoredHeadline};
pub use output::{output_file_name, read_scores, write_scores};
pub use pipeline::{Classify, Embed, Models, score};
