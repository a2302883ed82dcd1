//! Model loading and persistence.
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐
//! │ Vec<Record>  │  │  JSON array  │  │  Post envelopes     │
//! │ (in memory)  │  │  (file)      │  │  (one or more files)│
//! └──────┬───────┘  └──────┬───────┘  └──────────┬──────────┘
//!        │                 │                     │
//!        ▼                 ▼                     ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ModelFormat trait                     │
//! │  - read(&[u8]) -> Result<Model>                          │
//! │  - write(&Model) -> Result<Vec<u8>>                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use syster_lpg::interchange::{load_from_file, save_to_file};
//!
//! let model = load_from_file("kerbal.json", Default::default(), Default::default())?;
//! save_to_file(&model, "kerbal-copy.json")?;
//! ```

mod envelope;
mod error;
mod format;
mod records;

pub use envelope::PostEnvelopes;
pub use error::InterchangeError;
pub use format::{FormatCapability, ModelFormat};
pub use records::JsonRecords;

use crate::model::{MetamodelHints, Model, ModelOptions, Record};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Build a model from records already in flat form.
pub fn load_from_records(
    records: impl IntoIterator<Item = Record>,
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
) -> Result<Model, InterchangeError> {
    JsonRecords::new(hints, options).read_records(records)
}

/// Load a model from a JSON array of records on disk.
pub fn load_from_file(
    path: impl AsRef<Path>,
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
) -> Result<Model, InterchangeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let mut model = JsonRecords::new(hints, options).read(&bytes)?;
    model.set_origin(display_path(path));
    debug!("Loaded {} element(s) from {}", model.element_count(), path.display());
    Ok(model)
}

/// Load a model from an in-memory post-envelope document.
pub fn load_from_post_envelope(
    input: &[u8],
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
) -> Result<Model, InterchangeError> {
    PostEnvelopes::new(hints, options).read(input)
}

/// Load and concatenate several post-envelope files into one model.
pub fn load_from_post_files<P: AsRef<Path>>(
    paths: &[P],
    hints: Arc<MetamodelHints>,
    options: ModelOptions,
) -> Result<Model, InterchangeError> {
    let contents = paths
        .iter()
        .map(|path| std::fs::read(path.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let mut model =
        PostEnvelopes::new(hints, options).read_many(contents.iter().map(Vec::as_slice))?;
    let origin = paths
        .iter()
        .map(|p| display_path(p.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    model.set_origin(origin);
    Ok(model)
}

/// Write every resolved element back out as a JSON array.
///
/// Overwriting an existing file and saving an empty model are allowed but
/// logged as warnings.
pub fn save_to_file(model: &Model, path: impl AsRef<Path>) -> Result<(), InterchangeError> {
    let path = path.as_ref();
    if model.is_empty() {
        warn!("Saving an empty model to {}", path.display());
    }
    if path.exists() {
        warn!("Overwriting existing file {}", path.display());
    }
    let bytes = JsonRecords::default().write(model)?;
    std::fs::write(path, bytes)?;
    debug!("Saved {} element(s) to {}", model.element_count(), path.display());
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// Supported file extensions for interchange formats.
pub fn supported_extensions() -> &'static [&'static str] {
    &["json", "jsonld"]
}
