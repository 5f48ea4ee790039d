//! Tree persistence.
//!
//! Trees are stored as JSON documents following [`TreeSchema`]. Floats are
//! written with full round-trip precision, so a reloaded tree predicts
//! exactly what the original did.
//!
//! ```no_run
//! # use rsstree::Tree;
//! # fn demo(tree: &Tree) -> Result<(), rsstree::persist::PersistError> {
//! tree.save("tree.json")?;
//! let restored = Tree::load("tree.json")?;
//! assert_eq!(&restored, tree);
//! # Ok(())
//! # }
//! ```

mod convert;
mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::repr::Tree;

pub use schema::{NodeSchema, SplitSchema, TreeSchema, FORMAT_VERSION};

/// Errors raised while saving or loading a tree.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid tree: {0}")]
    Invalid(String),
}

/// Write `tree` as pretty-printed JSON.
pub fn save_json<W: Write>(tree: &Tree, writer: W) -> Result<(), PersistError> {
    serde_json::to_writer_pretty(writer, &TreeSchema::from(tree))?;
    Ok(())
}

/// Read and validate a tree written by [`save_json`].
pub fn load_json<R: Read>(reader: R) -> Result<Tree, PersistError> {
    let schema: TreeSchema = serde_json::from_reader(reader)?;
    Tree::try_from(schema)
}

pub fn save_json_file(tree: &Tree, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(File::create(path)?);
    save_json(tree, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load_json_file(path: impl AsRef<Path>) -> Result<Tree, PersistError> {
    load_json(BufReader::new(File::open(path)?))
}
