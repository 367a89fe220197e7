//! Filesystem adapters.

mod local;
mod memory;

pub use local::LocalFilesystem;
pub use memory::MemoryFilesystem;

use std::path::{Path, PathBuf};

use ehrgen_core::{
    application::ports::Filesystem,
    domain::{DomainValidator, OutputTree},
    error::EhrGenResult,
};

/// Write every file of `tree` below `root`, creating parent directories.
///
/// Returns the written paths relative to `root`, in tree order.
pub fn write_tree(fs: &dyn Filesystem, root: &Path, tree: &OutputTree) -> EhrGenResult<Vec<PathBuf>> {
    DomainValidator::validate_output_tree(tree)?;

    let mut written = Vec::with_capacity(tree.len());
    for file in tree.files() {
        let path = file.path.under(root);
        if let Some(parent) = path.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.write_file(&path, &file.content)?;
        written.push(file.path.as_path().to_path_buf());
    }
    Ok(written)
}
