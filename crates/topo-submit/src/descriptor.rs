use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::{Builder, TempPath};
use topo_model::SubmissionDescriptor;
use tracing::debug;

use crate::SubmitError;

/// File name prefix of descriptor files.
pub const DESCRIPTOR_PREFIX: &str = "splpytmp";

/// File name suffix of descriptor files.
pub const DESCRIPTOR_SUFFIX: &str = ".json";

/// A descriptor written to disk.
///
/// The file is closed and can be opened by path. It is deleted when this
/// value is dropped, unless [`DescriptorFile::keep`] is called first.
#[derive(Debug)]
pub struct DescriptorFile {
    path: TempPath,
}

impl DescriptorFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting any failure.
    pub fn remove(self) -> io::Result<()> {
        self.path.close()
    }

    /// Leave the file on disk and return its path.
    pub fn keep(self) -> io::Result<PathBuf> {
        self.path.keep().map_err(|e| e.error)
    }
}

/// Write the canonical encoding of `descriptor` to a new file in `dir`.
///
/// The file is named `splpytmp<random>.json`.
pub fn write_descriptor(
    descriptor: &SubmissionDescriptor,
    dir: &Path,
) -> Result<DescriptorFile, SubmitError> {
    let encoded = descriptor.to_json_pretty()?;

    let mut file = Builder::new()
        .prefix(DESCRIPTOR_PREFIX)
        .suffix(DESCRIPTOR_SUFFIX)
        .tempfile_in(dir)
        .map_err(SubmitError::Descriptor)?;
    file.write_all(encoded.as_bytes())
        .and_then(|_| file.flush())
        .map_err(SubmitError::Descriptor)?;

    let path = file.into_temp_path();
    debug!(path = %path.display(), bytes = encoded.len(), "descriptor written");
    Ok(DescriptorFile { path })
}
