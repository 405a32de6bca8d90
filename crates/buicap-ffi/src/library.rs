// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Loading the vendor library and pairing it with its entry-point table.

use std::path::{Path, PathBuf};

use buicap_core::error::{BuicapError, Result};
use libloading::Library;

use crate::signatures::FunctionTable;

/// A scanner library mapped into the process with every entry point
/// resolved.
///
/// Construction is all-or-nothing: either all twelve symbols resolve or
/// the load fails. There is no partially usable handle, so a missing
/// symbol surfaces at load time instead of mid-scan.
#[derive(Debug)]
pub struct VendorLibrary {
    table: FunctionTable,
    path: Option<PathBuf>,
    // Keeps the mapping alive until the table's pointers are unreachable.
    _library: Option<Library>,
}

impl VendorLibrary {
    /// Map the library at `path` and resolve the full entry-point table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(BuicapError::LibraryNotFound(path.to_path_buf()));
        }

        // SAFETY: loading runs the library's initialization routine. The
        // scanner DLL is assumed well-behaved on attach, as with any
        // vendor driver.
        let library = unsafe { Library::new(path) }.map_err(|e| BuicapError::LibraryLoad {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

        // SAFETY: the declared signatures match the vendor's published
        // prototypes.
        let table = unsafe { FunctionTable::resolve(&library)? };

        tracing::info!(path = %path.display(), "scanner library loaded");
        Ok(Self {
            table,
            path: Some(path.to_path_buf()),
            _library: Some(library),
        })
    }

    /// Wrap an entry-point table that already lives in the process, such
    /// as a statically linked vendor build or the virtual scanner.
    ///
    /// The pointers must stay callable for the wrapper's lifetime; tables
    /// built from `fn` items always are.
    pub fn from_table(table: FunctionTable) -> Self {
        Self {
            table,
            path: None,
            _library: None,
        }
    }

    /// The resolved entry points.
    pub fn table(&self) -> &FunctionTable {
        &self.table
    }

    /// Path the library was mapped from, if it came from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported_before_any_load_attempt() {
        let err = VendorLibrary::load("/nonexistent/buicap32.dll").unwrap_err();
        assert!(matches!(err, BuicapError::LibraryNotFound(_)));
    }

    #[test]
    fn non_library_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buicap32.dll");
        std::fs::write(&path, b"not a shared object").unwrap();

        let err = VendorLibrary::load(&path).unwrap_err();
        assert!(matches!(err, BuicapError::LibraryLoad { .. }));
    }

    #[test]
    fn in_process_table_has_no_backing_path() {
        let library = VendorLibrary::from_table(crate::stub::function_table());
        assert!(library.path().is_none());
    }
}
