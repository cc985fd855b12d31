//! HDF5-backed array store for seismic velocity models and seismograms
//!
//! Velocity models and synthetic seismograms travel between tools as a
//! two-level hierarchy: a store file holds named groups, and each group
//! holds named f32 array datasets. This crate wraps the `hdf5` bindings
//! in that vocabulary so the rest of the toolkit never touches raw
//! object handles.

#![deny(missing_docs)]
#![warn(clippy::all)]

use std::path::{Path, PathBuf};

use log::debug;
use ndarray::{ArrayD, ArrayViewD};

pub mod error;

pub use error::{Result, StoreError};

/// A store file holding named groups of array datasets
#[derive(Debug)]
pub struct Store {
    file: hdf5::File,
    path: PathBuf,
}

impl Store {
    /// Open an existing store read-only
    ///
    /// Fails with [`StoreError::NotFound`] if the path does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::not_found(path.display().to_string()));
        }
        let file = hdf5::File::open(path)?;
        debug!("Opened store {} read-only", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Create a new store, failing if the path already exists
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StoreError::already_exists(path.display().to_string()));
        }
        let file = hdf5::File::create_excl(path)?;
        debug!("Created store {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Create a new store, replacing any existing file at the path
    pub fn truncate(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = hdf5::File::create(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Open a store for writing, creating it if it does not exist
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = hdf5::File::append(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Path this store was opened at
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all top-level groups, sorted
    ///
    /// Top-level members that are not groups are ignored.
    pub fn group_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .file
            .member_names()?
            .into_iter()
            .filter(|name| self.file.group(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Open a group by name
    pub fn group(&self, name: &str) -> Result<ArrayGroup> {
        let group = self
            .file
            .group(name)
            .map_err(|_| StoreError::group_not_found(name))?;
        Ok(ArrayGroup {
            group,
            name: name.to_string(),
        })
    }

    /// Create a group, or open it if it already exists
    pub fn ensure_group(&self, name: &str) -> Result<ArrayGroup> {
        let group = match self.file.group(name) {
            Ok(group) => group,
            Err(_) => self.file.create_group(name)?,
        };
        Ok(ArrayGroup {
            group,
            name: name.to_string(),
        })
    }

    /// All top-level groups, sorted by name
    pub fn groups(&self) -> Result<Vec<ArrayGroup>> {
        self.group_names()?
            .iter()
            .map(|name| self.group(name))
            .collect()
    }

    /// Total number of datasets across all top-level groups
    pub fn leaf_dataset_count(&self) -> Result<usize> {
        let mut count = 0;
        for group in self.groups()? {
            count += group.dataset_names()?.len();
        }
        Ok(count)
    }
}

/// A named group of f32 array datasets inside a [`Store`]
#[derive(Debug)]
pub struct ArrayGroup {
    group: hdf5::Group,
    name: String,
}

impl ArrayGroup {
    /// Name of this group
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all datasets in this group, sorted
    ///
    /// Members that are not datasets (e.g. nested groups) are ignored.
    pub fn dataset_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .group
            .member_names()?
            .into_iter()
            .filter(|name| self.group.dataset(name).is_ok())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Shape of a dataset without reading its contents
    pub fn shape(&self, name: &str) -> Result<Vec<usize>> {
        Ok(self.dataset(name)?.shape())
    }

    /// Read a dataset as a dynamic-dimensional f32 array
    pub fn read(&self, name: &str) -> Result<ArrayD<f32>> {
        self.dataset(name)?
            .read_dyn::<f32>()
            .map_err(|err| StoreError::invalid_dataset(name, err.to_string()))
    }

    /// Write an f32 array as a new dataset
    pub fn write(&self, name: &str, data: ArrayViewD<'_, f32>) -> Result<()> {
        self.group
            .new_dataset_builder()
            .with_data(data)
            .create(name)?;
        Ok(())
    }

    fn dataset(&self, name: &str) -> Result<hdf5::Dataset> {
        self.group
            .dataset(name)
            .map_err(|_| StoreError::DatasetNotFound {
                name: name.to_string(),
                group: self.name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn sample_array() -> ArrayD<f32> {
        Array2::from_shape_fn((4, 5), |(i, j)| (i * 5 + j) as f32).into_dyn()
    }

    #[test]
    fn test_create_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.h5");

        let store = Store::create(&path).unwrap();
        let group = store.ensure_group("vp1").unwrap();
        let data = sample_array();
        group.write("real0", data.view()).unwrap();
        drop(store);

        let store = Store::open(&path).unwrap();
        let group = store.group("vp1").unwrap();
        assert_eq!(group.shape("real0").unwrap(), vec![4, 5]);
        assert_eq!(group.read("real0").unwrap(), data);
    }

    #[test]
    fn test_open_missing_store() {
        let dir = tempdir().unwrap();
        let err = Store::open(dir.path().join("missing.h5")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn test_create_refuses_existing_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.h5");
        Store::create(&path).unwrap();
        let err = Store::create(&path).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn test_group_and_dataset_names_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.h5");
        let store = Store::create(&path).unwrap();

        let second = store.ensure_group("vp2").unwrap();
        let first = store.ensure_group("vp1").unwrap();
        let data = sample_array();
        second.write("real1", data.view()).unwrap();
        second.write("real0", data.view()).unwrap();
        first.write("real0", data.view()).unwrap();

        assert_eq!(store.group_names().unwrap(), vec!["vp1", "vp2"]);
        assert_eq!(second.dataset_names().unwrap(), vec!["real0", "real1"]);
        assert_eq!(store.leaf_dataset_count().unwrap(), 3);
    }

    #[test]
    fn test_missing_group_and_dataset() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.h5");
        let store = Store::create(&path).unwrap();
        store.ensure_group("vp1").unwrap();

        let err = store.group("nope").unwrap_err();
        assert!(matches!(err, StoreError::GroupNotFound { .. }));

        let group = store.group("vp1").unwrap();
        let err = group.read("nope").unwrap_err();
        assert!(matches!(err, StoreError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_append_preserves_existing_groups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("models.h5");

        let store = Store::create(&path).unwrap();
        let group = store.ensure_group("vp1").unwrap();
        group.write("real0", sample_array().view()).unwrap();
        drop(store);

        let store = Store::append(&path).unwrap();
        let group = store.ensure_group("vp1").unwrap();
        group.write("real1", sample_array().view()).unwrap();
        drop(store);

        let store = Store::open(&path).unwrap();
        assert_eq!(store.leaf_dataset_count().unwrap(), 2);
    }
}
