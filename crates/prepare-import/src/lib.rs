//! Batch manifest preparation. The binary only writes the manifest file;
//! callers persisting it in the `Admin` collection pass their own
//! [`AdminStore`].

pub mod admin_object;
pub mod batch_key;
pub mod data_file;
pub mod error;
pub mod file_type;
pub mod files_property;
pub mod metadata;
pub mod mongo_date;
pub mod prepare;
pub mod save;
pub mod store;

pub use admin_object::{AdminId, AdminObject, ParamProperty, UnsupportedFilesError};
pub use batch_key::BatchKey;
pub use data_file::{BatchDirectory, BatchInspector, DataFile};
pub use error::PrepareImportError;
pub use file_type::{extract_file_type_from_filename, ValidFileType};
pub use files_property::{populate_files_property, BatchFile, FilesProperty};
pub use metadata::{extract_file_type_from_metadata, UploadedFileMeta};
pub use mongo_date::MongoDate;
pub use prepare::{prepare_import, prepare_import_from, PreparedImport};
pub use save::save_to_file;
pub use store::{AdminStore, InMemoryAdminStore, ADMIN_COLLECTION};

pub type Result<T> = std::result::Result<T, PrepareImportError>;
