//! Data model for MiFIR RTS 22 transaction-report generation.
//!
//! This crate is pure configuration and data: the standard field
//! catalog, the user-extensible custom field registry, the tabular
//! dataset model, and the mapping/constants tables that the resolver
//! and assemblers consume. It performs no I/O.

pub mod catalog;
pub mod enums;
pub mod error;
pub mod mapping;
pub mod registry;
pub mod table;

pub use catalog::{FieldCatalog, FieldSpec};
pub use enums::{CustomFieldCategory, CustomFieldType, FieldType, Requirement};
pub use error::{RegistryError, ValueError};
pub use mapping::{CONSTANT_TOKEN, Constants, Mapping, MappingTarget, UNSET_TOKEN};
pub use registry::{CustomFieldRegistry, CustomFieldSpec, DEFAULT_PARENT_ELEMENT};
pub use table::{CellValue, Dataset, RowView};
