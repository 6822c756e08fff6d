use std::collections::BTreeMap;

use crate::error::DataError;
use rondo_proto::ScalarValue;

/// One record from the data-retrieval collaborator, keyed by column name.
pub type Row = BTreeMap<String, ScalarValue>;

/// Retrieval window for [`DataSource::select`]. `page` is zero-based.
#[derive(Debug, Clone, Default)]
pub struct SelectParams {
    pub sort: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

/// The data-retrieval/update collaborator consumed by data-bound
/// components. Implementations wrap whatever storage the host uses; the
/// core only needs these two shapes.
pub trait DataSource: Send + Sync {
    fn select(&self, params: &SelectParams) -> Result<Vec<Row>, DataError>;

    fn total_rows(&self) -> Result<usize, DataError>;

    fn update(&self, key: &ScalarValue, values: &Row) -> Result<usize, DataError>;

    fn delete(&self, key: &ScalarValue) -> Result<usize, DataError>;
}

/// Credential collaborator consumed by the login component.
pub trait CredentialValidator: Send + Sync {
    fn validate(&self, user: &str, password: &str) -> bool;
}
