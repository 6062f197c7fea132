//! Turn a `period -> correlation` mapping into a two-column table.

use tabkit_core::prelude::{Column, RowBatch, Scalar};

use crate::traits::OpError;

/// Build a table with one row per `(period, correlation)` entry.
///
/// Rows follow the iteration order of `entries`, so pass an ordered map
/// (`BTreeMap`) or a `Vec` of pairs when order matters. Values are copied
/// as-is; no range checking is done.
pub fn create_correlation_df<I, K, V>(
    entries: I,
    year_col: &str,
    corr_col: &str,
) -> Result<RowBatch, OpError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Scalar>,
    V: Into<Scalar>,
{
    let (periods, values): (Vec<Scalar>, Vec<Scalar>) = entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .unzip();

    tracing::trace!(rows = periods.len(), year_col, corr_col, "built correlation table");

    Ok(RowBatch::new(vec![
        Column::new(year_col, periods),
        Column::new(corr_col, values),
    ])?)
}
