use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info, instrument, trace};
use tracing_error::SpanTrace;

use crate::domain::{NULL_VALUE, StoreError};
use crate::planner::{OrderBy, QueryRequest};
use crate::state::SortDirection;

/// One result row: projected columns in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    /// Rows matching the predicate, before offset and limit.
    pub total_count: usize,
}

/// Anything that can answer a [`QueryRequest`]: SQL, a remote API, or the
/// in-memory [`FrameStore`].
pub trait DataStore {
    fn query(&self, request: &QueryRequest) -> Result<QueryResult, StoreError>;
}

impl<T: DataStore + ?Sized> DataStore for Arc<T> {
    fn query(&self, request: &QueryRequest) -> Result<QueryResult, StoreError> {
        (**self).query(request)
    }
}

#[derive(Debug)]
enum FileType {
    Csv,
    Parquet,
    Arrow,
}

#[derive(Debug)]
struct StoreColumn {
    name: String,
    dtype: DataType,
    data: Vec<String>,
}

/// An in-memory store over a data file, every cell held as its display string.
#[derive(Debug)]
pub struct FrameStore {
    name: String,
    columns: Vec<StoreColumn>,
    nrows: usize,
}

impl FrameStore {
    /// Loads a CSV, Parquet or Arrow IPC file, picked by extension.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        let file_type = Self::file_type(&path)?;
        let frame = match file_type {
            FileType::Csv => Self::load_csv(&path),
            FileType::Parquet => Self::load_parquet(&path),
            FileType::Arrow => Self::load_arrow(&path),
        };
        let df = frame
            .and_then(|f| f.collect())
            .map_err(|source| StoreError::Load {
                path: path.clone(),
                source,
                span_trace: SpanTrace::capture(),
            })?;

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("???")
            .to_string();
        Self::from_frame(name, &df)
    }

    /// Materialises every column as strings, one rayon task per column.
    pub fn from_frame(name: impl Into<String>, df: &DataFrame) -> Result<Self, StoreError> {
        let start_time = Instant::now();
        let columns: Result<Vec<StoreColumn>, PolarsError> = df
            .get_column_names()
            .par_iter()
            .map(|name| Self::load_column(df, name))
            .collect();
        let columns = columns?;
        info!(
            "Loading {} columns took {}ms ...",
            columns.len(),
            start_time.elapsed().as_millis()
        );

        Ok(Self {
            name: name.into(),
            nrows: df.height(),
            columns,
        })
    }

    /// Builds a store from plain string columns.
    pub fn from_columns<I, K, V>(name: impl Into<String>, columns: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let columns: Vec<StoreColumn> = columns
            .into_iter()
            .map(|(name, data)| StoreColumn {
                name: name.into(),
                dtype: DataType::String,
                data: data.into_iter().map(Into::into).collect(),
            })
            .collect();
        let nrows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        if let Some(ragged) = columns.iter().find(|c| c.data.len() != nrows) {
            return Err(StoreError::RaggedColumns {
                column: ragged.name.clone(),
                expected: nrows,
                found: ragged.data.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            columns,
            nrows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.nrows
    }

    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    /// Sorted distinct values of a column, used as select-filter options.
    pub fn distinct(&self, column: &str) -> Result<Vec<String>, StoreError> {
        let values: BTreeSet<&String> = self.column(column)?.data.iter().collect();
        Ok(values.into_iter().cloned().collect())
    }

    fn column(&self, name: &str) -> Result<&StoreColumn, StoreError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StoreError::UnknownColumn(name.to_string()))
    }

    fn column_index(&self, name: &str) -> Result<usize, StoreError> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| StoreError::UnknownColumn(name.to_string()))
    }

    // Stable, so rows comparing equal keep their natural order in both directions.
    fn sort_rows(&self, rows: &mut [usize], order: &OrderBy) -> Result<(), StoreError> {
        let column = self.column(&order.column)?;
        let data = &column.data;
        let ascending = order.direction == SortDirection::Asc;

        if Self::is_numeric_type(&column.dtype) {
            // Parsable numbers first, in numeric order, then everything else as strings.
            rows.sort_by(|&a, &b| {
                let ordering = match (data[a].parse::<f64>(), data[b].parse::<f64>()) {
                    (Ok(a), Ok(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                    (Ok(_), Err(_)) => return Ordering::Less,
                    (Err(_), Ok(_)) => return Ordering::Greater,
                    (Err(_), Err(_)) => data[a].cmp(&data[b]),
                };
                if ascending { ordering } else { ordering.reverse() }
            });
        } else if ascending {
            rows.sort_by(|&a, &b| data[a].cmp(&data[b]));
        } else {
            rows.sort_by(|&a, &b| data[b].cmp(&data[a]));
        }
        Ok(())
    }

    fn is_numeric_type(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
                | DataType::Float32
                | DataType::Float64
        )
    }

    fn load_column(df: &DataFrame, col_name: &str) -> Result<StoreColumn, PolarsError> {
        let dtype = df.column(col_name)?.dtype().clone();

        let col = df.column(col_name)?.cast(&DataType::String)?;
        let series = col.str()?;
        let data = series
            .into_iter()
            .map(|value| match value {
                Some(s) => s.replace("\r\n", " ↵ ").replace('\n', " ↵ "),
                None => NULL_VALUE.to_string(),
            })
            .collect();

        Ok(StoreColumn {
            name: col_name.to_string(),
            dtype,
            data,
        })
    }

    fn file_type(path: &Path) -> Result<FileType, StoreError> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::FileNotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => StoreError::PermissionDenied(path.to_path_buf()),
            _ => StoreError::Io(e),
        })?;
        if !metadata.is_file() {
            return Err(StoreError::UnknownFileType(path.to_path_buf()));
        }

        match path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_uppercase())
            .as_deref()
        {
            Some("CSV") => Ok(FileType::Csv),
            Some("PARQUET") | Some("PQ") => Ok(FileType::Parquet),
            Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::Arrow),
            _ => Err(StoreError::UnknownFileType(path.to_path_buf())),
        }
    }

    fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyCsvReader::new(PlPath::Local(path.into()))
            .with_has_header(true)
            .finish()
    }

    fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
    }

    fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
        LazyFrame::scan_ipc(
            PlPath::Local(path.into()),
            polars::io::ipc::IpcScanOptions,
            UnifiedScanArgs::default(),
        )
    }
}

impl DataStore for FrameStore {
    fn query(&self, request: &QueryRequest) -> Result<QueryResult, StoreError> {
        let start_time = Instant::now();

        let mut index: HashMap<&str, usize> = HashMap::new();
        for name in request.predicate.columns() {
            index.insert(name, self.column_index(name)?);
        }
        let mut projection = Vec::with_capacity(request.columns.len());
        for name in request.columns.iter() {
            projection.push((name.as_str(), self.column_index(name)?));
        }

        let mut matching: Vec<usize> = (0..self.nrows)
            .into_par_iter()
            .filter(|&r| {
                let cell = |name: &str| {
                    index
                        .get(name)
                        .map(|&c| self.columns[c].data[r].as_str())
                };
                request.predicate.evaluate(&cell)
            })
            .collect();

        if let Some(order) = &request.order_by {
            self.sort_rows(&mut matching, order)?;
        }

        let total_count = matching.len();
        let rows: Vec<Row> = matching
            .iter()
            .skip(request.offset)
            .take(request.limit)
            .map(|&r| {
                Row::new(
                    projection
                        .iter()
                        .map(|&(name, c)| (name.to_string(), self.columns[c].data[r].clone()))
                        .collect(),
                )
            })
            .collect();

        debug!(
            "Query on {} matched {} of {} rows, returning {} in {}ms",
            self.name,
            total_count,
            self.nrows,
            rows.len(),
            start_time.elapsed().as_millis()
        );
        trace!("Query: {request:?}");
        Ok(QueryResult { rows, total_count })
    }
}
