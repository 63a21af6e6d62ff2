//! In-memory Typst world for report compilation
//!
//! Reports compile from a single self-contained template with all data
//! injected through `sys.inputs`, so the world holds exactly one source
//! file and no binary assets. The clock is pinned to the report's
//! generation instant, which keeps output deterministic for a given input
//! and timestamp.

use chrono::{DateTime, Datelike, Timelike, Utc};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use crate::compiler::ReportError;
use crate::fonts::{global_font_cache, FontCache};

pub struct ReportWorld {
    source: Source,
    library: LazyHash<Library>,
    fonts: &'static FontCache,
    generated_at: DateTime<Utc>,
}

impl ReportWorld {
    pub fn new(source: String, inputs: Dict, generated_at: DateTime<Utc>) -> Self {
        let id = FileId::new(None, VirtualPath::new("/main.typ"));
        let library = Library::builder().with_inputs(inputs).build();

        Self {
            source: Source::new(id, source),
            library: LazyHash::new(library),
            fonts: global_font_cache(),
            generated_at,
        }
    }
}

impl World for ReportWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.fonts.book()
    }

    fn main(&self) -> FileId {
        self.source.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.source.id() {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        // The report template references no external files.
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let adjusted = self.generated_at + chrono::Duration::hours(offset.unwrap_or(0));
        Datetime::from_ymd_hms(
            adjusted.year(),
            adjusted.month() as u8,
            adjusted.day() as u8,
            adjusted.hour() as u8,
            adjusted.minute() as u8,
            adjusted.second() as u8,
        )
    }
}

/// Convert JSON report data into a Typst input dictionary.
pub fn convert_inputs(
    inputs: std::collections::HashMap<String, serde_json::Value>,
) -> Result<Dict, ReportError> {
    let mut dict = Dict::new();
    for (key, value) in inputs {
        dict.insert(key.into(), json_to_typst_value(&value)?);
    }
    Ok(dict)
}

fn json_to_typst_value(json: &serde_json::Value) -> Result<Value, ReportError> {
    match json {
        serde_json::Value::Null => Ok(Value::None),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(ReportError::InvalidInput(format!("invalid number: {}", n)))
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s.as_str().into())),
        serde_json::Value::Array(items) => {
            let values: Vec<Value> = items
                .iter()
                .map(json_to_typst_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(Array::from(values.as_slice())))
        }
        serde_json::Value::Object(map) => {
            let mut dict = Dict::new();
            for (key, value) in map {
                dict.insert(key.as_str().into(), json_to_typst_value(value)?);
            }
            Ok(Value::Dict(dict))
        }
    }
}
