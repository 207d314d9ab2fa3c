//! JSON grid documents exchanged by the CLI.
//!
//! ```json
//! { "kind": "scenario", "columns": ["Type", "ID"], "rows": [["TC", "TC-QS_AUT1"]] }
//! ```
//!
//! `columns` may be omitted, in which case positional names are assigned.
//! Rows may be ragged; short rows (and a short column list) are padded.

use anyhow::{Context, Result};
use core_grid::{Grid, TableKind};
use core_model::TableModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDocument {
    pub kind: TableKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl GridDocument {
    pub fn from_model(model: &TableModel) -> Self {
        let columns = model.columns();
        Self {
            kind: model.kind(),
            columns: (!columns.is_empty()).then(|| columns.to_vec()),
            rows: model.export(),
        }
    }

    /// Rectangular grid for this document.
    pub fn into_grid(self) -> Result<Grid> {
        let Some(mut columns) = self.columns else {
            return Ok(Grid::from_ragged(self.rows));
        };
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(columns.len());
        for i in columns.len()..width {
            columns.push(i.to_string());
        }
        let rows = self
            .rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, String::new());
                r
            })
            .collect();
        Ok(Grid::new(columns, rows)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading grid document {}", path.display()))?;
        let doc: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing grid document {}", path.display()))?;
        debug!(target: "io", file = %path.display(), kind = doc.kind.as_str(), rows = doc.rows.len(), "document_read");
        Ok(doc)
    }

    /// Read a document and insist on its kind.
    pub fn read_kind(path: &Path, kind: TableKind) -> Result<Grid> {
        let doc = Self::read(path)?;
        if doc.kind != kind {
            anyhow::bail!(
                "{} holds a {} table, expected {}",
                path.display(),
                doc.kind.as_str(),
                kind.as_str()
            );
        }
        doc.into_grid()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        debug!(target: "io", file = %path.display(), rows = self.rows.len(), "document_written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> GridDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn columns_optional_and_rows_padded() {
        let grid = parse(r#"{"kind":"objects","rows":[["Link","lnk"],["END"]]}"#)
            .into_grid()
            .unwrap();
        assert_eq!(grid.columns(), &["0".to_string(), "1".to_string()][..]);
        assert_eq!(grid.cell(1, 1).unwrap(), "");
    }

    #[test]
    fn short_column_list_extended_positionally() {
        let grid = parse(r#"{"kind":"scenario","columns":["Type"],"rows":[["TC","x","y"]]}"#)
            .into_grid()
            .unwrap();
        assert_eq!(
            grid.columns(),
            &["Type".to_string(), "1".to_string(), "2".to_string()][..]
        );
    }

    #[test]
    fn empty_document_is_empty_grid() {
        let grid = parse(r#"{"kind":"scenario"}"#).into_grid().unwrap();
        assert_eq!(grid, Grid::empty());
    }

    #[test]
    fn all_empty_rows_without_columns_is_empty_grid() {
        let grid = parse(r#"{"kind":"scenario","rows":[[]]}"#).into_grid().unwrap();
        assert_eq!(grid, Grid::empty());

        let mut model = TableModel::standalone(TableKind::Scenario);
        model.load_data(grid);
        model.insert_row(0).unwrap();
        assert_eq!(model.column_count(), 10);
        assert_eq!(model.cell_value(0, 0).unwrap(), "TC");
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(serde_json::from_str::<GridDocument>(r#"{"kind":"sheet","rows":[]}"#).is_err());
    }

    #[test]
    fn write_then_read_with_kind_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let doc = GridDocument {
            kind: TableKind::Scenario,
            columns: Some(vec!["Type".into(), "ID".into()]),
            rows: vec![vec!["TC".into(), "TC-UM_AUT1".into()]],
        };
        doc.write(&path).unwrap();
        assert_eq!(GridDocument::read(&path).unwrap(), doc);
        assert!(GridDocument::read_kind(&path, TableKind::Objects).is_err());
        let grid = GridDocument::read_kind(&path, TableKind::Scenario).unwrap();
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn model_without_schema_omits_columns() {
        let model = TableModel::standalone(TableKind::Objects);
        let doc = GridDocument::from_model(&model);
        assert_eq!(doc.columns, None);
        assert!(serde_json::to_string(&doc).unwrap().contains(r#""kind":"objects""#));
    }
}
