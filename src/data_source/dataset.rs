use super::DataSourceError;
use csv::{ReaderBuilder, Trim};
use serde_json::{Map, Value};
use std::path::Path;

const TEXT_COLUMN: &str = "linha";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Text,
    Json,
    Csv,
}

impl DatasetFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// A loaded table. Cells are kept as text; typing them is up to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub group: Option<String>,
    pub columns: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl Dataset {
    pub fn parse(name: &str, bytes: &[u8]) -> Result<Self, DataSourceError> {
        let format = DatasetFormat::from_name(name)
            .ok_or_else(|| DataSourceError::UnsupportedFormat(name.to_string()))?;

        let text = std::str::from_utf8(bytes).map_err(|_| DataSourceError::Encoding {
            name: name.to_string(),
        })?;
        let text = text.trim_start_matches('\u{feff}');
        if text.trim().is_empty() {
            return Err(DataSourceError::Empty {
                name: name.to_string(),
            });
        }

        match format {
            DatasetFormat::Text => Ok(Self::from_text(text)),
            DatasetFormat::Csv => Self::from_csv(name, text),
            DatasetFormat::Json => Self::from_json(name, text),
        }
    }

    fn from_text(text: &str) -> Self {
        let records = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| vec![line.to_string()])
            .collect();

        Self {
            group: None,
            columns: vec![TEXT_COLUMN.to_string()],
            records,
        }
    }

    fn from_csv(name: &str, text: &str) -> Result<Self, DataSourceError> {
        let header = text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();
        let delimiter = if header.matches(';').count() > header.matches(',').count() {
            b';'
        } else {
            b','
        };

        let csv_error = |source: csv::Error| DataSourceError::Csv {
            name: name.to_string(),
            source,
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            if record.len() > columns.len() {
                let line = record.position().map(|pos| pos.line()).unwrap_or_default();
                return Err(DataSourceError::Shape {
                    name: name.to_string(),
                    reason: format!(
                        "a linha {} tem {} colunas e o cabeçalho tem {}",
                        line,
                        record.len(),
                        columns.len()
                    ),
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len(), String::new());
            records.push(row);
        }

        Ok(Self {
            group: None,
            columns,
            records,
        })
    }

    fn from_json(name: &str, text: &str) -> Result<Self, DataSourceError> {
        let value: Value = serde_json::from_str(text).map_err(|source| DataSourceError::Json {
            name: name.to_string(),
            source,
        })?;

        match value {
            Value::Array(items) => Self::from_json_records(name, None, &items),
            Value::Object(map) => {
                let group = ["grupo", "group"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .map(str::to_string);
                let items = ["registos", "records"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_array))
                    .ok_or_else(|| DataSourceError::Shape {
                        name: name.to_string(),
                        reason: "falta a lista \"registos\"".to_string(),
                    })?;
                Self::from_json_records(name, group, items)
            }
            _ => Err(DataSourceError::Shape {
                name: name.to_string(),
                reason: "esperava uma lista ou um objeto".to_string(),
            }),
        }
    }

    fn from_json_records(
        name: &str,
        group: Option<String>,
        items: &[Value],
    ) -> Result<Self, DataSourceError> {
        let objects = items
            .iter()
            .map(|item| {
                item.as_object().ok_or_else(|| DataSourceError::Shape {
                    name: name.to_string(),
                    reason: "cada registo deve ser um objeto".to_string(),
                })
            })
            .collect::<Result<Vec<&Map<String, Value>>, _>>()?;

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let records = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|column| match object.get(column) {
                        None | Some(Value::Null) => String::new(),
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            group,
            columns,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_picked_by_extension() {
        assert_eq!(DatasetFormat::from_name("a.CSV"), Some(DatasetFormat::Csv));
        assert_eq!(DatasetFormat::from_name("dados.json"), Some(DatasetFormat::Json));
        assert_eq!(DatasetFormat::from_name("notas.txt"), Some(DatasetFormat::Text));
        assert_eq!(DatasetFormat::from_name("folha.xlsx"), None);
        assert_eq!(DatasetFormat::from_name("sem_extensao"), None);
    }

    #[test]
    fn csv_detects_semicolons_and_pads_short_rows() {
        let data = Dataset::parse("clients.csv", b"nome;cidade\nAna;Porto\nRui\n").unwrap();
        assert_eq!(data.columns, vec!["nome", "cidade"]);
        assert_eq!(
            data.records,
            vec![
                vec!["Ana".to_string(), "Porto".to_string()],
                vec!["Rui".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn csv_keeps_quoted_delimiters_in_one_cell() {
        let data = Dataset::parse("c.csv", b"nome,morada\nAna,\"Rua A, 1\"\n").unwrap();
        assert_eq!(data.columns, vec!["nome", "morada"]);
        assert_eq!(data.records, vec![vec!["Ana".to_string(), "Rua A, 1".to_string()]]);
    }

    #[test]
    fn csv_rejects_rows_wider_than_header() {
        let err = Dataset::parse("c.csv", b"nome,cidade\nAna,Porto\nRui,Braga,extra\n").unwrap_err();
        match err {
            DataSourceError::Shape { name, reason } => {
                assert_eq!(name, "c.csv");
                assert!(reason.contains("linha 3"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn csv_skips_blank_lines() {
        let data = Dataset::parse("c.csv", b"\nnome\n\nAna\n  \nRui\n").unwrap();
        assert_eq!(data.columns, vec!["nome"]);
        assert_eq!(data.records.len(), 2);
    }

    #[test]
    fn json_object_carries_group() {
        let body = br#"{"grupo": "Riba", "registos": [{"nome": "Ana", "idade": 30}, {"nome": "Rui", "cidade": "Braga"}]}"#;
        let data = Dataset::parse("sample.json", body).unwrap();
        assert_eq!(data.group.as_deref(), Some("Riba"));
        assert_eq!(data.columns, vec!["nome", "idade", "cidade"]);
        assert_eq!(data.records[0], vec!["Ana", "30", ""]);
        assert_eq!(data.records[1], vec!["Rui", "", "Braga"]);
    }

    #[test]
    fn json_rejects_scalars_and_bad_syntax() {
        assert!(matches!(
            Dataset::parse("x.json", b"42"),
            Err(DataSourceError::Shape { .. })
        ));
        assert!(matches!(
            Dataset::parse("x.json", b"[1, 2]"),
            Err(DataSourceError::Shape { .. })
        ));
        assert!(matches!(
            Dataset::parse("x.json", b"{oops"),
            Err(DataSourceError::Json { .. })
        ));
    }

    #[test]
    fn text_keeps_non_empty_lines() {
        let data = Dataset::parse("notas.txt", b"um\n\n  dois  \n").unwrap();
        assert_eq!(data.columns, vec![TEXT_COLUMN]);
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.records[1], vec!["dois"]);
    }

    #[test]
    fn empty_and_binary_files_are_rejected() {
        assert!(matches!(
            Dataset::parse("a.csv", b"  \n"),
            Err(DataSourceError::Empty { .. })
        ));
        assert!(matches!(
            Dataset::parse("a.txt", &[0xff, 0xfe, 0x00]),
            Err(DataSourceError::Encoding { .. })
        ));
        assert!(matches!(
            Dataset::parse("a.pdf", b"x"),
            Err(DataSourceError::UnsupportedFormat(_))
        ));
    }
}
