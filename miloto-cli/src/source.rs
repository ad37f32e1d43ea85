use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use miloto_core::error::{MilotoError, Result};
use miloto_core::history::TabularSource;

/// Source CSV avec ligne d'en-tête : fichier local ou URL http(s).
#[derive(Debug, Clone)]
pub struct CsvSource {
    name: String,
    location: Location,
    delimiter: u8,
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    File(PathBuf),
    Url(String),
}

impl CsvSource {
    pub fn new(name: &str, location: &str, delimiter: u8) -> Self {
        let location = if location.starts_with("http://") || location.starts_with("https://") {
            Location::Url(location.to_string())
        } else {
            Location::File(PathBuf::from(location))
        };
        Self {
            name: name.to_string(),
            location,
            delimiter,
        }
    }

    fn read_body(&self) -> Result<String> {
        match &self.location {
            Location::File(path) => std::fs::read_to_string(path)
                .map_err(|e| MilotoError::data_source(&self.name, format!("{:?}: {}", path, e))),
            Location::Url(url) => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(20))
                    .build()
                    .map_err(|e| MilotoError::data_source(&self.name, e))?;
                let response = client
                    .get(url)
                    .send()
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| MilotoError::data_source(&self.name, e))?;
                response
                    .text()
                    .map_err(|e| MilotoError::data_source(&self.name, e))
            }
        }
    }
}

/// Lit un CSV avec en-têtes en lignes colonne → valeur.
pub fn parse_rows<R: Read>(name: &str, reader: R, delimiter: u8) -> Result<Vec<HashMap<String, String>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| MilotoError::data_source(name, e))?
        .clone();
    if headers.is_empty() {
        return Err(MilotoError::data_source(name, "sin encabezados"));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| MilotoError::data_source(name, e))?;
        let row: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    debug!("{}: {} fila(s) leída(s)", name, rows.len());
    Ok(rows)
}

impl TabularSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_rows(&self) -> Result<Vec<HashMap<String, String>>> {
        let body = self.read_body()?;
        parse_rows(&self.name, body.as_bytes(), self.delimiter)
    }
}
