//! Reading client and trip documents, writing invoices and exports.

use std::path::Path;

use fare_engine::{FareConfig, Invoice, InvoiceLine, Trip};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{AppError, Result};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AppError::Json {
        path: path.display().to_string(),
        source,
    })
}

pub fn load_config(path: &Path) -> Result<FareConfig> {
    let config = read_json(path)?;
    tracing::debug!("loaded fare config from {}", path.display());
    Ok(config)
}

pub fn load_trip(path: &Path) -> Result<Trip> {
    read_json(path)
}

pub fn load_trips(path: &Path) -> Result<Vec<Trip>> {
    let trips: Vec<Trip> = read_json(path)?;
    tracing::debug!("loaded {} trips from {}", trips.len(), path.display());
    Ok(trips)
}

pub fn write_invoice(path: &Path, invoice: &Invoice) -> Result<()> {
    let json = invoice.to_json()?;
    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[derive(Serialize)]
struct ExportRow<'a> {
    trip_id: &'a str,
    fecha: String,
    origen: &'a str,
    destino: &'a str,
    base: String,
    espera: String,
    peaje: String,
    total: String,
    fija: bool,
}

/// Write invoice lines as CSV. Amounts are rounded to cents.
pub fn export_lines<W: std::io::Write>(lines: &[InvoiceLine], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for line in lines {
        let fare = &line.breakdown;
        writer.serialize(ExportRow {
            trip_id: line.trip_id.as_deref().unwrap_or(""),
            fecha: line.fecha.map(|d| d.to_string()).unwrap_or_default(),
            origen: &line.origen,
            destino: &line.destino,
            base: fare_engine::Amount::new(fare.base).to_string(),
            espera: fare_engine::Amount::new(fare.espera).to_string(),
            peaje: fare_engine::Amount::new(fare.monto_peaje).to_string(),
            total: fare_engine::Amount::new(fare.total_viaje).to_string(),
            fija: fare.es_fija,
        })?;
    }
    writer.flush().map_err(|source| AppError::Io {
        path: "csv export".to_string(),
        source,
    })
}

pub fn export_lines_to(path: &Path, lines: &[InvoiceLine]) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    export_lines(lines, file)
}

#[cfg(test)]
mod tests {
    use fare_engine::{FareConfig, FareEngine, Trip};

    use super::*;

    #[test]
    fn export_writes_header_and_rounded_amounts() {
        let config = FareConfig {
            precio_km: 33.333,
            ..FareConfig::default()
        };
        let trip = Trip {
            id: Some("R-7".to_string()),
            ..Trip::new("Quilmes", "Lanus", "30 km")
        };
        let preview = FareEngine::default().preview(&[trip], &config, None);

        let mut out = Vec::new();
        export_lines(&preview.lines, &mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        let mut rows = csv.lines();

        assert_eq!(
            rows.next(),
            Some("trip_id,fecha,origen,destino,base,espera,peaje,total,fija")
        );
        assert_eq!(rows.next(), Some("R-7,,Quilmes,Lanus,999.99,0.00,0.00,999.99,false"));
        assert_eq!(rows.next(), None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_trips(Path::new("/nonexistent/trips.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/trips.json"));
    }
}
