//! Invoice preview and emission.
//!
//! An invoice is built in two steps. [`FareEngine::preview`] prices every trip
//! of a client inside a [`Period`] and sums the results; [`Invoice::emit`]
//! then freezes a preview into an immutable record with its own id and issue
//! timestamp. Totals are plain sums of the per-trip breakdowns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, FareBreakdown, FareConfig, FareEngine, ResultEngine, Trip};

/// Inclusive range of service dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PeriodBounds")]
pub struct Period {
    from: NaiveDate,
    to: NaiveDate,
}

/// Unchecked wire form of a [`Period`].
#[derive(Deserialize)]
struct PeriodBounds {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<PeriodBounds> for Period {
    type Error = EngineError;

    fn try_from(bounds: PeriodBounds) -> Result<Self, Self::Error> {
        Period::new(bounds.from, bounds.to)
    }
}

impl Period {
    pub fn new(from: NaiveDate, to: NaiveDate) -> ResultEngine<Self> {
        if from > to {
            return Err(EngineError::InvalidPeriod(format!(
                "period starts on {from} but ends on {to}"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn start(&self) -> NaiveDate {
        self.from
    }

    pub fn end(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// One priced trip on an invoice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub trip_id: Option<String>,
    pub fecha: Option<NaiveDate>,
    pub origen: String,
    pub destino: String,
    pub breakdown: FareBreakdown,
}

/// Sums of the line breakdowns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub base: f64,
    pub espera: f64,
    pub peaje: f64,
    pub total: f64,
}

impl InvoiceTotals {
    fn add(&mut self, breakdown: &FareBreakdown) {
        self.base += breakdown.base;
        self.espera += breakdown.espera;
        self.peaje += breakdown.monto_peaje;
        self.total += breakdown.total_viaje;
    }
}

/// Priced trips of one client, not yet issued.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoicePreview {
    pub period: Option<Period>,
    pub lines: Vec<InvoiceLine>,
    pub totals: InvoiceTotals,
    /// Trips left out because they have no service date.
    pub skipped: usize,
}

impl InvoicePreview {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FareEngine {
    /// Price every trip of a client that falls inside `period`.
    ///
    /// Without a period every trip is billed. With one, trips lacking a
    /// service date are skipped and counted. Lines keep the input order.
    pub fn preview(
        &self,
        trips: &[Trip],
        config: &FareConfig,
        period: Option<&Period>,
    ) -> InvoicePreview {
        let mut preview = InvoicePreview {
            period: period.copied(),
            ..InvoicePreview::default()
        };

        for trip in trips {
            if let Some(period) = period {
                match trip.fecha {
                    Some(fecha) if period.contains(fecha) => {}
                    Some(_) => continue,
                    None => {
                        preview.skipped += 1;
                        continue;
                    }
                }
            }

            let breakdown = self.compute(trip, config);
            preview.totals.add(&breakdown);
            preview.lines.push(InvoiceLine {
                trip_id: trip.id.clone(),
                fecha: trip.fecha,
                origen: trip.origen.clone(),
                destino: trip.destino.clone(),
                breakdown,
            });
        }

        tracing::debug!(
            "previewed {} trips ({} without date), total {}",
            preview.lines.len(),
            preview.skipped,
            preview.totals.total
        );
        preview
    }
}

/// An issued invoice. Read-only once emitted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    id: Uuid,
    number: String,
    client: String,
    issued_at: DateTime<Utc>,
    period: Option<Period>,
    lines: Vec<InvoiceLine>,
    totals: InvoiceTotals,
}

impl Invoice {
    /// Freeze `preview` into an invoice for `client` numbered `number`.
    pub fn emit(number: &str, client: &str, preview: InvoicePreview) -> ResultEngine<Self> {
        let number = normalize_required(number, "invoice number")?;
        let client = normalize_required(client, "client")?;
        if preview.is_empty() {
            return Err(EngineError::EmptyInvoice(number));
        }

        let invoice = Self {
            id: Uuid::new_v4(),
            number,
            client,
            issued_at: Utc::now(),
            period: preview.period,
            lines: preview.lines,
            totals: preview.totals,
        };
        tracing::info!(
            "emitted invoice {} for {} ({} trips, total {})",
            invoice.number,
            invoice.client,
            invoice.lines.len(),
            invoice.totals.total
        );
        Ok(invoice)
    }

    /// Parse a previously emitted invoice.
    pub fn from_json(raw: &str) -> ResultEngine<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> ResultEngine<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn period(&self) -> Option<&Period> {
        self.period.as_ref()
    }

    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    pub fn totals(&self) -> &InvoiceTotals {
        &self.totals
    }
}

fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInvoice(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn dated_trip(id: &str, day: Option<u32>, km: &str) -> Trip {
        Trip {
            id: Some(id.to_string()),
            fecha: day.map(date),
            ..Trip::new("Quilmes", "Lanus", km)
        }
    }

    fn config() -> FareConfig {
        FareConfig {
            precio_km: 100.0,
            precio_minimo: 3000.0,
            ..FareConfig::default()
        }
    }

    #[test]
    fn period_rejects_reversed_dates() {
        let err = Period::new(date(10), date(1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
        assert!(Period::new(date(1), date(1)).is_ok());
    }

    #[test]
    fn stored_period_is_validated() {
        let period: Period =
            serde_json::from_str(r#"{"from":"2024-05-01","to":"2024-05-31"}"#).unwrap();
        assert_eq!(period, Period::new(date(1), date(31)).unwrap());

        let reversed = serde_json::from_str::<Period>(r#"{"from":"2024-05-31","to":"2024-05-01"}"#);
        assert!(reversed.is_err());
    }

    #[test]
    fn invoice_with_reversed_period_is_rejected() {
        let engine = FareEngine::default();
        let period = Period::new(date(1), date(31)).unwrap();
        let trips = [dated_trip("a", Some(3), "30 km")];
        let preview = engine.preview(&trips, &config(), Some(&period));
        let json = Invoice::emit("F-0003", "Acme", preview)
            .unwrap()
            .to_json()
            .unwrap()
            .replace("\"from\": \"2024-05-01\"", "\"from\": \"2024-06-01\"");
        assert!(json.contains("2024-06-01"));

        assert!(matches!(
            Invoice::from_json(&json),
            Err(EngineError::Json(_))
        ));
    }

    #[test]
    fn period_is_inclusive() {
        let period = Period::new(date(1), date(31)).unwrap();
        assert!(period.contains(date(1)));
        assert!(period.contains(date(31)));
        assert!(!period.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    }

    #[test]
    fn preview_filters_by_period_and_counts_undated() {
        let engine = FareEngine::default();
        let trips = vec![
            dated_trip("a", Some(2), "30 km"),
            dated_trip("b", Some(20), "10 km"),
            dated_trip("c", None, "40 km"),
        ];
        let period = Period::new(date(1), date(15)).unwrap();

        let preview = engine.preview(&trips, &config(), Some(&period));
        assert_eq!(preview.lines.len(), 1);
        assert_eq!(preview.lines[0].trip_id.as_deref(), Some("a"));
        assert_eq!(preview.skipped, 1);
        assert_eq!(preview.totals.total, 3000.0);
    }

    #[test]
    fn preview_without_period_bills_everything() {
        let engine = FareEngine::default();
        let trips = vec![
            dated_trip("a", Some(2), "30 km"),
            dated_trip("b", None, "10 km"),
        ];
        let preview = engine.preview(&trips, &config(), None);
        assert_eq!(preview.lines.len(), 2);
        assert_eq!(preview.skipped, 0);
        assert_eq!(preview.totals.base, 6000.0);
        assert_eq!(preview.totals.total, 6000.0);
    }

    #[test]
    fn emit_requires_lines_and_header() {
        let engine = FareEngine::default();
        let empty = engine.preview(&[], &config(), None);
        assert_eq!(
            Invoice::emit("F-0001", "Acme", empty.clone()).unwrap_err(),
            EngineError::EmptyInvoice("F-0001".to_string())
        );
        assert!(matches!(
            Invoice::emit("  ", "Acme", empty),
            Err(EngineError::InvalidInvoice(_))
        ));
    }

    #[test]
    fn emitted_invoice_survives_json() {
        let engine = FareEngine::default();
        let preview = engine.preview(&[dated_trip("a", Some(3), "30 km")], &config(), None);
        let invoice = Invoice::emit(" F-0002 ", "Acme", preview).unwrap();
        assert_eq!(invoice.number(), "F-0002");

        let parsed = Invoice::from_json(&invoice.to_json().unwrap()).unwrap();
        assert_eq!(parsed, invoice);
    }
}
