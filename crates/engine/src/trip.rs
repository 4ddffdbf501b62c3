//! Trip records as stored by dispatch, both pending reservations and
//! archived history.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::util::{optional_number, optional_string, parse_distance_km, string_or_empty};

/// Status of a trip where the driver arrived and no passenger boarded.
pub const ESTADO_NEGATIVO: &str = "Negativo";

/// A single passenger transport record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default, deserialize_with = "optional_string")]
    pub id: Option<String>,
    /// Service date, used to place the trip in a billing period.
    #[serde(default, deserialize_with = "optional_date")]
    pub fecha: Option<NaiveDate>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub origen: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub destino: String,
    /// Distance as entered, possibly with units (`"12.4 km"`).
    #[serde(default, deserialize_with = "string_or_empty")]
    pub distancia: String,
    /// Total waiting time in hours.
    #[serde(default, deserialize_with = "optional_number")]
    pub espera_total: Option<f64>,
    /// Operator-entered toll, overriding the toll table.
    #[serde(default, deserialize_with = "optional_number")]
    pub peaje_manual: Option<f64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub estado: String,
}

impl Trip {
    pub fn new(origen: &str, destino: &str, distancia: &str) -> Self {
        Self {
            origen: origen.to_string(),
            destino: destino.to_string(),
            distancia: distancia.to_string(),
            ..Self::default()
        }
    }

    /// Distance in kilometers, `0` when the stored value has no number in it.
    pub fn km(&self) -> f64 {
        parse_distance_km(&self.distancia)
    }

    /// Waiting time in hours, never negative.
    pub fn espera_horas(&self) -> f64 {
        self.espera_total
            .filter(|hours| hours.is_finite() && *hours > 0.0)
            .unwrap_or(0.0)
    }

    /// Manual toll, if one was entered as a valid number.
    pub fn manual_toll(&self) -> Option<f64> {
        self.peaje_manual.filter(|toll| toll.is_finite())
    }

    pub fn is_negativo(&self) -> bool {
        self.estado == ESTADO_NEGATIVO
    }
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is kept.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::String(raw)) = value else {
        return Ok(None);
    };
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    Ok(NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok())
}
