//! Client fare configuration.
//!
//! A [`FareConfig`] belongs to a billing client and holds every pricing rule
//! the engine applies to that client's trips. Field names follow the stored
//! records (`bajada_bandera`, `precio_km`, ...), so a client document
//! deserializes directly:
//!
//! ```rust
//! use fare_engine::FareConfig;
//!
//! let config: FareConfig = serde_json::from_str(
//!     r#"{ "precio_km": "120", "paga_peaje": true, "tarifas_fijas": null }"#,
//! ).unwrap();
//! assert_eq!(config.precio_km, 120.0);
//! assert_eq!(config.km_minimo, 25.0);
//! assert!(config.tarifas_fijas.is_empty());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::util::{coerce_number, lenient_list, number_or_zero, string_or_empty, strict_bool};

/// Distance threshold used when a client has none configured.
pub const DEFAULT_KM_MINIMO: f64 = 25.0;
/// Waiting billing increment, in minutes, used when a client has none configured.
pub const DEFAULT_ESPERA_FRACCION: f64 = 15.0;

/// Pricing rules of a single billing client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FareConfig {
    /// Flag-drop charge added to every distance-priced trip.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub bajada_bandera: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub precio_km: f64,
    /// Below this many kilometers the flat [`precio_minimo`](Self::precio_minimo) applies.
    #[serde(default = "default_km_minimo", deserialize_with = "km_minimo")]
    pub km_minimo: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub precio_minimo: f64,
    /// Free waiting minutes.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub espera_cortesia: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub espera_valor_hora: f64,
    /// Waiting billing increment in minutes. Partial increments round up.
    #[serde(default = "default_espera_fraccion", deserialize_with = "espera_fraccion")]
    pub espera_fraccion: f64,
    #[serde(default, deserialize_with = "strict_bool")]
    pub paga_peaje: bool,
    /// Whether no-show ("Negativo") trips are billed.
    #[serde(default, deserialize_with = "strict_bool")]
    pub paga_negativos: bool,
    /// Fixed-price routes. List order is the tie-break: first match wins.
    #[serde(default, deserialize_with = "lenient_list")]
    pub tarifas_fijas: Vec<FixedFare>,
}

impl Default for FareConfig {
    fn default() -> Self {
        Self {
            bajada_bandera: 0.0,
            precio_km: 0.0,
            km_minimo: DEFAULT_KM_MINIMO,
            precio_minimo: 0.0,
            espera_cortesia: 0.0,
            espera_valor_hora: 0.0,
            espera_fraccion: DEFAULT_ESPERA_FRACCION,
            paga_peaje: false,
            paga_negativos: false,
            tarifas_fijas: Vec::new(),
        }
    }
}

impl FareConfig {
    /// Billing increment actually used by the engine.
    ///
    /// A non-finite or non-positive increment falls back to
    /// [`DEFAULT_ESPERA_FRACCION`] so the block count stays finite.
    pub fn effective_espera_fraccion(&self) -> f64 {
        if self.espera_fraccion.is_finite() && self.espera_fraccion > 0.0 {
            self.espera_fraccion
        } else {
            DEFAULT_ESPERA_FRACCION
        }
    }

    /// Distance threshold actually used by the engine.
    pub fn effective_km_minimo(&self) -> f64 {
        if self.km_minimo.is_finite() {
            self.km_minimo
        } else {
            DEFAULT_KM_MINIMO
        }
    }
}

/// A negotiated flat price between two places, matched in either direction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedFare {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub origen: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub destino: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub precio: f64,
    /// Stored with the fare but not added to the trip total.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub peaje: f64,
}

impl FixedFare {
    pub fn new(origen: &str, destino: &str, precio: f64) -> Self {
        Self {
            origen: origen.to_string(),
            destino: destino.to_string(),
            precio,
            peaje: 0.0,
        }
    }
}

fn default_km_minimo() -> f64 {
    DEFAULT_KM_MINIMO
}

fn default_espera_fraccion() -> f64 {
    DEFAULT_ESPERA_FRACCION
}

fn km_minimo<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_number)
        .unwrap_or(DEFAULT_KM_MINIMO))
}

fn espera_fraccion<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_number)
        .filter(|minutes| *minutes > 0.0)
        .unwrap_or(DEFAULT_ESPERA_FRACCION))
}
