//! Per-trip fare computation.
//!
//! The rules run in a fixed order and each one only reads the trip, the
//! client's [`FareConfig`] and the toll snapshot:
//!
//! 1. base fare: a matching fixed fare, otherwise distance pricing plus the
//!    flag-drop charge;
//! 2. toll: manual amount, otherwise the toll table (only for clients that pay
//!    tolls);
//! 3. waiting: minutes beyond the courtesy allowance, rounded up to whole
//!    billing increments;
//! 4. no-show: a `Negativo` trip bills nothing unless the client pays them.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{
    FareConfig, TollTable, Trip,
    normalize::Route,
    util::finite_or,
};

static DEFAULT_TOLLS: LazyLock<TollTable> = LazyLock::new(TollTable::default);

/// Result of pricing one trip. Amounts are unrounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FareBreakdown {
    /// Distance or fixed-route charge.
    pub base: f64,
    /// Waiting charge.
    pub espera: f64,
    pub monto_peaje: f64,
    /// Whether a non-zero toll was applied.
    pub tiene_peaje: bool,
    /// Whether a fixed-route fare matched.
    pub es_fija: bool,
    /// `base + espera + monto_peaje`.
    pub total_viaje: f64,
}

/// Price a trip using the built-in toll table.
///
/// ```rust
/// use fare_engine::{FareConfig, Trip, compute_fare};
///
/// let config = FareConfig {
///     precio_km: 100.0,
///     bajada_bandera: 200.0,
///     ..FareConfig::default()
/// };
/// let fare = compute_fare(&Trip::new("Ezeiza", "Quilmes", "30 km"), &config);
/// assert_eq!(fare.total_viaje, 3200.0);
/// ```
pub fn compute_fare(trip: &Trip, config: &FareConfig) -> FareBreakdown {
    price(trip, config, &DEFAULT_TOLLS)
}

/// Fare engine bound to a toll table snapshot.
///
/// The engine holds no mutable state, so one instance can price trips from
/// any number of threads.
#[derive(Clone, Debug, Default)]
pub struct FareEngine {
    tolls: TollTable,
}

impl FareEngine {
    /// Return a builder for `FareEngine`.
    pub fn builder() -> FareEngineBuilder {
        FareEngineBuilder::default()
    }

    /// Price a single trip for a client.
    pub fn compute(&self, trip: &Trip, config: &FareConfig) -> FareBreakdown {
        price(trip, config, &self.tolls)
    }
}

/// The builder for `FareEngine`.
#[derive(Default)]
pub struct FareEngineBuilder {
    tolls: Option<TollTable>,
}

impl FareEngineBuilder {
    /// Replace the built-in toll table.
    pub fn tolls(mut self, tolls: TollTable) -> FareEngineBuilder {
        self.tolls = Some(tolls);
        self
    }

    /// Construct `FareEngine`
    pub fn build(self) -> FareEngine {
        FareEngine {
            tolls: self.tolls.unwrap_or_default(),
        }
    }
}

fn price(trip: &Trip, config: &FareConfig, tolls: &TollTable) -> FareBreakdown {
    let route = Route::new(&trip.origen, &trip.destino);

    let (mut base, es_fija) = base_fare(trip, config, &route);

    let mut monto_peaje = if config.paga_peaje {
        trip.manual_toll().unwrap_or_else(|| tolls.lookup(&route))
    } else {
        0.0
    };

    let mut espera = waiting_charge(trip.espera_horas(), config);

    if trip.is_negativo() && !config.paga_negativos {
        base = 0.0;
        espera = 0.0;
        monto_peaje = 0.0;
    }

    FareBreakdown {
        base,
        espera,
        monto_peaje,
        tiene_peaje: monto_peaje > 0.0,
        es_fija,
        total_viaje: finite_or(base + espera + monto_peaje, 0.0),
    }
}

fn base_fare(trip: &Trip, config: &FareConfig, route: &Route) -> (f64, bool) {
    if let Some(fixed) = config
        .tarifas_fijas
        .iter()
        .find(|fare| route.matches(&fare.origen, &fare.destino))
    {
        tracing::debug!(
            "fixed fare {} <-> {} matched trip {:?}",
            fixed.origen,
            fixed.destino,
            trip.id
        );
        return (finite_or(fixed.precio, 0.0), true);
    }

    let km = trip.km();
    let mut base = if km < config.effective_km_minimo() {
        finite_or(config.precio_minimo, 0.0)
    } else {
        km * finite_or(config.precio_km, 0.0)
    };
    base += finite_or(config.bajada_bandera, 0.0);
    (finite_or(base, 0.0), false)
}

/// Waiting charge for `hours` of waiting under the client's rules.
fn waiting_charge(hours: f64, config: &FareConfig) -> f64 {
    let minutes = hours * 60.0;
    let billable = minutes - finite_or(config.espera_cortesia, 0.0);
    if billable <= 0.0 {
        return 0.0;
    }
    let fraccion = config.effective_espera_fraccion();
    let bloques = (billable / fraccion).ceil();
    let espera = bloques * fraccion * (finite_or(config.espera_valor_hora, 0.0) / 60.0);
    finite_or(espera, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiting_config() -> FareConfig {
        FareConfig {
            espera_cortesia: 10.0,
            espera_fraccion: 15.0,
            espera_valor_hora: 600.0,
            ..FareConfig::default()
        }
    }

    #[test]
    fn waiting_rounds_up_to_full_blocks() {
        let config = waiting_config();
        assert_eq!(waiting_charge(0.5, &config), 300.0);
        // 11 minutes: one billable minute is one full block.
        assert_eq!(waiting_charge(11.0 / 60.0, &config), 150.0);
        // 24 minutes: fourteen billable minutes are still one block.
        assert_eq!(waiting_charge(0.4, &config), 150.0);
    }

    #[test]
    fn waiting_within_courtesy_is_free() {
        let config = waiting_config();
        assert_eq!(waiting_charge(0.0, &config), 0.0);
        assert_eq!(waiting_charge(0.1, &config), 0.0);
    }

    #[test]
    fn waiting_with_broken_increment_uses_default() {
        let config = FareConfig {
            espera_fraccion: 0.0,
            espera_valor_hora: 60.0,
            ..FareConfig::default()
        };
        assert_eq!(waiting_charge(0.1, &config), 15.0);
    }

    #[test]
    fn non_finite_prices_never_reach_the_total() {
        let config = FareConfig {
            precio_minimo: f64::NAN,
            bajada_bandera: f64::INFINITY,
            espera_cortesia: f64::NAN,
            ..FareConfig::default()
        };
        let fare = compute_fare(&Trip::new("A", "B", "3 km"), &config);
        assert_eq!(fare.total_viaje, 0.0);
    }

    #[test]
    fn overflowing_waiting_degrades_to_zero() {
        let free = FareConfig {
            espera_cortesia: 10.0,
            ..FareConfig::default()
        };
        assert_eq!(waiting_charge(1e307, &free), 0.0);
        assert_eq!(waiting_charge(1e307, &waiting_config()), 0.0);
    }

    #[test]
    fn breakdown_uses_stored_field_names() {
        let fare = FareBreakdown {
            base: 1.0,
            ..FareBreakdown::default()
        };
        let value = serde_json::to_value(fare).unwrap();
        for key in ["base", "espera", "montoPeaje", "tienePeaje", "esFija", "totalViaje"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
