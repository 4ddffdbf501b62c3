//! Known toll routes.
//!
//! When a client pays tolls and the operator did not enter a manual amount,
//! the toll comes from a [`TollTable`]: an ordered list of locality pairs with
//! the toll charged for driving between them. The table is a read-only
//! snapshot handed to the engine; operators replace the built-in list through
//! configuration rather than by mutating shared state.

use serde::{Deserialize, Serialize};

use crate::{
    normalize::Route,
    util::{finite_or, number_or_zero, string_or_empty},
};

/// A toll charged between two localities, in either direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TollRoute {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub origen: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub destino: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub monto: f64,
}

impl TollRoute {
    pub fn new(origen: &str, destino: &str, monto: f64) -> Self {
        Self {
            origen: origen.to_string(),
            destino: destino.to_string(),
            monto,
        }
    }
}

/// Ordered toll master list. The first matching route wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TollTable {
    routes: Vec<TollRoute>,
}

impl TollTable {
    pub fn new(routes: Vec<TollRoute>) -> Self {
        Self { routes }
    }

    /// A table that never matches, so only manual tolls are billed.
    pub fn empty() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn routes(&self) -> &[TollRoute] {
        &self.routes
    }

    /// Toll for the trip's route, or `0` when no route matches.
    pub(crate) fn lookup(&self, route: &Route) -> f64 {
        match self
            .routes
            .iter()
            .find(|toll| route.matches(&toll.origen, &toll.destino))
        {
            Some(toll) => {
                tracing::debug!(
                    "toll route {} <-> {} matched ({})",
                    toll.origen,
                    toll.destino,
                    toll.monto
                );
                finite_or(toll.monto, 0.0)
            }
            None => 0.0,
        }
    }
}

impl Default for TollTable {
    /// The built-in master list of tolled corridors around Buenos Aires.
    fn default() -> Self {
        Self::new(vec![
            TollRoute::new("ezeiza", "la plata", 3100.0),
            TollRoute::new("ezeiza", "caba", 2400.0),
            TollRoute::new("ezeiza", "aeroparque", 2400.0),
            TollRoute::new("la plata", "caba", 1900.0),
            TollRoute::new("la plata", "aeroparque", 1900.0),
            TollRoute::new("pilar", "caba", 1600.0),
            TollRoute::new("pilar", "aeroparque", 1600.0),
            TollRoute::new("tigre", "caba", 1300.0),
            TollRoute::new("tigre", "aeroparque", 1300.0),
        ])
    }
}
