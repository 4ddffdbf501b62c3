//! Fare engine for ground-transportation billing.
//!
//! Given a [`Trip`] and the billing client's [`FareConfig`], the engine
//! computes a [`FareBreakdown`]: base fare (fixed route or distance tier),
//! waiting charge, toll and total. Computation is a pure function of its
//! inputs and never fails; malformed fields degrade to zero-valued
//! components so a batch of trips always produces a total for review.
//!
//! On top of the per-trip engine, [`FareEngine::preview`] sums a client's
//! trips over a [`Period`] and [`Invoice::emit`] turns the preview into an
//! immutable invoice record.

pub use error::EngineError;
pub use fare::{FareBreakdown, FareEngine, FareEngineBuilder, compute_fare};
pub use invoice::{Invoice, InvoiceLine, InvoicePreview, InvoiceTotals, Period};
pub use money::Amount;
pub use tariff::{DEFAULT_ESPERA_FRACCION, DEFAULT_KM_MINIMO, FareConfig, FixedFare};
pub use tolls::{TollRoute, TollTable};
pub use trip::{ESTADO_NEGATIVO, Trip};

mod error;
mod fare;
mod invoice;
mod money;
mod normalize;
mod tariff;
mod tolls;
mod trip;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
