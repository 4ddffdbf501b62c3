//! Plain-text tables for the terminal.

use fare_engine::{Amount, FareBreakdown, InvoiceLine, InvoicePreview};

fn money(value: f64, symbol: &str) -> String {
    Amount::new(value).with_symbol(symbol)
}

pub fn breakdown(fare: &FareBreakdown, symbol: &str) -> String {
    let kind = if fare.es_fija { "tarifa fija" } else { "distancia" };
    let mut out = format!("Base ({kind}): {}\n", money(fare.base, symbol));
    out.push_str(&format!("Espera: {}\n", money(fare.espera, symbol)));
    if fare.tiene_peaje {
        out.push_str(&format!("Peaje: {}\n", money(fare.monto_peaje, symbol)));
    }
    out.push_str(&format!("Total: {}\n", money(fare.total_viaje, symbol)));
    out
}

fn row(cells: [&str; 8]) -> String {
    let [id, fecha, origen, destino, base, espera, peaje, total] = cells;
    format!(
        "{id:<10} {fecha:<10} {origen:<28} {destino:<28} {base:>12} {espera:>12} {peaje:>12} {total:>12}\n"
    )
}

fn line_row(line: &InvoiceLine, symbol: &str) -> String {
    let fare = &line.breakdown;
    let fecha = line.fecha.map(|d| d.to_string()).unwrap_or_default();
    row([
        &truncate(line.trip_id.as_deref().unwrap_or("-"), 10),
        &fecha,
        &truncate(&line.origen, 28),
        &truncate(&line.destino, 28),
        &money(fare.base, symbol),
        &money(fare.espera, symbol),
        &money(fare.monto_peaje, symbol),
        &money(fare.total_viaje, symbol),
    ])
}

pub fn preview(preview: &InvoicePreview, symbol: &str) -> String {
    let mut out = String::new();
    if let Some(period) = &preview.period {
        out.push_str(&format!("Periodo: {} a {}\n", period.start(), period.end()));
    }
    out.push_str(&row([
        "Viaje", "Fecha", "Origen", "Destino", "Base", "Espera", "Peaje", "Total",
    ]));
    for line in &preview.lines {
        out.push_str(&line_row(line, symbol));
    }

    let totals = &preview.totals;
    out.push_str(&format!(
        "{:<79} {:>12} {:>12} {:>12} {:>12}\n",
        format!("{} viajes", preview.lines.len()),
        money(totals.base, symbol),
        money(totals.espera, symbol),
        money(totals.peaje, symbol),
        money(totals.total, symbol),
    ));
    if preview.skipped > 0 {
        out.push_str(&format!(
            "{} viajes sin fecha fuera del periodo\n",
            preview.skipped
        ));
    }
    out
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
