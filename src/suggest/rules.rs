//! Form-completion rule table, keyed by field name.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Suggestion;
use crate::intake::{canonical_field, FieldLookup};

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid leading float regex")
});

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[+-]?\d+").expect("valid leading int regex"));

/// VAT rate applied to professional fees.
const VAT_RATE: f64 = 0.16;

/// Numeric prefix of `text`, ignoring whatever follows it.
///
/// `"120 sqm"` reads as 120; text without a leading number reads as `None`.
pub fn leading_float(text: &str) -> Option<f64> {
    LEADING_FLOAT.find(text).and_then(|m| m.as_str().trim().parse().ok())
}

/// Integer prefix of `text`; `"10.5 years"` reads as 10.
///
/// Prefixes beyond the `i64` range saturate instead of failing.
pub fn leading_int(text: &str) -> Option<i64> {
    let digits = LEADING_INT.find(text)?.as_str().trim();
    digits.parse().ok().or_else(|| digits.parse::<f64>().ok().map(|f| f as i64))
}

/// Common telecom site locations in a county.
pub fn location_options(county: &str) -> &'static [&'static str] {
    match county.trim().to_lowercase().as_str() {
        "nairobi" => &["Westlands", "Upper Hill", "CBD", "Karen", "Runda"],
        "mombasa" => &["Nyali", "Bamburi", "Diani", "Kilifi"],
        "kisumu" => &["Milimani", "Kondele", "Mamboleo"],
        _ => &[],
    }
}

fn whole(value: f64) -> String {
    format!("{:.0}", value.round())
}

/// Suggestions for `field` given what is already filled in.
///
/// Field names may be camelCase or the snake_case template keys.
pub fn form_suggestions(form: &dyn FieldLookup, field: &str) -> Vec<Suggestion> {
    let canonical = canonical_field(field);
    let suggestions = match canonical.as_str() {
        "siteLocation" => site_location(form),
        "leaseTerm" => lease_term(form).into_iter().collect(),
        "monthlyRent" => monthly_rent(form).into_iter().collect(),
        "deposit" => deposit(form).into_iter().collect(),
        "rentEscalation" => vec![Suggestion::form(
            "rentEscalation",
            "5",
            0.75,
            "Standard annual rent escalation",
        )],
        "vatAmount" => vat_amount(form).into_iter().collect(),
        "totalAmount" => total_amount(form).into_iter().collect(),
        _ => Vec::new(),
    };

    tracing::debug!(field = %canonical, count = suggestions.len(), "Evaluated form rules");
    suggestions
}

fn site_location(form: &dyn FieldLookup) -> Vec<Suggestion> {
    let Some(county) = form.filled("county") else {
        return Vec::new();
    };
    location_options(county)
        .iter()
        .map(|location| {
            Suggestion::form(
                "siteLocation",
                *location,
                0.8,
                format!("Common location in {county} for telecom sites"),
            )
        })
        .collect()
}

fn lease_term(form: &dyn FieldLookup) -> Option<Suggestion> {
    let location = form.filled("siteLocation")?;
    let (term, area) =
        if location.to_lowercase().contains("cbd") { ("15", "urban") } else { ("20", "suburban") };
    Some(Suggestion::form(
        "leaseTerm",
        term,
        0.9,
        format!("Standard lease term for {area} areas"),
    ))
}

fn monthly_rent(form: &dyn FieldLookup) -> Option<Suggestion> {
    let location = form.filled("siteLocation")?;
    let land_area = form.filled("landArea")?;

    let area = leading_float(land_area).filter(|a| *a != 0.0).unwrap_or(1.0);
    let lower = location.to_lowercase();
    let mut rate = 1000;
    for (needle, area_rate) in [("cbd", 2000), ("westlands", 1800), ("karen", 1500)] {
        if lower.contains(needle) {
            rate = area_rate;
        }
    }

    Some(Suggestion::form(
        "monthlyRent",
        whole(area * f64::from(rate)),
        0.7,
        format!("Based on market rates for {location} (KES {rate}/sqm)"),
    ))
}

fn deposit(form: &dyn FieldLookup) -> Option<Suggestion> {
    let rent = leading_float(form.filled("monthlyRent")?)?;
    Some(Suggestion::form(
        "deposit",
        whole(rent * 2.0),
        0.85,
        "Two months' rent is the standard security deposit",
    ))
}

fn fees_and_vat(form: &dyn FieldLookup) -> Option<(f64, f64)> {
    let fees = leading_float(form.filled("total_fees")?)?;
    Some((fees, (fees * VAT_RATE).round()))
}

fn vat_amount(form: &dyn FieldLookup) -> Option<Suggestion> {
    let (_, vat) = fees_and_vat(form)?;
    Some(Suggestion::form("vat_amount", whole(vat), 0.95, "VAT at 16% of total fees"))
}

fn total_amount(form: &dyn FieldLookup) -> Option<Suggestion> {
    let (fees, vat) = fees_and_vat(form)?;
    Some(Suggestion::form("total_amount", whole(fees + vat), 0.95, "Total fees plus 16% VAT"))
}
