//! Smart priority scoring.

use super::rules::{leading_float, leading_int};
use crate::intake::Rof5Form;
use crate::workflow::Priority;

/// Additive score behind [`smart_priority`].
pub fn priority_score(form: &Rof5Form) -> u32 {
    let mut score = 0;

    if form.county.to_lowercase().contains("nairobi") {
        score += 2;
    }
    if form.site_location.to_lowercase().contains("cbd") {
        score += 2;
    }

    match form.requested_priority() {
        Some(Priority::High) => score += 3,
        Some(Priority::Medium) => score += 1,
        _ => {}
    }

    let rent = leading_float(&form.monthly_rent).unwrap_or(0.0);
    if rent > 500_000.0 {
        score += 2;
    }
    if rent > 200_000.0 {
        score += 1;
    }

    if leading_int(&form.lease_term).unwrap_or(0) >= 10 {
        score += 1;
    }

    score
}

/// Priority from the score: 5 and up is high, 3 and up medium.
pub fn smart_priority(form: &Rof5Form) -> Priority {
    let score = priority_score(form);
    let priority = match score {
        5.. => Priority::High,
        3..=4 => Priority::Medium,
        _ => Priority::Low,
    };
    tracing::debug!(score, priority = %priority, "Computed smart priority");
    priority
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_is_low() {
        assert_eq!(priority_score(&Rof5Form::default()), 0);
        assert_eq!(smart_priority(&Rof5Form::default()), Priority::Low);
    }

    #[test]
    fn test_nairobi_cbd_is_high() {
        let form = Rof5Form {
            county: "Nairobi".into(),
            site_location: "CBD".into(),
            lease_term: "15".into(),
            ..Rof5Form::default()
        };
        assert_eq!(priority_score(&form), 5);
        assert_eq!(smart_priority(&form), Priority::High);
    }

    #[test]
    fn test_rent_bands_stack() {
        let mut form = Rof5Form { monthly_rent: "600000".into(), ..Rof5Form::default() };
        assert_eq!(priority_score(&form), 3);
        assert_eq!(smart_priority(&form), Priority::Medium);

        form.monthly_rent = "250000".into();
        assert_eq!(priority_score(&form), 1);

        form.monthly_rent = "200000".into();
        assert_eq!(priority_score(&form), 0);
    }

    #[test]
    fn test_urgency_weights() {
        let mut form = Rof5Form { urgency_level: "medium".into(), ..Rof5Form::default() };
        assert_eq!(priority_score(&form), 1);

        form.urgency_level = "high".into();
        assert_eq!(priority_score(&form), 3);
        assert_eq!(smart_priority(&form), Priority::Medium);

        form.urgency_level = "low".into();
        assert_eq!(priority_score(&form), 0);
    }

    #[test]
    fn test_short_term_not_counted() {
        let form = Rof5Form { lease_term: "9.9".into(), ..Rof5Form::default() };
        assert_eq!(priority_score(&form), 0);
    }

    #[test]
    fn test_oversized_term_still_counts() {
        let form = Rof5Form { lease_term: "99999999999999999999".into(), ..Rof5Form::default() };
        assert_eq!(priority_score(&form), 1);
    }
}
