//! Fill empty template bindings from suggestions.

use std::collections::HashMap;

use super::SuggestionProvider;
use crate::template::DocumentVariable;

/// Fill each empty binding with the first suggestion for its key.
///
/// Values filled earlier are visible to the rules for later keys, so a
/// suggested monthly rent feeds the deposit rule. Returns the keys filled.
pub fn auto_fill(
    provider: &dyn SuggestionProvider,
    bindings: &mut [DocumentVariable],
) -> Vec<String> {
    let mut known: HashMap<String, String> =
        bindings.iter().map(|b| (b.key.clone(), b.value.clone())).collect();
    let mut filled = Vec::new();

    for binding in bindings.iter_mut().filter(|b| b.value.is_empty()) {
        let Some(best) = provider.form_suggestions(&known, &binding.key).into_iter().next() else {
            continue;
        };
        binding.value = best.value;
        known.insert(binding.key.clone(), binding.value.clone());
        filled.push(binding.key.clone());
    }

    tracing::debug!(provider = provider.name(), filled = filled.len(), "Auto-filled bindings");
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::RuleBasedProvider;

    #[test]
    fn test_fills_empty_bindings_in_order() {
        let mut bindings = vec![
            DocumentVariable::new("site_location", "Karen"),
            DocumentVariable::new("land_area", "40"),
            DocumentVariable::new("monthly_rent", ""),
            DocumentVariable::new("deposit", ""),
            DocumentVariable::new("escalation_rate", ""),
            DocumentVariable::new("landlord_name", ""),
        ];

        let filled = auto_fill(&RuleBasedProvider::new(), &mut bindings);
        assert_eq!(filled, vec!["monthly_rent", "deposit", "escalation_rate"]);
        assert_eq!(bindings[2].value, "60000");
        assert_eq!(bindings[3].value, "120000");
        assert_eq!(bindings[4].value, "5");
        assert_eq!(bindings[5].value, "");
    }

    #[test]
    fn test_keeps_existing_values() {
        let mut bindings = vec![
            DocumentVariable::new("site_location", "CBD"),
            DocumentVariable::new("lease_term", "7"),
        ];
        assert!(auto_fill(&RuleBasedProvider::new(), &mut bindings).is_empty());
        assert_eq!(bindings[1].value, "7");
    }
}
