//! Rule-based tip catalog
//!
//! Fixed German tip texts. The base catalog is extended with tips specific
//! to the consumption classification, then truncated to the requested count.

use crate::classify::ConsumptionClass;

/// Safe, always-applicable tips (German)
pub const BASE_TIPS: [&str; 8] = [
    "Schalten Sie Geräte im Standby-Modus nachts vollständig aus.",
    "Verwenden Sie energieeffiziente LED-Beleuchtung.",
    "Betreiben Sie Wasch- und Spülmaschine nur bei voller Beladung.",
    "Trennen Sie unbenutzte Ladegeräte vom Stromnetz.",
    "Senken Sie die Warmwassertemperatur um 1-2 Grad ab.",
    "Nutzen Sie Zeitschaltuhren für elektrische Geräte.",
    "Überprüfen Sie die Dichtungen von Kühl- und Gefrierschränken.",
    "Verwenden Sie Deckel beim Kochen auf dem Herd.",
];

const HIGH_TIPS: [&str; 3] = [
    "Verlagern Sie den Betrieb energieintensiver Geräte in verbrauchsarme Zeiten.",
    "Prüfen Sie, ob alte Geräte durch energieeffizientere ersetzt werden können.",
    "Führen Sie einen Energie-Check durch, um Großverbraucher im Haushalt zu identifizieren.",
];

const LOW_TIPS: [&str; 3] = [
    "Ihr Verbrauch ist niedrig — prüfen Sie, ob automatische Abschaltungen korrekt funktionieren.",
    "Nutzen Sie Energiesparmodi und behalten Sie Wartungsempfehlungen bei.",
    "Kontrollieren Sie, ob Messwerte plausibel sind (z.B. kein fehlerhafter Sensor).",
];

const NORMAL_TIPS: [&str; 2] = [
    "Planen Sie energieintensive Haushaltsaufgaben in Zeiten mit niedrigerem Verbrauch.",
    "Nutzen Sie Zeitschaltuhren und effiziente Betriebsweisen für Geräte.",
];

/// Largest possible catalog: 8 base tips + the 3-tip extensions.
/// Requests above this are clamped so truncation is always in range.
pub const TIP_CEILING: usize = BASE_TIPS.len() + HIGH_TIPS.len();

/// Build the ordered rule-based tip list for a classification.
///
/// Base catalog first, then the classification-specific extension
/// (`Normal` and `Unknown` share the general one), truncated to
/// `min(max_tips, TIP_CEILING)`.
pub fn rule_based_tips(class: ConsumptionClass, max_tips: usize) -> Vec<String> {
    let extension: &[&str] = match class {
        ConsumptionClass::High => &HIGH_TIPS,
        ConsumptionClass::Low => &LOW_TIPS,
        ConsumptionClass::Normal | ConsumptionClass::Unknown => &NORMAL_TIPS,
    };

    BASE_TIPS
        .iter()
        .chain(extension.iter())
        .take(max_tips.min(TIP_CEILING))
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_exceeds_max_tips() {
        for max in 0..=15 {
            let tips = rule_based_tips(ConsumptionClass::Normal, max);
            assert!(tips.len() <= max);
        }
    }

    #[test]
    fn test_default_count() {
        let tips = rule_based_tips(ConsumptionClass::Normal, 5);
        assert_eq!(tips.len(), 5);
        assert_eq!(tips[0], BASE_TIPS[0]);
    }

    #[test]
    fn test_full_catalog_for_high() {
        let tips = rule_based_tips(ConsumptionClass::High, 11);
        assert_eq!(tips.len(), 11);
        for high_tip in HIGH_TIPS {
            assert!(tips.iter().any(|t| t == high_tip));
        }
    }

    #[test]
    fn test_clamps_above_ceiling() {
        let tips = rule_based_tips(ConsumptionClass::High, 100);
        assert_eq!(tips.len(), TIP_CEILING);
    }

    #[test]
    fn test_low_extension() {
        let tips = rule_based_tips(ConsumptionClass::Low, 11);
        assert!(tips.iter().any(|t| t == LOW_TIPS[0]));
        assert!(!tips.iter().any(|t| t == HIGH_TIPS[0]));
    }

    #[test]
    fn test_unknown_uses_general_extension() {
        let tips = rule_based_tips(ConsumptionClass::Unknown, 10);
        assert_eq!(tips.len(), 10);
        assert!(tips.iter().any(|t| t == NORMAL_TIPS[0]));
    }

    #[test]
    fn test_base_catalog_comes_first() {
        let tips = rule_based_tips(ConsumptionClass::High, 8);
        assert_eq!(tips, BASE_TIPS.map(String::from).to_vec());
    }
}
