//! Prompt construction for generated energy-saving tips

use crate::classify::ConsumptionClass;

/// Everything the backend needs to build one tip-generation request
#[derive(Debug, Clone)]
pub struct TipPrompt {
    /// Average hourly consumption in kWh
    pub average_kwh: f64,
    pub classification: ConsumptionClass,
    /// Upper bound on the number of tips the model is asked for
    pub max_tips: usize,
    /// Requested output languages. Accepted for API compatibility; output
    /// is always German regardless (known limitation of the service).
    pub languages: Vec<String>,
    /// Context snippets retrieved via similarity search, at most two
    pub context_snippets: Vec<String>,
}

impl TipPrompt {
    pub fn new(
        average_kwh: f64,
        classification: ConsumptionClass,
        max_tips: usize,
        languages: Vec<String>,
    ) -> Self {
        Self {
            average_kwh,
            classification,
            max_tips,
            languages,
            context_snippets: Vec::new(),
        }
    }

    pub fn with_context(mut self, snippets: Vec<String>) -> Self {
        self.context_snippets = snippets;
        self
    }

    /// Target language name for the instruction. Always German, whatever
    /// was requested.
    fn language(&self) -> &'static str {
        "Deutsch"
    }

    /// Fixed system message sent with every generation request
    pub fn system_message(&self) -> &'static str {
        "Du bist ein Experte für Haushalts-Energieeffizienz. Priorität haben \
         Sicherheit und Genauigkeit. Antworte ausschließlich auf Deutsch."
    }

    /// Render the user instruction
    pub fn user_message(&self) -> String {
        let mut prompt = format!(
            "Erstelle präzise und sichere Energiespartipps für einen deutschen Haushalt auf {}.\n\
             - Durchschnittlicher stündlicher Verbrauch: {} kWh.\n\
             - Einstufung des Verbrauchs: {}.\n\
             - Gib zwischen 3 und {} praktische Tipps.\n\
             Bedingungen: Keine gefährlichen technischen Ratschläge, keine erfundenen Zahlen. \
             Kurze, umsetzbare Sätze. Bei unzureichenden Informationen antworte: \
             'Keine genauen Angaben möglich.'\n\
             Fokus auf alltägliche, sichere Energiesparmaßnahmen.",
            self.language(),
            self.average_kwh,
            self.classification.as_str(),
            self.max_tips
        );

        if !self.context_snippets.is_empty() {
            prompt.push_str("\nKontext (bewährte Tipps):");
            for snippet in &self.context_snippets {
                prompt.push_str("\n- ");
                prompt.push_str(snippet);
            }
        }

        prompt
    }
}
