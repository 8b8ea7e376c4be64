// src/config/tables.rs
//! Word lists behind the keyword/price heuristics.
//!
//! Every list is overridable from `[tables]` in the filters file; an absent key keeps the
//! built-in list. Lists are compared against `text::normalize`d post text, so entries are
//! normalized once at load time (see [`MatchTables::normalized`]).

use serde::Deserialize;

use crate::text::normalize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchTables {
    /// Plain substrings that indicate the destination ("recife", "pernambuco").
    pub destination_names: Vec<String>,
    /// Short codes that only count as whole words, bounded by whitespace or the text
    /// edge ("pe", "para pe").
    pub destination_codes: Vec<String>,
    /// Codes that may also touch a hyphen, as in "gru-rec" or "rec-sp" ("rec").
    pub destination_hyphen_codes: Vec<String>,
    /// Compound forms matched as plain substrings ("gru-rec", "rumo pe").
    pub destination_compounds: Vec<String>,
    /// Flight/travel vocabulary: fares, airlines, airports.
    pub travel_terms: Vec<String>,
    /// Hints that a fare is international and gets the higher price cap.
    pub international_terms: Vec<String>,
    /// Narrow destination check run before fare enrichment.
    pub corridor_indicators: Vec<String>,
    /// Narrow flight vocabulary run before fare enrichment.
    pub corridor_flight_terms: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for MatchTables {
    fn default() -> Self {
        Self {
            destination_names: strings(&["recife", "pernambuco"]),
            destination_codes: strings(&["pe", "para pe"]),
            destination_hyphen_codes: strings(&["rec"]),
            destination_compounds: strings(&[
                "gru-rec",
                "sp-rec",
                "sp-pe",
                "rec.",
                "destino pe",
                "rumo pe",
            ]),
            travel_terms: strings(&[
                "passagem",
                "passagens",
                "voo",
                "voos",
                "viagem",
                "viagens",
                "azul",
                "gol",
                "latam",
                "guarulhos",
                "congonhas",
                "gru",
                "cgh",
                "voar",
                "aereo",
                "aerea",
                "aereas",
                "bilhete",
                "bilhetes",
            ]),
            international_terms: strings(&[
                "internacional",
                "europa",
                "eua",
                "asia",
                "africa",
                "oceania",
                "paris",
                "london",
                "new york",
                "tokyo",
                "madrid",
                "rome",
            ]),
            corridor_indicators: strings(&[
                "recife", "pernambuco", " pe ", " rec ", "-rec", "gru-rec", "sp-rec",
            ]),
            corridor_flight_terms: strings(&[
                "voo",
                "voos",
                "passagem",
                "passagens",
                "voar",
                "aereo",
                "aerea",
            ]),
        }
    }
}

impl MatchTables {
    /// Normalize every entry so matching can compare against normalized text directly.
    /// Leading/trailing spaces are significant for the corridor lists and are kept.
    pub fn normalized(mut self) -> Self {
        fn norm_all(v: &mut Vec<String>) {
            for s in v.iter_mut() {
                *s = normalize(s);
            }
            v.retain(|s| !s.is_empty());
        }
        fn norm_keep_padding(v: &mut Vec<String>) {
            for s in v.iter_mut() {
                let lead = s.starts_with(' ');
                let trail = s.ends_with(' ');
                let core = normalize(s);
                *s = format!(
                    "{}{}{}",
                    if lead { " " } else { "" },
                    core,
                    if trail { " " } else { "" }
                );
            }
            v.retain(|s| !s.trim().is_empty());
        }
        norm_all(&mut self.destination_names);
        norm_all(&mut self.destination_codes);
        norm_all(&mut self.destination_hyphen_codes);
        norm_all(&mut self.destination_compounds);
        norm_all(&mut self.travel_terms);
        norm_all(&mut self.international_terms);
        norm_keep_padding(&mut self.corridor_indicators);
        norm_all(&mut self.corridor_flight_terms);
        self
    }
}
