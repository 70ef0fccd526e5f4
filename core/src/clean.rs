//! Turns the noisy text read from a region into a typed value. None of these
//! fail: text that cannot be made sense of gives the field's default.

use crate::champions::{ChampionEntry, ChampionTable};

fn is_number(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_digit())
}

/// `"1 234"` → 1234, anything unparsable → 0.
pub fn clean_numeric<S: AsRef<str>>(texts: &[S]) -> i64 {
    let joined = texts
        .iter()
        .flat_map(|t| t.as_ref().chars())
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    joined.parse().unwrap_or(0)
}

/// Splits a shop slot into costs and champion names. Words of one text that
/// are not numbers form a single name, so "Miss Fortune" stays whole.
pub fn clean_roster<S: AsRef<str>>(texts: &[S], champions: &ChampionTable) -> Vec<ChampionEntry> {
    let mut costs = Vec::new();
    let mut names = Vec::new();
    for text in texts {
        let mut name = Vec::new();
        for word in text.as_ref().split_whitespace() {
            if is_number(word) {
                costs.push(word.parse::<u32>().unwrap_or(0));
                if !name.is_empty() {
                    names.push(name.join(" "));
                    name.clear();
                }
            } else {
                name.push(word);
            }
        }
        if !name.is_empty() {
            names.push(name.join(" "));
        }
    }

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            champions.lookup(&name).unwrap_or_else(|| ChampionEntry {
                cost: costs.get(i).copied().unwrap_or(0),
                name,
                traits: Vec::new(),
            })
        })
        .collect()
}

/// Appends the trait names in `texts` to `active`. Anything carrying a digit
/// is a misread and gets dropped.
pub fn clean_traits<S: AsRef<str>>(texts: &[S], active: &mut Vec<String>) {
    for text in texts {
        let text = text.as_ref().trim();
        if text.is_empty() || text.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        if !active.iter().any(|t| t == text) {
            active.push(text.to_string());
        }
    }
}
