//! Shopping-list aggregation.
//!
//! Given the ingredient rows of every recipe in a user's cart, collapse them
//! into one bucket per (ingredient name, measurement unit), sum the amounts,
//! and render a numbered plain-text list. Mismatched units never merge: the
//! unit is part of the bucket key, so "flour/g" and "flour/tbsp" stay
//! separate lines.

use std::collections::BTreeMap;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

const HEADER: &str = "Shopping list:";

/// One aggregation bucket: the summed amount of a single ingredient under a
/// single measurement unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientTotal {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Collapse raw (name, unit, amount) rows into sorted, summed buckets.
///
/// Buckets are ordered ascending by ingredient name (case-sensitive ordinal
/// on the stored name), with the unit as a tie-breaker between identical
/// names, so the output is deterministic for a given cart.
pub fn aggregate(rows: impl IntoIterator<Item = (String, String, i32)>) -> Vec<IngredientTotal> {
    let mut buckets: BTreeMap<(String, String), i64> = BTreeMap::new();

    for (name, unit, amount) in rows {
        *buckets.entry((name, unit)).or_insert(0) += i64::from(amount);
    }

    buckets
        .into_iter()
        .map(|((name, measurement_unit), total)| IngredientTotal {
            name,
            measurement_unit,
            total,
        })
        .collect()
}

/// Render buckets as the downloadable text body: a header line, then one
/// numbered line per bucket. An empty cart renders the header alone.
///
/// Capitalization of the ingredient name happens here only; stored catalog
/// names are never touched.
pub fn render(totals: &[IngredientTotal]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for (i, bucket) in totals.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {} {}.\n",
            i + 1,
            capitalize(&bucket.name),
            bucket.total,
            bucket.measurement_unit,
        ));
    }

    out
}

/// Uppercase the first character, leaving the rest of the name as stored.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, amount: i32) -> (String, String, i32) {
        (name.to_string(), unit.to_string(), amount)
    }

    #[test]
    fn sums_same_ingredient_across_recipes() {
        // Recipe A: flour 200g. Recipe B: flour 300g, sugar 50g.
        let totals = aggregate(vec![
            row("flour", "g", 200),
            row("flour", "g", 300),
            row("sugar", "g", 50),
        ]);

        assert_eq!(
            totals,
            vec![
                IngredientTotal {
                    name: "flour".to_string(),
                    measurement_unit: "g".to_string(),
                    total: 500,
                },
                IngredientTotal {
                    name: "sugar".to_string(),
                    measurement_unit: "g".to_string(),
                    total: 50,
                },
            ]
        );
    }

    #[test]
    fn renders_numbered_capitalized_lines() {
        let totals = aggregate(vec![
            row("flour", "g", 200),
            row("flour", "g", 300),
            row("sugar", "g", 50),
        ]);

        assert_eq!(
            render(&totals),
            "Shopping list:\n1. Flour - 500 g.\n2. Sugar - 50 g.\n"
        );
    }

    #[test]
    fn empty_cart_renders_header_only() {
        let totals = aggregate(Vec::new());
        assert!(totals.is_empty());
        assert_eq!(render(&totals), "Shopping list:\n");
    }

    #[test]
    fn mismatched_units_never_merge() {
        let totals = aggregate(vec![row("flour", "g", 100), row("flour", "tbsp", 2)]);

        assert_eq!(totals.len(), 2);
        assert_eq!(
            render(&totals),
            "Shopping list:\n1. Flour - 100 g.\n2. Flour - 2 tbsp.\n"
        );
    }

    #[test]
    fn sorts_by_stored_name_ordinal() {
        // Ordinal, case-sensitive: uppercase sorts before lowercase.
        let totals = aggregate(vec![row("salt", "g", 5), row("Zucchini", "pc", 1)]);

        assert_eq!(totals[0].name, "Zucchini");
        assert_eq!(totals[1].name, "salt");
    }

    #[test]
    fn aggregation_is_deterministic() {
        let rows = || {
            vec![
                row("sugar", "g", 50),
                row("flour", "g", 300),
                row("flour", "g", 200),
            ]
        };

        let first = render(&aggregate(rows()));
        let second = render(&aggregate(rows()));
        assert_eq!(first, second);
    }

    #[test]
    fn capitalization_is_render_only() {
        let totals = aggregate(vec![row("brown sugar", "g", 10)]);

        // Stored name keeps its case in the bucket; only the rendered line
        // gets the leading capital.
        assert_eq!(totals[0].name, "brown sugar");
        assert_eq!(
            render(&totals),
            "Shopping list:\n1. Brown sugar - 10 g.\n"
        );
    }

    #[test]
    fn capitalize_handles_unicode() {
        assert_eq!(capitalize("яблоко"), "Яблоко");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("égg"), "Égg");
    }

    #[test]
    fn amounts_sum_in_i64() {
        let totals = aggregate(vec![
            row("rice", "g", i32::MAX),
            row("rice", "g", i32::MAX),
        ]);
        assert_eq!(totals[0].total, 2 * i64::from(i32::MAX));
    }
}
