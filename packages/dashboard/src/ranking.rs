//! Safest-area ranking.

use community_safety_dashboard_models::AreaScore;
use community_safety_dataset::Dataset;

/// Number of areas listed in the "safest suburbs" panel.
pub const TOP_SAFEST_COUNT: usize = 3;

/// The `n` areas with the highest final safety score, best first.
///
/// Only areas with a crime row are ranked; placeholders would otherwise tie
/// at 0. Ties are broken by name. Independent of the selected year.
#[must_use]
pub fn top_safest_areas(dataset: &Dataset, n: usize) -> Vec<AreaScore> {
    let mut scored: Vec<AreaScore> = dataset
        .crime_rows()
        .map(|area| AreaScore {
            name: area.name.clone(),
            score: area.final_safety_score(),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.name.cmp(&b.name))
    });
    scored.truncate(n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixture;

    #[test]
    fn ranks_by_final_score() {
        let top = top_safest_areas(&fixture(), TOP_SAFEST_COUNT);
        let names: Vec<&str> = top.iter().map(|a| a.name.as_str()).collect();
        // Lord Howe Island (99) is excluded at load
        assert_eq!(names, ["Albury", "Ballina", "Sydney"]);
        assert!((top[0].score - 72.0).abs() < f64::EPSILON);
    }

    #[test]
    fn truncates_to_n() {
        assert_eq!(top_safest_areas(&fixture(), 1).len(), 1);
        assert!(top_safest_areas(&fixture(), 0).is_empty());
    }

    #[test]
    fn never_lists_placeholders() {
        let top = top_safest_areas(&fixture(), 10);
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|a| a.name != "BLACKTOWN"));
    }
}
