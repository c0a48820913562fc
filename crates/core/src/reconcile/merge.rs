//! Folding match lists into canonical records and merging passes.

use super::types::{Connector, FormattedResponse, SearchMatch};

/// Group matches by catalog ID.
///
/// Records appear in order of first appearance of their ID; connectors keep
/// the order of the matches that produced them.
pub fn format_search(matches: Vec<SearchMatch>) -> Vec<FormattedResponse> {
    let mut formatted: Vec<FormattedResponse> = Vec::new();

    for m in matches {
        let connector = Connector {
            id: m.connector_id,
            similarity: m.similarity,
        };

        match formatted.iter_mut().find(|r| r.id == m.media.id) {
            Some(record) => record.connectors.push(connector),
            None => formatted.push(FormattedResponse::new(m.media, connector)),
        }
    }

    formatted
}

/// Merge a new pass into the current result set.
///
/// If either side is empty the other is returned unchanged. Otherwise only
/// IDs present on both sides survive, and within each surviving record only
/// connectors present on both sides survive. A surviving connector takes the
/// new similarity when the new value is at least `threshold` and strictly
/// greater than the current one.
pub fn search_compare(
    current: Vec<FormattedResponse>,
    incoming: Vec<FormattedResponse>,
    threshold: f64,
) -> Vec<FormattedResponse> {
    if current.is_empty() {
        return incoming;
    }
    if incoming.is_empty() {
        return current;
    }

    let mut merged = Vec::new();
    for cur in &current {
        for new in incoming.iter().filter(|n| n.id == cur.id) {
            let mut connectors = Vec::new();
            for existing in &cur.connectors {
                for candidate in new.connectors.iter().filter(|c| c.id == existing.id) {
                    let replace = candidate.similarity.value >= threshold
                        && candidate.similarity.value > existing.similarity.value;
                    connectors.push(if replace {
                        candidate.clone()
                    } else {
                        existing.clone()
                    });
                }
            }

            merged.push(FormattedResponse {
                id: cur.id,
                data: cur.data.clone(),
                connectors,
            });
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::Similarity;
    use crate::testing::fixtures;

    fn hit(url: &str, id: u64, value: f64) -> SearchMatch {
        SearchMatch {
            connector_id: url.to_string(),
            media: fixtures::novel(id, &format!("Title {}", id)),
            similarity: Similarity::from_value(value),
        }
    }

    fn record(id: u64, connectors: &[(&str, f64)]) -> FormattedResponse {
        FormattedResponse {
            id,
            data: fixtures::novel(id, &format!("Title {}", id)),
            connectors: connectors
                .iter()
                .map(|(url, value)| Connector {
                    id: url.to_string(),
                    similarity: Similarity::from_value(*value),
                })
                .collect(),
        }
    }

    #[test]
    fn test_format_search_groups_by_id() {
        let formatted = format_search(vec![
            hit("u1", 10, 0.9),
            hit("u2", 20, 0.8),
            hit("u3", 10, 0.7),
        ]);

        assert_eq!(formatted.len(), 2);
        assert_eq!(formatted[0].id, 10);
        assert_eq!(formatted[1].id, 20);
        let urls: Vec<_> = formatted[0].connectors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u3"]);
    }

    #[test]
    fn test_format_search_ids_unique_and_consistent() {
        let formatted = format_search(vec![
            hit("a", 3, 0.1),
            hit("b", 1, 0.2),
            hit("c", 3, 0.3),
            hit("d", 2, 0.4),
            hit("e", 1, 0.5),
        ]);

        let ids: Vec<u64> = formatted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(formatted.iter().all(|r| r.id == r.data.id));
    }

    #[test]
    fn test_format_search_empty() {
        assert!(format_search(Vec::new()).is_empty());
    }

    #[test]
    fn test_search_compare_empty_sides_pass_through() {
        let one = vec![record(1, &[("u1", 0.4)])];

        assert_eq!(search_compare(Vec::new(), one.clone(), 0.5), one);
        assert_eq!(search_compare(one.clone(), Vec::new(), 0.5), one);
        assert!(search_compare(Vec::new(), Vec::new(), 0.5).is_empty());
    }

    #[test]
    fn test_search_compare_replaces_above_threshold() {
        let merged = search_compare(
            vec![record(1, &[("u1", 0.55)])],
            vec![record(1, &[("u1", 0.70)])],
            0.5,
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].connectors[0].similarity.value, 0.70);
        assert!(merged[0].connectors[0].similarity.same);
    }

    #[test]
    fn test_search_compare_keeps_existing_below_threshold() {
        let merged = search_compare(
            vec![record(1, &[("u1", 0.55)])],
            vec![record(1, &[("u1", 0.70)])],
            0.8,
        );

        assert_eq!(merged[0].connectors[0].similarity.value, 0.55);
    }

    #[test]
    fn test_search_compare_keeps_existing_when_not_better() {
        let merged = search_compare(
            vec![record(1, &[("u1", 0.9)])],
            vec![record(1, &[("u1", 0.7)])],
            0.5,
        );

        assert_eq!(merged[0].connectors[0].similarity.value, 0.9);
    }

    #[test]
    fn test_search_compare_drops_one_sided_ids() {
        let merged = search_compare(
            vec![record(1, &[("u1", 0.5)]), record(2, &[("u2", 0.5)])],
            vec![record(2, &[("u2", 0.6)]), record(3, &[("u3", 0.9)])],
            0.5,
        );

        let ids: Vec<u64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_search_compare_drops_one_sided_connectors() {
        let merged = search_compare(
            vec![record(1, &[("u1", 0.5), ("u2", 0.5)])],
            vec![record(1, &[("u2", 0.6), ("u3", 0.9)])],
            0.5,
        );

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].connectors.len(), 1);
        assert_eq!(merged[0].connectors[0].id, "u2");
        assert_eq!(merged[0].connectors[0].similarity.value, 0.6);
    }

    #[test]
    fn test_search_compare_threshold_is_inclusive() {
        let merged = search_compare(
            vec![record(1, &[("u1", 0.2)])],
            vec![record(1, &[("u1", 0.5)])],
            0.5,
        );

        assert_eq!(merged[0].connectors[0].similarity.value, 0.5);
    }
}
