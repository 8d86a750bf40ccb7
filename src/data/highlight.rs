use std::collections::HashSet;

use crate::data::{Feature, WorldFeatureCollection};

/// Features selected for the highlight overlay, as indices into the collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
    indices: Vec<usize>,
}

impl HighlightSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Resolve indices against the collection they were computed from.
    pub fn features<'a>(&'a self, world: &'a WorldFeatureCollection) -> impl Iterator<Item = &'a Feature> + 'a {
        self.indices.iter().filter_map(|&idx| world.get(idx))
    }
}

/// Select features whose NAME, ADMIN or NAME_LONG equals a requested name, ignoring case.
/// Each feature appears at most once, in collection order. Unmatched names are ignored.
pub fn resolve_highlights(world: &WorldFeatureCollection, names: &[String]) -> HighlightSet {
    if names.is_empty() {
        return HighlightSet::empty();
    }

    let wanted: HashSet<String> = names.iter().map(|n| n.to_lowercase()).collect();
    let indices = world
        .features
        .iter()
        .enumerate()
        .filter(|(_, feature)| feature.properties.matches(&wanted))
        .map(|(idx, _)| idx)
        .collect();

    HighlightSet { indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CountryProperties, Shape};

    fn feature(name: &str, admin: &str, name_long: &str) -> Feature {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Feature {
            properties: CountryProperties {
                name: opt(name),
                admin: opt(admin),
                name_long: opt(name_long),
            },
            shape: Shape::Polygon(vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]]),
        }
    }

    fn world() -> WorldFeatureCollection {
        WorldFeatureCollection {
            features: vec![
                feature("India", "India", "India"),
                feature("", "", "Japan"),
                feature("Japan Trench", "", ""),
                feature("France", "France", "French Republic"),
                feature("Bharat", "Republic of India", "Hindustan"),
            ],
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_names_yield_empty_set() {
        assert!(resolve_highlights(&world(), &[]).is_empty());
    }

    #[test]
    fn test_india_japan_scenario() {
        let world = world();
        let set = resolve_highlights(&world, &names(&["India", "Japan"]));
        assert_eq!(set.indices(), &[0, 1]);
        let labels: Vec<_> = set.features(&world).filter_map(|f| f.properties.label()).collect();
        assert_eq!(labels, vec!["India", "Japan"]);
    }

    #[test]
    fn test_case_insensitive_admin() {
        let world = WorldFeatureCollection {
            features: vec![feature("Bharat", "India", "")],
        };
        let set = resolve_highlights(&world, &names(&["india"]));
        assert_eq!(set.indices(), &[0]);
    }

    #[test]
    fn test_fields_checked_independently() {
        let set = resolve_highlights(&world(), &names(&["FRENCH REPUBLIC", "republic of india"]));
        assert_eq!(set.indices(), &[3, 4]);
    }

    #[test]
    fn test_feature_matching_several_names_included_once() {
        let set = resolve_highlights(&world(), &names(&["France", "french republic", "FRANCE"]));
        assert_eq!(set.indices(), &[3]);
    }

    #[test]
    fn test_unknown_names_ignored() {
        let set = resolve_highlights(&world(), &names(&["Atlantis", "japan"]));
        assert_eq!(set.indices(), &[1]);
        assert!(resolve_highlights(&world(), &names(&["Atlantis"])).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let world = world();
        let list = names(&["India", "Japan", "France"]);
        assert_eq!(resolve_highlights(&world, &list), resolve_highlights(&world, &list));
    }
}
