use std::collections::HashSet;

/// Closed ring of lon/lat positions.
pub type Ring = Vec<(f64, f64)>;
/// Exterior ring followed by holes.
pub type Polygon = Vec<Ring>;

/// Polygonal geometry of a country.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
}

impl Shape {
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> + '_ {
        let slice: &[Polygon] = match self {
            Shape::Polygon(polygon) => std::slice::from_ref(polygon),
            Shape::MultiPolygon(polygons) => polygons,
        };
        slice.iter()
    }

    /// Every ring, exteriors and holes alike.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        self.polygons().flatten()
    }
}

/// Naming properties used for highlight matching.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CountryProperties {
    pub name: Option<String>,
    pub admin: Option<String>,
    pub name_long: Option<String>,
}

impl CountryProperties {
    /// True when NAME, ADMIN or NAME_LONG, lowercased, is in `wanted`.
    pub fn matches(&self, wanted: &HashSet<String>) -> bool {
        [&self.name, &self.admin, &self.name_long]
            .into_iter()
            .flatten()
            .any(|value| wanted.contains(&value.to_lowercase()))
    }

    /// Best display label.
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.admin.as_deref())
            .or(self.name_long.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub properties: CountryProperties,
    pub shape: Shape,
}

/// Countries in source order. Immutable once loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldFeatureCollection {
    pub features: Vec<Feature>,
}

impl WorldFeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Feature> {
        self.features.get(idx)
    }
}
