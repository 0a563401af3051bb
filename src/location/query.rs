//! Geocoding query composition.

use super::types::{LocationType, PlaceHierarchy};

/// A geocoding query and the location type it will be ranked under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub text: String,
    pub location_type: LocationType,
}

/// Compose a postal-style query (prefecture → city → town) from a hierarchy.
///
/// The location type is the finest level present. Returns `None` for an
/// empty hierarchy; the caller must not geocode in that case.
pub fn compose(places: &PlaceHierarchy) -> Option<GeocodeQuery> {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    let mut location_type = LocationType::Other;

    if let Some(town) = places.town.as_deref() {
        parts.push(town);
        location_type = LocationType::Town;
    }
    if let Some(city) = places.city.as_deref() {
        parts.push(city);
        if location_type == LocationType::Other {
            location_type = LocationType::City;
        }
    }
    if let Some(prefecture) = places.prefecture.as_deref() {
        parts.push(prefecture);
        if location_type == LocationType::Other {
            location_type = LocationType::Prefecture;
        }
    }

    if parts.is_empty() {
        return None;
    }

    parts.reverse();
    Some(GeocodeQuery {
        text: parts.concat(),
        location_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places(prefecture: Option<&str>, city: Option<&str>, town: Option<&str>) -> PlaceHierarchy {
        PlaceHierarchy {
            prefecture: prefecture.map(String::from),
            city: city.map(String::from),
            town: town.map(String::from),
        }
    }

    #[test]
    fn test_prefecture_and_city() {
        let q = compose(&places(Some("東京都"), Some("渋谷区"), None)).unwrap();
        assert_eq!(q.text, "東京都渋谷区");
        assert_eq!(q.location_type, LocationType::City);
    }

    #[test]
    fn test_all_levels() {
        let q = compose(&places(Some("東京都"), Some("八王子市"), Some("高尾町"))).unwrap();
        assert_eq!(q.text, "東京都八王子市高尾町");
        assert_eq!(q.location_type, LocationType::Town);
    }

    #[test]
    fn test_town_only() {
        let q = compose(&places(None, None, Some("白川村"))).unwrap();
        assert_eq!(q.text, "白川村");
        assert_eq!(q.location_type, LocationType::Town);
    }

    #[test]
    fn test_prefecture_and_town() {
        let q = compose(&places(Some("長野県"), None, Some("軽井沢町"))).unwrap();
        assert_eq!(q.text, "長野県軽井沢町");
        assert_eq!(q.location_type, LocationType::Town);
    }

    #[test]
    fn test_prefecture_only() {
        let q = compose(&places(Some("沖縄県"), None, None)).unwrap();
        assert_eq!(q.text, "沖縄県");
        assert_eq!(q.location_type, LocationType::Prefecture);
    }

    #[test]
    fn test_empty_is_no_query() {
        assert!(compose(&PlaceHierarchy::default()).is_none());
    }
}
