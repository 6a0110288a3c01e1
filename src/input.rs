//! Parsing of operator-entered coordinate text such as `"41.0966, 16.7384"`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinates are empty")]
    Empty,
    #[error("expected `lat, lon`, found {found} component(s)")]
    ComponentCount { found: usize },
    #[error("latitude `{0}` is not a number")]
    InvalidLatitude(String),
    #[error("longitude `{0}` is not a number")]
    InvalidLongitude(String),
    #[error("latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),
}

/// Parses `"lat, lon"` into a (lat, lon) pair.
///
/// Whitespace anywhere in the text is ignored.
pub fn parse_coordinates(text: &str) -> Result<(f64, f64), CoordinateError> {
    let compact: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(CoordinateError::Empty);
    }

    let parts: Vec<&str> = compact.split(',').collect();
    let [lat_text, lon_text] = parts.as_slice() else {
        return Err(CoordinateError::ComponentCount { found: parts.len() });
    };

    let lat = parse_component(lat_text).ok_or_else(|| CoordinateError::InvalidLatitude(lat_text.to_string()))?;
    let lon = parse_component(lon_text).ok_or_else(|| CoordinateError::InvalidLongitude(lon_text.to_string()))?;

    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CoordinateError::LongitudeOutOfRange(lon));
    }

    Ok((lat, lon))
}

fn parse_component(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_spaces() {
        assert_eq!(parse_coordinates(" 41.0966 , 16.7384 ").unwrap(), (41.0966, 16.7384));
        assert_eq!(parse_coordinates("40.8866,16.852").unwrap(), (40.8866, 16.852));
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse_coordinates("   "), Err(CoordinateError::Empty));
    }

    #[test]
    fn test_component_count() {
        assert_eq!(parse_coordinates("41.09"), Err(CoordinateError::ComponentCount { found: 1 }));
        assert_eq!(
            parse_coordinates("41.09, 16.73, 12"),
            Err(CoordinateError::ComponentCount { found: 3 })
        );
    }

    #[test]
    fn test_identifies_bad_component() {
        assert_eq!(
            parse_coordinates("41,09, 16.73").unwrap_err(),
            CoordinateError::ComponentCount { found: 3 }
        );
        assert_eq!(
            parse_coordinates("nord, 16.73"),
            Err(CoordinateError::InvalidLatitude("nord".to_string()))
        );
        assert_eq!(
            parse_coordinates("41.09, "),
            Err(CoordinateError::InvalidLongitude(String::new()))
        );
        assert_eq!(
            parse_coordinates("41.09, inf"),
            Err(CoordinateError::InvalidLongitude("inf".to_string()))
        );
    }

    #[test]
    fn test_range_checks() {
        assert_eq!(parse_coordinates("91, 16"), Err(CoordinateError::LatitudeOutOfRange(91.0)));
        assert_eq!(parse_coordinates("41, -181"), Err(CoordinateError::LongitudeOutOfRange(-181.0)));
    }
}
