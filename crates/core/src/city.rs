//! City and weather condition definitions.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Current weather readings for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    /// Temperature in Celsius
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    /// Pressure in hPa
    pub pressure: u32,
    /// Relative humidity in percent
    pub humidity: u32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Short condition (e.g., "Clear", "Rain")
    pub summary: CompactString,
    /// Longer condition text (e.g., "Scattered clouds")
    pub description: CompactString,
}

/// A tracked city with its latest conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// City identifier (e.g., "new-york")
    pub id: CompactString,
    /// Display name (e.g., "New York")
    pub name: CompactString,
    /// ISO-ish country code (e.g., "US")
    pub country: CompactString,
    pub conditions: WeatherConditions,
}

impl City {
    #[allow(clippy::too_many_arguments)]
    fn seeded(
        id: &str,
        name: &str,
        country: &str,
        temp: f64,
        feels_like: f64,
        temp_min: f64,
        temp_max: f64,
        pressure: u32,
        humidity: u32,
        wind_speed: f64,
        summary: &str,
        description: &str,
    ) -> Self {
        Self {
            id: CompactString::new(id),
            name: CompactString::new(name),
            country: CompactString::new(country),
            conditions: WeatherConditions {
                temp,
                feels_like,
                temp_min,
                temp_max,
                pressure,
                humidity,
                wind_speed,
                summary: CompactString::new(summary),
                description: CompactString::new(description),
            },
        }
    }

    /// The fixed city list the dashboard tracks at startup.
    pub fn seed_list() -> Vec<City> {
        vec![
            City::seeded("new-york", "New York", "US", 22.0, 23.0, 20.0, 25.0, 1012, 65, 5.2, "Clear", "Clear sky"),
            City::seeded("london", "London", "UK", 18.0, 17.0, 16.0, 20.0, 1008, 78, 4.1, "Clouds", "Scattered clouds"),
            City::seeded("tokyo", "Tokyo", "JP", 26.0, 28.0, 24.0, 29.0, 1015, 70, 3.5, "Rain", "Light rain"),
            City::seeded("sydney", "Sydney", "AU", 24.0, 25.0, 22.0, 27.0, 1010, 60, 6.2, "Clear", "Clear sky"),
            City::seeded("paris", "Paris", "FR", 20.0, 19.0, 18.0, 22.0, 1009, 72, 3.8, "Clouds", "Broken clouds"),
            City::seeded("dubai", "Dubai", "AE", 36.0, 40.0, 34.0, 38.0, 1005, 45, 5.5, "Clear", "Clear sky"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_list_contents() {
        let cities = City::seed_list();
        assert_eq!(cities.len(), 6);

        let tokyo = cities.iter().find(|c| c.id == "tokyo").unwrap();
        assert_eq!(tokyo.country.as_str(), "JP");
        assert_eq!(tokyo.conditions.temp, 26.0);
        assert_eq!(tokyo.conditions.summary.as_str(), "Rain");
    }

    #[test]
    fn test_city_ids_unique() {
        let cities = City::seed_list();
        for (i, a) in cities.iter().enumerate() {
            for b in &cities[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
