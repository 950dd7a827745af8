use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::review::RatingSummary;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BusRoute {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub route_number: String,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub departure_times: Vec<String>,
    pub total_seats: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl BusRoute {
    pub fn id_hex(&self) -> String {
        self.id.map(|oid| oid.to_hex()).unwrap_or_default()
    }

    /// Case-insensitive substring match over name, origin, destination and route number.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        [&self.route_name, &self.origin, &self.destination, &self.route_number]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    pub fn offers_departure(&self, time: &str) -> bool {
        self.departure_times.iter().any(|t| t == time)
    }

    /// Seat numbers selectable on this route, `1..=total_seats`.
    pub fn seat_map(&self) -> Vec<u32> {
        (1..=self.total_seats.max(0) as u32).collect()
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct RouteResponse {
    pub id: String,
    pub route_number: String,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
    pub duration_minutes: i32,
    pub price: f64,
    pub departure_times: Vec<String>,
    pub total_seats: i32,
    pub amenities: Vec<String>,
    pub description: String,
}

impl From<BusRoute> for RouteResponse {
    fn from(route: BusRoute) -> Self {
        Self {
            id: route.id_hex(),
            route_number: route.route_number,
            route_name: route.route_name,
            origin: route.origin,
            destination: route.destination,
            duration_minutes: route.duration_minutes,
            price: route.price,
            departure_times: route.departure_times,
            total_seats: route.total_seats,
            amenities: route.amenities,
            description: route.description,
        }
    }
}

/// The slice of a route embedded in booking listings.
#[derive(Serialize, Clone, Debug)]
pub struct RouteSummary {
    pub id: String,
    pub route_number: String,
    pub route_name: String,
    pub origin: String,
    pub destination: String,
}

impl From<&BusRoute> for RouteSummary {
    fn from(route: &BusRoute) -> Self {
        Self {
            id: route.id_hex(),
            route_number: route.route_number.clone(),
            route_name: route.route_name.clone(),
            origin: route.origin.clone(),
            destination: route.destination.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct RouteWithRating {
    #[serde(flatten)]
    pub route: RouteResponse,
    #[serde(flatten)]
    pub rating: RatingSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> BusRoute {
        BusRoute {
            id: Some(ObjectId::new()),
            route_number: "RR-101".to_string(),
            route_name: "Coastal Express".to_string(),
            origin: "Nairobi".to_string(),
            destination: "Mombasa".to_string(),
            duration_minutes: 480,
            price: 25.0,
            departure_times: vec!["08:00".to_string(), "22:00".to_string()],
            total_seats: 4,
            amenities: vec![],
            description: String::new(),
        }
    }

    #[test]
    fn search_is_case_insensitive_on_all_four_fields() {
        let route = route();
        assert!(route.matches_query("coastal"));
        assert!(route.matches_query("NAIROBI"));
        assert!(route.matches_query("mOmBa"));
        assert!(route.matches_query("rr-1"));
        assert!(!route.matches_query("kisumu"));
    }

    #[test]
    fn search_ignores_other_fields() {
        let mut route = route();
        route.description = "overnight sleeper".to_string();
        route.amenities = vec!["WiFi".to_string()];
        assert!(!route.matches_query("sleeper"));
        assert!(!route.matches_query("wifi"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(route().matches_query(""));
    }

    #[test]
    fn query_whitespace_is_significant() {
        let route = route();
        assert!(!route.matches_query(" nairobi"));
        assert!(!route.matches_query("   "));
        assert!(route.matches_query("coastal "));
    }

    #[test]
    fn departure_must_be_listed() {
        let route = route();
        assert!(route.offers_departure("08:00"));
        assert!(!route.offers_departure("09:00"));
        assert!(!route.offers_departure(""));
    }

    #[test]
    fn seat_map_covers_every_seat() {
        assert_eq!(route().seat_map(), vec![1, 2, 3, 4]);
        let mut empty = route();
        empty.total_seats = 0;
        assert!(empty.seat_map().is_empty());
    }
}
