use crate::models::BusRoute;

fn route(
    route_number: &str,
    route_name: &str,
    origin: &str,
    destination: &str,
    duration_minutes: i32,
    price: f64,
    departure_times: &[&str],
    total_seats: i32,
    amenities: &[&str],
    description: &str,
) -> BusRoute {
    BusRoute {
        id: None,
        route_number: route_number.to_string(),
        route_name: route_name.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        duration_minutes,
        price,
        departure_times: departure_times.iter().map(|t| t.to_string()).collect(),
        total_seats,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        description: description.to_string(),
    }
}

/// Sample routes loaded into an empty `bus_routes` collection.
pub fn sample_routes() -> Vec<BusRoute> {
    vec![
        route(
            "RR-101",
            "Coastal Express",
            "Nairobi",
            "Mombasa",
            480,
            22.0,
            &["08:00", "14:00", "22:00"],
            40,
            &["WiFi", "Air Conditioning", "Reclining Seats"],
            "Daily service down to the coast with an overnight option.",
        ),
        route(
            "RR-102",
            "Lakeside Link",
            "Nairobi",
            "Kisumu",
            420,
            14.5,
            &["07:30", "13:00", "21:00"],
            44,
            &["USB Charging", "Reclining Seats"],
            "Western route via Nakuru and Kericho.",
        ),
        route(
            "RR-103",
            "Rift Valley Shuttle",
            "Nairobi",
            "Nakuru",
            180,
            8.0,
            &["06:00", "09:00", "12:00", "17:00"],
            48,
            &["Air Conditioning"],
            "Frequent short hop to Nakuru.",
        ),
        route(
            "RR-104",
            "Highlands Executive",
            "Nairobi",
            "Eldoret",
            360,
            13.0,
            &["07:30", "15:30"],
            40,
            &["WiFi", "Snacks", "USB Charging"],
            "Executive coach to the North Rift.",
        ),
        route(
            "RR-105",
            "Coast Return",
            "Mombasa",
            "Nairobi",
            480,
            22.0,
            &["09:00", "21:30"],
            32,
            &["WiFi", "Air Conditioning", "Toilet"],
            "Luxury coach back to the capital.",
        ),
        route(
            "RR-106",
            "Western Night Rider",
            "Nairobi",
            "Kakamega",
            480,
            15.0,
            &["20:30"],
            52,
            &["Blankets", "Reclining Seats"],
            "Overnight service to Kakamega via Kisumu.",
        ),
    ]
}
