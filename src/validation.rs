//! Form validation for the booking, profile and review forms.
//!
//! Each validator returns the first failing rule's message, in the order the
//! form fields are laid out.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::booking::JOURNEY_DATE_FORMAT;
use crate::models::{BusRoute, CreateBookingRequest, CreateReviewRequest, UpdateProfileRequest};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX: usize = 20;
const REVIEW_TITLE_MAX: usize = 100;
const REVIEW_COMMENT_MAX: usize = 1000;

/// A booking form that passed validation against its route.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub passenger_name: String,
    pub passenger_email: String,
    pub passenger_phone: String,
    pub journey_date: NaiveDate,
    pub departure_time: String,
    /// Sorted, de-duplicated seat numbers.
    pub seat_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: Option<String>,
}

pub fn validate_booking(
    req: &CreateBookingRequest,
    route: &BusRoute,
    today: NaiveDate,
) -> Result<BookingDraft, ValidationError> {
    if req.seat_numbers.is_empty() {
        return Err(ValidationError("Please select at least one seat"));
    }

    let passenger_name = validate_name(&req.passenger_name, "Name must be at least 2 characters")?;

    let passenger_email = req.passenger_email.trim();
    if passenger_email.len() > EMAIL_MAX || !is_valid_email(passenger_email) {
        return Err(ValidationError("Invalid email address"));
    }

    let passenger_phone = req.passenger_phone.trim();
    if !is_valid_phone(passenger_phone) {
        return Err(ValidationError("Phone number must be at least 10 digits"));
    }

    let journey_date = req.journey_date.trim();
    if journey_date.is_empty() {
        return Err(ValidationError("Please select a date"));
    }
    let journey_date = NaiveDate::parse_from_str(journey_date, JOURNEY_DATE_FORMAT)
        .map_err(|_| ValidationError("Invalid journey date"))?;
    if journey_date < today {
        return Err(ValidationError("Journey date cannot be in the past"));
    }

    let departure_time = req.departure_time.trim();
    if departure_time.is_empty() {
        return Err(ValidationError("Please select a departure time"));
    }
    if !route.offers_departure(departure_time) {
        return Err(ValidationError("Invalid departure time for this route"));
    }

    let seat_numbers = normalize_seats(&req.seat_numbers, route.total_seats)?;

    Ok(BookingDraft {
        passenger_name,
        passenger_email: passenger_email.to_string(),
        passenger_phone: passenger_phone.to_string(),
        journey_date,
        departure_time: departure_time.to_string(),
        seat_numbers,
    })
}

pub fn validate_profile(req: &UpdateProfileRequest) -> Result<ProfileUpdate, ValidationError> {
    let full_name = validate_name(&req.full_name, "Name must be at least 2 characters")?;

    let phone = req.phone.trim();
    let phone = if phone.is_empty() {
        None
    } else if is_valid_phone(phone) {
        Some(phone.to_string())
    } else {
        return Err(ValidationError("Phone must be at least 10 digits"));
    };

    Ok(ProfileUpdate { full_name, phone })
}

pub fn validate_review(req: &CreateReviewRequest) -> Result<(), ValidationError> {
    if !(1..=5).contains(&req.rating) {
        return Err(ValidationError("Rating must be between 1 and 5"));
    }
    if req.title.trim().is_empty() {
        return Err(ValidationError("Please enter a review title"));
    }
    if req.title.chars().count() > REVIEW_TITLE_MAX {
        return Err(ValidationError("Title must be at most 100 characters"));
    }
    if req.comment.chars().count() > REVIEW_COMMENT_MAX {
        return Err(ValidationError("Comment must be at most 1000 characters"));
    }
    Ok(())
}

fn validate_name(raw: &str, too_short: &'static str) -> Result<String, ValidationError> {
    let name = raw.trim();
    let len = name.chars().count();
    if len < NAME_MIN {
        return Err(ValidationError(too_short));
    }
    if len > NAME_MAX {
        return Err(ValidationError("Name must be at most 100 characters"));
    }
    Ok(name.to_string())
}

/// `local@domain.tld` shape: one `@`, no whitespace, a dotted domain
/// whose labels are non-empty.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || local.starts_with('.') || local.ends_with('.') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels.last().is_some_and(|tld| tld.len() >= 2)
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    digits >= PHONE_MIN_DIGITS && phone.chars().count() <= PHONE_MAX
}

fn normalize_seats(raw: &[String], total_seats: i32) -> Result<Vec<String>, ValidationError> {
    let mut seats = Vec::with_capacity(raw.len());
    for seat in raw {
        let number: i32 = seat
            .trim()
            .parse()
            .map_err(|_| ValidationError("Invalid seat selection"))?;
        if number < 1 || number > total_seats {
            return Err(ValidationError("Invalid seat selection"));
        }
        seats.push(number);
    }
    seats.sort_unstable();
    seats.dedup();
    Ok(seats.into_iter().map(|n| n.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn route() -> BusRoute {
        BusRoute {
            id: Some(ObjectId::new()),
            route_number: "RR-202".to_string(),
            route_name: "Lakeside Link".to_string(),
            origin: "Nairobi".to_string(),
            destination: "Kisumu".to_string(),
            duration_minutes: 420,
            price: 18.0,
            departure_times: vec!["07:30".to_string(), "13:00".to_string()],
            total_seats: 40,
            amenities: vec![],
            description: String::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn request() -> CreateBookingRequest {
        CreateBookingRequest {
            route_id: String::new(),
            journey_date: "2024-06-20".to_string(),
            departure_time: "07:30".to_string(),
            seat_numbers: vec!["12".to_string(), "3".to_string()],
            passenger_name: "  Grace Hopper ".to_string(),
            passenger_email: "grace@example.com".to_string(),
            passenger_phone: "+254 712 345 678".to_string(),
        }
    }

    fn message(req: &CreateBookingRequest) -> &'static str {
        validate_booking(req, &route(), today()).unwrap_err().message()
    }

    #[test]
    fn accepts_a_complete_form() {
        let draft = validate_booking(&request(), &route(), today()).unwrap();
        assert_eq!(draft.passenger_name, "Grace Hopper");
        assert_eq!(draft.journey_date, NaiveDate::from_ymd_opt(2024, 6, 20).unwrap());
        assert_eq!(draft.seat_numbers, vec!["3", "12"]);
    }

    #[test]
    fn seats_are_checked_before_anything_else() {
        let req = CreateBookingRequest { seat_numbers: vec![], passenger_name: String::new(), ..request() };
        assert_eq!(message(&req), "Please select at least one seat");
    }

    #[test]
    fn rejects_short_name() {
        let req = CreateBookingRequest { passenger_name: " A ".to_string(), ..request() };
        assert_eq!(message(&req), "Name must be at least 2 characters");
    }

    #[test]
    fn rejects_long_name() {
        let req = CreateBookingRequest { passenger_name: "x".repeat(101), ..request() };
        assert_eq!(message(&req), "Name must be at most 100 characters");
    }

    #[test]
    fn rejects_malformed_email() {
        for email in ["", "grace", "grace@", "@example.com", "grace@example", "gr ace@example.com", "a@b@c.com"] {
            let req = CreateBookingRequest { passenger_email: email.to_string(), ..request() };
            assert_eq!(message(&req), "Invalid email address", "{email}");
        }
    }

    #[test]
    fn rejects_phone_with_too_few_digits() {
        let req = CreateBookingRequest { passenger_phone: "071-234-567".to_string(), ..request() };
        assert_eq!(message(&req), "Phone number must be at least 10 digits");
        let req = CreateBookingRequest { passenger_phone: "0".repeat(21), ..request() };
        assert_eq!(message(&req), "Phone number must be at least 10 digits");
    }

    #[test]
    fn rejects_missing_or_past_date() {
        let req = CreateBookingRequest { journey_date: String::new(), ..request() };
        assert_eq!(message(&req), "Please select a date");
        let req = CreateBookingRequest { journey_date: "20/06/2024".to_string(), ..request() };
        assert_eq!(message(&req), "Invalid journey date");
        let req = CreateBookingRequest { journey_date: "2024-06-14".to_string(), ..request() };
        assert_eq!(message(&req), "Journey date cannot be in the past");
    }

    #[test]
    fn same_day_travel_is_allowed() {
        let req = CreateBookingRequest { journey_date: "2024-06-15".to_string(), ..request() };
        assert!(validate_booking(&req, &route(), today()).is_ok());
    }

    #[test]
    fn departure_time_must_come_from_the_route() {
        let req = CreateBookingRequest { departure_time: String::new(), ..request() };
        assert_eq!(message(&req), "Please select a departure time");
        let req = CreateBookingRequest { departure_time: "09:00".to_string(), ..request() };
        assert_eq!(message(&req), "Invalid departure time for this route");
    }

    #[test]
    fn seats_must_exist_on_the_bus() {
        for seat in ["0", "41", "A1", "-2"] {
            let req = CreateBookingRequest { seat_numbers: vec![seat.to_string()], ..request() };
            assert_eq!(message(&req), "Invalid seat selection", "{seat}");
        }
    }

    #[test]
    fn duplicate_seats_collapse() {
        let req = CreateBookingRequest {
            seat_numbers: vec!["5".to_string(), "5".to_string(), " 2".to_string()],
            ..request()
        };
        let draft = validate_booking(&req, &route(), today()).unwrap();
        assert_eq!(draft.seat_numbers, vec!["2", "5"]);
    }

    #[test]
    fn profile_phone_is_optional() {
        let update = validate_profile(&UpdateProfileRequest {
            full_name: "Ada Lovelace".to_string(),
            phone: "  ".to_string(),
        })
        .unwrap();
        assert_eq!(update.phone, None);

        let err = validate_profile(&UpdateProfileRequest {
            full_name: "Ada Lovelace".to_string(),
            phone: "12345".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.message(), "Phone must be at least 10 digits");
    }

    #[test]
    fn profile_requires_name() {
        let err = validate_profile(&UpdateProfileRequest::default()).unwrap_err();
        assert_eq!(err.message(), "Name must be at least 2 characters");
    }

    #[test]
    fn review_rating_bounds() {
        let review = |rating| CreateReviewRequest { rating, title: "Fine".to_string(), comment: String::new() };
        assert!(validate_review(&review(1)).is_ok());
        assert!(validate_review(&review(5)).is_ok());
        assert_eq!(validate_review(&review(0)).unwrap_err().message(), "Rating must be between 1 and 5");
        assert_eq!(validate_review(&review(6)).unwrap_err().message(), "Rating must be between 1 and 5");
    }

    #[test]
    fn review_text_limits() {
        let req = CreateReviewRequest { rating: 4, title: "t".repeat(101), comment: String::new() };
        assert_eq!(validate_review(&req).unwrap_err().message(), "Title must be at most 100 characters");
        let req = CreateReviewRequest { rating: 4, title: "Long".to_string(), comment: "c".repeat(1001) };
        assert_eq!(validate_review(&req).unwrap_err().message(), "Comment must be at most 1000 characters");
    }

    #[test]
    fn review_needs_a_title() {
        let req = CreateReviewRequest { rating: 4, title: String::new(), comment: "Great".to_string() };
        assert_eq!(validate_review(&req).unwrap_err().message(), "Please enter a review title");
        let req = CreateReviewRequest { rating: 4, title: "   ".to_string(), comment: String::new() };
        assert_eq!(validate_review(&req).unwrap_err().message(), "Please enter a review title");
    }
}
