pub mod auth;
pub mod booking;
pub mod profile;
pub mod review;
pub mod route;

// Re-export all the models that are used in other modules
pub use auth::{Claims, NavLink, SessionResponse};
pub use booking::{
    Booking, BookingListItem, BookingResponse, BookingStatus, CreateBookingRequest, PaymentStatus,
    PaymentSummary,
};
pub use profile::{Profile, ProfileResponse, UpdateProfileRequest};
pub use review::{rating_from_number, CreateReviewRequest, RatingSummary, Review, ReviewResponse};
pub use route::{BusRoute, RouteResponse, RouteSummary, RouteWithRating};
