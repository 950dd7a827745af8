use serde::{Deserialize, Serialize};

/// Claims carried by the auth provider's access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: usize,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

/// What the navigation bar needs to render.
#[derive(Serialize, Debug)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub links: Vec<NavLink>,
}

impl SessionResponse {
    pub fn nav_links(authenticated: bool) -> Vec<NavLink> {
        let mut links = vec![
            NavLink { label: "Home", href: "/" },
            NavLink { label: "Routes", href: "/routes" },
        ];
        if authenticated {
            links.push(NavLink { label: "My Bookings", href: "/bookings" });
            links.push(NavLink { label: "Profile", href: "/profile" });
        } else {
            links.push(NavLink { label: "Sign In", href: "/auth" });
        }
        links
    }
}
