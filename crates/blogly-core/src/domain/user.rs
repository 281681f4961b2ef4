use serde::{Deserialize, Serialize};

/// Placeholder avatar used when a user is created without a picture.
pub const DEFAULT_IMAGE_URL: &str = "https://upload.wikimedia.org/wikipedia/commons/thumb/7/7c/User_font_awesome.svg/512px-User_font_awesome.svg.png";

/// User entity - an author of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub image_url: Option<String>,
}

impl User {
    /// "First Last", as shown on listings and in confirmation messages.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Apply edited fields. An absent picture is stored as NULL, not the placeholder.
    pub fn apply(&mut self, first_name: String, last_name: String, image_url: Option<String>) {
        self.first_name = first_name;
        self.last_name = last_name;
        self.image_url = image_url;
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
}

impl NewUser {
    /// Create a new user, falling back to [`DEFAULT_IMAGE_URL`] when no picture is given.
    pub fn new(first_name: String, last_name: String, image_url: Option<String>) -> Self {
        Self {
            first_name,
            last_name,
            image_url: image_url.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_with_single_space() {
        let user = User {
            id: 1,
            first_name: "TestUser".into(),
            last_name: "Jones".into(),
            image_url: None,
        };
        assert_eq!(user.full_name(), "TestUser Jones");
    }

    #[test]
    fn new_user_defaults_picture() {
        let user = NewUser::new("Ada".into(), "Lovelace".into(), None);
        assert_eq!(user.image_url, DEFAULT_IMAGE_URL);

        let user = NewUser::new("Ada".into(), "Lovelace".into(), Some("www.google.com".into()));
        assert_eq!(user.image_url, "www.google.com");
    }

    #[test]
    fn apply_clears_picture_instead_of_defaulting() {
        let mut user = User {
            id: 7,
            first_name: "Old".into(),
            last_name: "Name".into(),
            image_url: Some("http://example.com/a.png".into()),
        };
        user.apply("New".into(), "Name".into(), None);
        assert_eq!(user.first_name, "New");
        assert_eq!(user.image_url, None);
    }
}
