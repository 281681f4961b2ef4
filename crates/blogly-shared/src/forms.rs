//! Form parsing and validation.
//!
//! Handlers receive a raw [`FormFields`] body and turn it into a typed form
//! before touching the database. Every problem is collected, so one response
//! can report all of them.

use serde::Deserialize;
use thiserror::Error;

pub const NAME_MAX_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 100;

/// Every field problem found in a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Raw `application/x-www-form-urlencoded` pairs, keeping repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for FormFields {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl FormFields {
    /// First value submitted under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `name`, in submission order.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed value, with blank treated as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[derive(Default)]
struct Checker {
    errors: Vec<String>,
}

impl Checker {
    fn required(&mut self, fields: &FormFields, name: &str, label: &str) -> String {
        match fields.text(name) {
            Some(value) => value,
            None => {
                self.errors.push(format!("{label} is required"));
                String::new()
            }
        }
    }

    fn bounded(&mut self, fields: &FormFields, name: &str, label: &str, max: usize) -> String {
        let value = self.required(fields, name, label);
        if value.chars().count() > max {
            self.errors
                .push(format!("{label} must be at most {max} characters"));
        }
        value
    }

    fn ids(&mut self, fields: &FormFields, name: &str) -> Vec<i32> {
        let mut ids = Vec::new();
        for raw in fields.all(name) {
            match raw.trim().parse::<i32>() {
                Ok(id) if id > 0 => ids.push(id),
                _ => self.errors.push(format!("'{raw}' is not a valid tag")),
            }
        }
        ids
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.errors))
        }
    }
}

/// Fields of the new-user and edit-user forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    /// `None` when the picture field was missing or blank.
    pub image_url: Option<String>,
}

impl TryFrom<&FormFields> for UserForm {
    type Error = ValidationErrors;

    fn try_from(fields: &FormFields) -> Result<Self, Self::Error> {
        let mut check = Checker::default();
        let first_name = check.bounded(fields, "firstname", "First name", NAME_MAX_CHARS);
        let last_name = check.bounded(fields, "lastname", "Last name", NAME_MAX_CHARS);
        let image_url = fields.text("profilepicture");

        check.finish(Self {
            first_name,
            last_name,
            image_url,
        })
    }
}

/// Fields of the new-post and edit-post forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub tag_ids: Vec<i32>,
}

impl TryFrom<&FormFields> for PostForm {
    type Error = ValidationErrors;

    fn try_from(fields: &FormFields) -> Result<Self, Self::Error> {
        let mut check = Checker::default();
        let title = check.bounded(fields, "title", "Title", TITLE_MAX_CHARS);
        let content = match fields.get("content") {
            Some(body) if !body.trim().is_empty() => body.to_string(),
            _ => {
                check.errors.push("Content is required".to_string());
                String::new()
            }
        };
        let tag_ids = check.ids(fields, "tags");

        check.finish(Self {
            title,
            content,
            tag_ids,
        })
    }
}

/// Fields of the new-tag and edit-tag forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagForm {
    pub name: String,
}

impl TryFrom<&FormFields> for TagForm {
    type Error = ValidationErrors;

    fn try_from(fields: &FormFields) -> Result<Self, Self::Error> {
        let mut check = Checker::default();
        let name = check.required(fields, "name", "Tag name");
        check.finish(Self { name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_form_treats_blank_picture_as_absent() {
        let fields = FormFields::from([
            ("firstname", " New "),
            ("lastname", "Challenger"),
            ("profilepicture", "  "),
        ]);
        let form = UserForm::try_from(&fields).unwrap();
        assert_eq!(form.first_name, "New");
        assert_eq!(form.last_name, "Challenger");
        assert_eq!(form.image_url, None);
    }

    #[test]
    fn user_form_reports_every_missing_field() {
        let fields = FormFields::from([("profilepicture", "www.google.com")]);
        let err = UserForm::try_from(&fields).unwrap_err();
        assert_eq!(
            err.messages(),
            ["First name is required", "Last name is required"]
        );
    }

    #[test]
    fn user_form_limits_name_length() {
        let long = "x".repeat(NAME_MAX_CHARS + 1);
        let fields = FormFields::from([("firstname", long.as_str()), ("lastname", "Ok")]);
        let err = UserForm::try_from(&fields).unwrap_err();
        assert_eq!(err.messages(), ["First name must be at most 30 characters"]);
    }

    #[test]
    fn post_form_collects_repeated_tags() {
        let fields = FormFields::from([
            ("title", "Hello"),
            ("content", "Body\n"),
            ("tags", "2"),
            ("tags", "5"),
        ]);
        let form = PostForm::try_from(&fields).unwrap();
        assert_eq!(form.tag_ids, vec![2, 5]);
        assert_eq!(form.content, "Body\n");
    }

    #[test]
    fn post_form_without_tags_is_valid() {
        let fields = FormFields::from([("title", "Hello"), ("content", "Body")]);
        assert!(PostForm::try_from(&fields).unwrap().tag_ids.is_empty());
    }

    #[test]
    fn post_form_rejects_bad_tag_ids() {
        let fields = FormFields::from([
            ("title", "Hello"),
            ("content", "Body"),
            ("tags", "abc"),
            ("tags", "-1"),
        ]);
        let err = PostForm::try_from(&fields).unwrap_err();
        assert_eq!(
            err.messages(),
            ["'abc' is not a valid tag", "'-1' is not a valid tag"]
        );
    }

    #[test]
    fn post_form_requires_content() {
        let fields = FormFields::from([("title", "Hello"), ("content", "   ")]);
        let err = PostForm::try_from(&fields).unwrap_err();
        assert_eq!(err.to_string(), "Content is required");
    }

    #[test]
    fn tag_form_requires_name() {
        let err = TagForm::try_from(&FormFields::default()).unwrap_err();
        assert_eq!(err.messages(), ["Tag name is required"]);
    }
}
