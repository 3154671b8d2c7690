//! Local checks that block a submission before anything is sent.

use crate::model::{AdFields, PostFields};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("no ids given")]
    NothingSelected,
}

pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(value)
}

pub fn post(fields: &PostFields) -> Result<(), ValidationError> {
    required("title", &fields.title)?;
    required("content", &fields.content)?;
    required("category", &fields.category)?;
    Ok(())
}

pub fn ad(fields: &AdFields) -> Result<(), ValidationError> {
    required("title", &fields.title)?;
    required("image", &fields.image_url)?;
    required("link", &fields.link)?;
    Ok(())
}

pub fn passwords(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    required("password", password)?;
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

pub fn selection(ids: &[i64]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        return Err(ValidationError::NothingSelected);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_post() -> PostFields {
        PostFields {
            title: "Hello".to_string(),
            content: "Body".to_string(),
            category: "Tech".to_string(),
            ..PostFields::default()
        }
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Rust "), Ok("Rust"));
        assert_eq!(required("name", " \t"), Err(ValidationError::Missing("name")));
    }

    #[test]
    fn test_post_needs_title_content_and_category() {
        assert_eq!(post(&complete_post()), Ok(()));

        let mut fields = complete_post();
        fields.category.clear();
        assert_eq!(post(&fields), Err(ValidationError::Missing("category")));

        let mut fields = complete_post();
        fields.title = "   ".to_string();
        assert_eq!(post(&fields), Err(ValidationError::Missing("title")));
    }

    #[test]
    fn test_ad_needs_title_image_and_link() {
        let mut fields = AdFields {
            title: "Sale".to_string(),
            link: "https://shop".to_string(),
            ..AdFields::default()
        };
        assert_eq!(ad(&fields), Err(ValidationError::Missing("image")));
        fields.image_url = "https://cdn/x.png".to_string();
        assert_eq!(ad(&fields), Ok(()));
    }

    #[test]
    fn test_password_confirmation() {
        assert_eq!(passwords("secret", "secret"), Ok(()));
        assert_eq!(passwords("secret", "secreT"), Err(ValidationError::PasswordMismatch));
        assert_eq!(passwords("", ""), Err(ValidationError::Missing("password")));
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(selection(&[]), Err(ValidationError::NothingSelected));
        assert_eq!(selection(&[4]), Ok(()));
    }
}
