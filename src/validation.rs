// Lengths are counted in characters. A blank attribute only reports Blank.

use crate::config::*;
use crate::core::errors::{Field, Rule, ValidationErrors};
use crate::models::{NewTweet, NewUserAccount};

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Name rules that need no store: presence, length and character class.
pub fn validate_name(name: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => {
            errors.add(Field::Name, Rule::Blank);
            return errors;
        }
    };

    let length = name.chars().count();
    if length < MIN_NAME_LENGTH {
        errors.add(Field::Name, Rule::TooShort(MIN_NAME_LENGTH));
    }
    if length > MAX_NAME_LENGTH {
        errors.add(Field::Name, Rule::TooLong(MAX_NAME_LENGTH));
    }
    if !name.chars().all(is_name_char) {
        errors.add(Field::Name, Rule::InvalidFormat);
    }

    errors
}

pub fn validate_password(password: Option<&str>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let password = match password {
        Some(p) if !p.is_empty() => p,
        _ => {
            errors.add(Field::Password, Rule::Blank);
            return errors;
        }
    };

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        errors.add(Field::Password, Rule::TooShort(MIN_PASSWORD_LENGTH));
    }
    if length > MAX_PASSWORD_LENGTH {
        errors.add(Field::Password, Rule::TooLong(MAX_PASSWORD_LENGTH));
    }

    errors
}

pub fn validate_tweet_content(content: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if content.trim().is_empty() {
        errors.add(Field::Content, Rule::Blank);
    } else if content.chars().count() > MAX_TWEET_LENGTH {
        errors.add(Field::Content, Rule::TooLong(MAX_TWEET_LENGTH));
    }

    errors
}

impl NewUserAccount {
    /// Every rule except name uniqueness.
    pub fn validate_attributes(&self) -> Result<(), ValidationErrors> {
        let mut errors = validate_name(self.name.as_deref());
        errors.extend(validate_password(self.password.as_deref()));
        errors.into_result()
    }
}

impl NewTweet {
    pub fn validate_attributes(&self) -> Result<(), ValidationErrors> {
        validate_tweet_content(&self.content).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_attrs() -> NewUserAccount {
        NewUserAccount::new("abcde", "123456")
            .with_email("a@a.com")
            .with_phone("010-2222-0000")
    }

    #[test]
    fn test_valid_attributes() {
        assert!(valid_attrs().validate_attributes().is_ok());
    }

    #[test]
    fn test_name_length_bounds() {
        let errors = validate_name(Some("abc"));
        assert!(errors.has(Field::Name, Rule::TooShort(4)));

        assert!(validate_name(Some("abcd")).is_empty());
        assert!(validate_name(Some(&"a".repeat(40))).is_empty());

        let errors = validate_name(Some(&"a".repeat(41)));
        assert!(errors.has(Field::Name, Rule::TooLong(40)));
    }

    #[test]
    fn test_missing_name_is_blank_only() {
        let errors = validate_name(None);
        assert_eq!(errors.len(), 1);
        assert!(errors.has(Field::Name, Rule::Blank));

        assert!(validate_name(Some("")).has(Field::Name, Rule::Blank));
    }

    #[test]
    fn test_name_character_class() {
        for name in ["___abcd", "________", "Abc_123", "0123456789"] {
            assert!(validate_name(Some(name)).is_empty(), "{} should be valid", name);
        }

        for name in ["+abcd", "    ", "asdf,zzz", "진창훈ㅋ", "abc de", "abcd-e", "émile"] {
            assert!(
                validate_name(Some(name)).has(Field::Name, Rule::InvalidFormat),
                "{} should be invalid",
                name
            );
        }
    }

    #[test]
    fn test_non_ascii_length_counts_characters() {
        // four characters, twelve bytes
        let errors = validate_name(Some("진창훈ㅋ"));
        assert!(!errors.has(Field::Name, Rule::TooLong(40)));
        assert!(!errors.has(Field::Name, Rule::TooShort(4)));
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password(None).has(Field::Password, Rule::Blank));
        assert!(validate_password(Some("")).has(Field::Password, Rule::Blank));
        assert!(validate_password(Some("1234")).has(Field::Password, Rule::TooShort(6)));
        assert!(validate_password(Some("123456789101123")).has(Field::Password, Rule::TooLong(12)));
        assert!(validate_password(Some("123456")).is_empty());
        assert!(validate_password(Some("123456789012")).is_empty());
    }

    #[test]
    fn test_all_failures_are_reported() {
        let attrs = NewUserAccount::new("a b", "123");
        let errors = attrs.validate_attributes().unwrap_err();

        assert!(errors.has(Field::Name, Rule::TooShort(4)));
        assert!(errors.has(Field::Name, Rule::InvalidFormat));
        assert!(errors.has(Field::Password, Rule::TooShort(6)));
    }

    #[test]
    fn test_tweet_content_rules() {
        assert!(validate_tweet_content("test content").is_empty());
        assert!(validate_tweet_content("   ").has(Field::Content, Rule::Blank));
        assert!(validate_tweet_content(&"x".repeat(141)).has(Field::Content, Rule::TooLong(140)));
        assert!(NewTweet::new(&"x".repeat(140)).validate_attributes().is_ok());
    }
}
