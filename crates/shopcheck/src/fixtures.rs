//! Test data provider.
//!
//! Plain records handed to scenarios. Everything is fixed except the
//! registration email, which carries a millisecond timestamp so repeated
//! runs never collide with accounts created earlier.

use crate::config::{SuiteConfig, UserCredentials};
use serde::{Deserialize, Serialize};

/// Registration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Unique email
    pub email: String,
    /// Password
    pub password: String,
    /// Date of birth, `dd/mm/yyyy`
    pub date_of_birth: Option<String>,
    /// Street address
    pub address: Option<String>,
    /// Postal code
    pub postcode: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or entity
    pub state: Option<String>,
    /// Country
    pub country: Option<String>,
    /// Phone number
    pub phone: Option<String>,
}

/// Credentials for negative login scenarios
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidCredentials {
    /// Not an email address
    pub invalid_email: String,
    /// Too short to be anyone's password
    pub invalid_password: String,
    /// Empty email
    pub empty_email: String,
    /// Empty password
    pub empty_password: String,
    /// Well-formed but unregistered
    pub non_existent_email: String,
    /// Well-formed but wrong
    pub wrong_password: String,
}

/// Search terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchData {
    /// Matches products
    pub valid_search: String,
    /// Matches other products
    pub valid_search_alternative: String,
    /// Matches nothing
    pub invalid_search: String,
    /// Empty query
    pub empty_search: String,
}

/// Contact form payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormData {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Subject
    pub subject: String,
    /// Message body
    pub message: String,
}

/// Product category used by the browsing scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryData {
    /// Link text in the menu
    pub name: String,
    /// Fragment expected in the category URL
    pub slug: String,
}

/// Fixture source bound to one suite configuration
#[derive(Debug, Clone)]
pub struct TestData {
    base_url: String,
    existing_user: UserCredentials,
}

impl TestData {
    /// Fixtures for `config`
    #[must_use]
    pub fn new(config: &SuiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            existing_user: config.credentials.clone(),
        }
    }

    /// Storefront root
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Registered account
    #[must_use]
    pub fn existing_user(&self) -> UserCredentials {
        self.existing_user.clone()
    }

    /// Registration payload with an email unique to this instant
    #[must_use]
    pub fn new_user() -> NewUser {
        Self::new_user_at(chrono::Utc::now().timestamp_millis())
    }

    /// Registration payload for a given unix timestamp in milliseconds
    #[must_use]
    pub fn new_user_at(timestamp_millis: i64) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("testuser{timestamp_millis}@example.com"),
            password: "TestPassword123!".to_string(),
            date_of_birth: Some("01/01/1990".to_string()),
            address: Some("Test Address 123".to_string()),
            postcode: Some("71000".to_string()),
            city: Some("Sarajevo".to_string()),
            state: Some("Federation of Bosnia and Herzegovina".to_string()),
            country: Some("Bosnia and Herzegovina".to_string()),
            phone: Some("+387 61 123 456".to_string()),
        }
    }

    #[must_use]
    pub fn invalid_credentials() -> InvalidCredentials {
        InvalidCredentials {
            invalid_email: "notanemail".to_string(),
            invalid_password: "wrong".to_string(),
            empty_email: String::new(),
            empty_password: String::new(),
            non_existent_email: "nonexistent@example.com".to_string(),
            wrong_password: "WrongPassword123!".to_string(),
        }
    }

    #[must_use]
    pub fn search_data() -> SearchData {
        SearchData {
            valid_search: "filozofija".to_string(),
            valid_search_alternative: "roman".to_string(),
            invalid_search: "xyzabc123notfound".to_string(),
            empty_search: String::new(),
        }
    }

    #[must_use]
    pub fn contact_form_data() -> ContactFormData {
        ContactFormData {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: "testuser@example.com".to_string(),
            subject: "Test Subject".to_string(),
            message: "This is a test message for contact form validation.".to_string(),
        }
    }

    #[must_use]
    pub fn category() -> CategoryData {
        CategoryData {
            name: "Knjige za odrasle".to_string(),
            slug: "knjige-za-odrasle".to_string(),
        }
    }
}
