//! The Person actor model, including its Portable Contacts sub-records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An actor: the author of a feed, the subject of an activity, or the
/// object of a social verb such as `follow`.
///
/// Every field is optional, but a usable actor carries at least a `uid`
/// or a `uri`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Stable identifier for this person.
    pub uid: Option<String>,
    /// The uri that uniquely identifies this person.
    pub uri: Option<String>,
    /// Plain name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,

    /// Portable Contacts display name.
    pub display_name: Option<String>,
    /// Portable Contacts preferred username.
    pub preferred_username: Option<String>,
    /// Nickname.
    pub nickname: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Free-text note about this person.
    pub note: Option<String>,

    /// Birthday.
    pub birthday: Option<NaiveDate>,
    /// Anniversary.
    pub anniversary: Option<NaiveDate>,

    /// When the record was first published.
    pub published: Option<DateTime<Utc>>,
    /// When the record was last updated.
    pub updated: Option<DateTime<Utc>>,

    /// Structured name components.
    pub extended_name: Option<ExtendedName>,
    /// Organization membership.
    pub organization: Option<Organization>,
    /// Physical address.
    pub address: Option<Address>,
    /// Authoritative account for this person.
    pub account: Option<Account>,
}

impl Person {
    /// A person with only a name, the common case when mentioning or
    /// following someone whose profile has not been fetched.
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The best human-readable handle available.
    #[must_use]
    pub fn preferred_display_name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .or(self.preferred_username.as_deref())
            .or(self.nickname.as_deref())
            .or(self.uri.as_deref())
    }
}

/// Structured name components (Portable Contacts `name`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedName {
    /// The full formatted name.
    pub formatted: Option<String>,
    /// Family name; "last name" in Western contexts.
    pub family_name: Option<String>,
    /// Given name; "first name" in Western contexts.
    pub given_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Honorific prefix, e.g. "Dr.".
    pub honorific_prefix: Option<String>,
    /// Honorific suffix, e.g. "Esq.".
    pub honorific_suffix: Option<String>,
}

/// Organization membership (Portable Contacts `organization`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name.
    pub name: Option<String>,
    /// Department within the organization.
    pub department: Option<String>,
    /// Title or role.
    pub title: Option<String>,
    /// Kind of organization, canonically "job" or "school".
    pub kind: Option<String>,
    /// When the person joined.
    pub start_date: Option<NaiveDate>,
    /// When the person left.
    pub end_date: Option<NaiveDate>,
    /// Physical location.
    pub location: Option<String>,
    /// Free-text description of the role.
    pub description: Option<String>,
}

/// Physical address (Portable Contacts `address`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Formatted representation; may contain newlines.
    pub formatted: Option<String>,
    /// Full street address; may contain newlines.
    pub street_address: Option<String>,
    /// City or locality.
    pub locality: Option<String>,
    /// State or region.
    pub region: Option<String>,
    /// Zipcode or postal code.
    pub postal_code: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

/// An account held by the person (Portable Contacts `account`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Top-most authoritative domain, e.g. "example.social".
    pub domain: Option<String>,
    /// Alphanumeric username, typically user-chosen.
    pub username: Option<String>,
    /// Assigned user id unique within the domain.
    pub userid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_display_name_order() {
        let mut person = Person::with_name("wilkie");
        assert_eq!(person.preferred_display_name(), Some("wilkie"));

        person.display_name = Some("Wilkie".into());
        assert_eq!(person.preferred_display_name(), Some("Wilkie"));

        let bare = Person {
            uri: Some("https://example.social/wilkie".into()),
            ..Person::default()
        };
        assert_eq!(
            bare.preferred_display_name(),
            Some("https://example.social/wilkie")
        );
    }
}
