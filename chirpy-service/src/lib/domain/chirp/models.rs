use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::chirp::errors::ChirpBodyError;
use crate::domain::chirp::errors::ChirpIdError;
use crate::domain::user::models::UserId;

/// Words masked out of every chirp, compared case-insensitively.
const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

/// Chirp unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChirpId(pub Uuid);

impl ChirpId {
    /// Generate a new random chirp ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a chirp ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ChirpIdError> {
        Uuid::parse_str(s)
            .map(ChirpId)
            .map_err(|e| ChirpIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ChirpId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChirpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Chirp text, length-checked and with profanity masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChirpBody(String);

impl ChirpBody {
    pub const MAX_LENGTH: usize = 140;

    /// Validate and clean a raw chirp body.
    ///
    /// # Errors
    /// * `TooLong` - More than 140 characters
    pub fn new(body: String) -> Result<Self, ChirpBodyError> {
        let length = body.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ChirpBodyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(Self::clean(&body)))
    }

    /// Wrap text already stored, skipping validation.
    pub fn from_stored(body: String) -> Self {
        Self(body)
    }

    fn clean(body: &str) -> String {
        body.split(' ')
            .map(|word| {
                let lowered = word.to_lowercase();
                if PROFANE_WORDS.contains(&lowered.as_str()) {
                    MASK
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Chirp aggregate.
#[derive(Debug, Clone)]
pub struct Chirp {
    pub id: ChirpId,
    pub body: ChirpBody,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Command to post a chirp on behalf of an authenticated user.
#[derive(Debug)]
pub struct CreateChirpCommand {
    pub body: ChirpBody,
    pub author: UserId,
}

/// Ordering of chirp listings by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse the `sort` query parameter; anything but `desc` is ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortOrder::Descending,
            _ => SortOrder::Ascending,
        }
    }
}

/// Filter and ordering for chirp listings.
#[derive(Debug, Clone, Default)]
pub struct ListChirpsQuery {
    pub author: Option<UserId>,
    pub sort: SortOrder,
}
