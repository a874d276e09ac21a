use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Hotel,
    Superadmin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::User => write!(f, "user"),
            UserRole::Hotel => write!(f, "hotel"),
            UserRole::Superadmin => write!(f, "superadmin"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    #[serde(rename = "active")]
    Active,
    // Stored as "inActive" - legacy value, do not normalize
    #[serde(rename = "inActive")]
    Inactive,
}

/// Visit counters kept on a hotel's follower entry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VisitRecord {
    pub number_of_visits: u32,
    /// RFC 3339 timestamp of the last counted scan
    pub last_visit: String,
}

/// One entry in a hotel's `followers` array.
///
/// Uniqueness of `user` across the array is a documented invariant, not one
/// the database enforces: follow is read-then-append without a transaction.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Follower {
    pub user: String,
    #[serde(default)]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visits: Option<VisitRecord>,
}

/// One entry in a user's `following` array.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FollowedHotel {
    pub user: String,
    #[serde(default)]
    pub phone: String,
}

/// A payment flow initiated from the visit screen. The service only records
/// that the deep link was handed out - settlement is never confirmed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaymentRecord {
    pub user: String,
    pub amount: f64,
    pub discount_percent: u32,
    pub final_amount: f64,
    pub paid_at: String,
}

/// Account document. One collection holds consumers, hotel partners and the
/// super admin; the `role` field decides which optional fields are populated.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String, // PRIMARY IDENTIFIER
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>, // None for OAuth accounts
    pub role: UserRole,
    #[serde(default = "default_account_status")]
    pub account_status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_requested_at: Option<String>,

    // Consumer profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    // OAuth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>, // "local" or "google"

    // Hotel partner profile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enquiry: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers_claimable: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offers_claimable_updated_at: Option<String>,

    #[serde(default)]
    pub followers: Vec<Follower>,
    #[serde(default)]
    pub following: Vec<FollowedHotel>,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

fn default_account_status() -> AccountStatus {
    AccountStatus::Active
}

impl User {
    pub fn is_hotel(&self) -> bool {
        self.role == UserRole::Hotel
    }

    pub fn is_superadmin(&self) -> bool {
        self.role == UserRole::Superadmin
    }
}
