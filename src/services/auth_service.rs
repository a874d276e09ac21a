use crate::{
    database::MongoDB,
    models::{AccountStatus, User, UserRole},
};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String, // "user" | "hotel" | "superadmin"
    pub is_active: bool,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterPartnerRequest {
    pub email: String,
    pub password: String,
    pub hotel_name: String,
    pub area: String,
    pub location: String,
    pub category: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub hotel_name: Option<String>,
    pub area: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub upi_id: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub refresh_token: Option<String>,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GoogleAuthUrlResponse {
    pub success: bool,
    pub auth_url: String,
    pub state: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.user_id.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            full_name: user.full_name.clone(),
            hotel_name: user.hotel_name.clone(),
            verified: user.verified,
        }
    }
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cravings-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cravings-api".to_string())
}

// Generate JWT token
pub fn generate_jwt(user: &User) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        is_active: user.account_status == AccountStatus::Active,
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Generate refresh token (longer expiry)
pub fn generate_refresh_token(user_id: &str) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::days(30)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user_id.to_string(),
        email: String::new(),
        role: String::new(),
        is_active: true,
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate refresh token: {}", e))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

fn blank_user(user_id: String, email: String, role: UserRole) -> User {
    let now = Utc::now().to_rfc3339();
    User {
        _id: None,
        user_id,
        email,
        password: None,
        role,
        account_status: AccountStatus::Active,
        deletion_requested_at: None,
        full_name: None,
        phone: None,
        google_id: None,
        provider: None,
        hotel_name: None,
        area: None,
        location: None,
        category: None,
        upi_id: None,
        verified: None,
        enquiry: None,
        offers_claimable: Some(100),
        offers_claimable_updated_at: Some(now.clone()),
        followers: vec![],
        following: vec![],
        payments: vec![],
        created_at: Some(now.clone()),
        updated_at: Some(now.clone()),
        last_login: Some(now),
    }
}

async fn email_taken(db: &MongoDB, email: &str) -> Result<bool, String> {
    let collection = db.collection::<User>("users");
    let existing = collection
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| format!("Database error: {}", e))?;
    Ok(existing.is_some())
}

// Consumer registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    if email_taken(db, &request.email).await? {
        return Err("A user with this email already exists".to_string());
    }

    let hashed_password =
        hash(&request.password, DEFAULT_COST).map_err(|e| format!("Failed to hash password: {}", e))?;

    let new_user_id = ObjectId::new().to_hex();
    let mut new_user = blank_user(new_user_id.clone(), request.email.clone(), UserRole::User);
    new_user.password = Some(hashed_password);
    new_user.full_name = Some(request.full_name.clone());
    new_user.phone = Some(request.phone.clone());
    new_user.provider = Some("local".to_string());

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| format!("Failed to create user: {}", e))?;

    let token = generate_jwt(&new_user)?;
    let refresh_token = generate_refresh_token(&new_user_id)?;

    log::info!("✅ User registered: {}", request.email);

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(&new_user),
    })
}

// Hotel partner registration. Partners start unverified and stay hidden from
// the super-admin verified listing until approved.
pub async fn register_partner(
    db: &MongoDB,
    request: &RegisterPartnerRequest,
) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    if email_taken(db, &request.email).await? {
        return Err("A user with this email already exists".to_string());
    }

    let hashed_password =
        hash(&request.password, DEFAULT_COST).map_err(|e| format!("Failed to hash password: {}", e))?;

    let new_user_id = ObjectId::new().to_hex();
    let mut new_user = blank_user(new_user_id.clone(), request.email.clone(), UserRole::Hotel);
    new_user.password = Some(hashed_password);
    new_user.hotel_name = Some(request.hotel_name.clone());
    new_user.area = Some(request.area.clone());
    new_user.location = Some(request.location.clone());
    new_user.category = Some(request.category.clone());
    new_user.phone = Some(request.phone.clone());
    new_user.verified = Some(false);
    new_user.enquiry = Some(0);
    new_user.provider = Some("local".to_string());

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| format!("Failed to create partner: {}", e))?;

    let token = generate_jwt(&new_user)?;
    let refresh_token = generate_refresh_token(&new_user_id)?;

    log::info!(
        "✅ Partner registered: {} ({})",
        request.hotel_name,
        request.email
    );

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(&new_user),
    })
}

// User login. Signing in to an inActive account reactivates it and clears
// the pending deletion request.
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    let mut user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "Invalid credentials".to_string())?;

    let stored_password = user
        .password
        .as_ref()
        .ok_or_else(|| "This account uses Google login. Please sign in with Google.".to_string())?;

    let valid = verify(&request.password, stored_password)
        .map_err(|e| format!("Password verification error: {}", e))?;

    if !valid {
        return Err("Invalid credentials".to_string());
    }

    let now = Utc::now().to_rfc3339();
    if user.account_status != AccountStatus::Active {
        collection
            .update_one(
                doc! { "user_id": &user.user_id },
                doc! { "$set": {
                    "account_status": "active",
                    "last_login": &now,
                    "updated_at": &now,
                }, "$unset": { "deletion_requested_at": "" } },
            )
            .await
            .map_err(|e| format!("Failed to reactivate account: {}", e))?;
        user.account_status = AccountStatus::Active;
        user.deletion_requested_at = None;
        log::info!("♻️  Reactivated account on sign-in: {}", user.user_id);
    } else {
        collection
            .update_one(
                doc! { "user_id": &user.user_id },
                doc! { "$set": { "last_login": &now } },
            )
            .await
            .map_err(|e| format!("Failed to update last login: {}", e))?;
    }

    let token = generate_jwt(&user)?;
    let refresh_token = generate_refresh_token(&user.user_id)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(&user),
    })
}

// Refresh token
pub async fn refresh_token(
    db: &MongoDB,
    request: &RefreshTokenRequest,
) -> Result<AuthResponse, String> {
    let claims = verify_token(&request.refresh_token)?;

    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": &claims.sub })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User not found".to_string())?;

    if user.account_status != AccountStatus::Active {
        return Err("Account is inactive".to_string());
    }

    let token = generate_jwt(&user)?;
    let new_refresh_token = generate_refresh_token(&user.user_id)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(new_refresh_token),
        user: UserInfo::from(&user),
    })
}

// Get current user
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, String> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User not found".to_string())?;

    Ok(UserInfo::from(&user))
}

// Partial profile update
pub async fn update_profile(
    db: &MongoDB,
    user_id: &str,
    request: &UpdateProfileRequest,
) -> Result<UserInfo, String> {
    let collection = db.collection::<User>("users");

    let mut update_set = doc! { "updated_at": Utc::now().to_rfc3339() };
    if let Some(ref full_name) = request.full_name {
        update_set.insert("full_name", full_name);
    }
    if let Some(ref phone) = request.phone {
        update_set.insert("phone", phone);
    }
    if let Some(ref hotel_name) = request.hotel_name {
        update_set.insert("hotel_name", hotel_name);
    }
    if let Some(ref area) = request.area {
        update_set.insert("area", area);
    }
    if let Some(ref location) = request.location {
        update_set.insert("location", location);
    }
    if let Some(ref category) = request.category {
        update_set.insert("category", category);
    }
    if let Some(ref upi_id) = request.upi_id {
        update_set.insert("upi_id", upi_id);
    }

    let result = collection
        .update_one(doc! { "user_id": user_id }, doc! { "$set": update_set })
        .await
        .map_err(|e| format!("Failed to update profile: {}", e))?;

    if result.matched_count == 0 {
        return Err("User not found".to_string());
    }

    get_current_user(db, user_id).await
}

/// Soft delete: the account is only flagged inactive, never removed. The
/// next successful sign-in undoes it.
pub async fn request_deletion(db: &MongoDB, user_id: &str) -> Result<(), String> {
    let collection = db.collection::<User>("users");
    let now = Utc::now().to_rfc3339();

    let result = collection
        .update_one(
            doc! { "user_id": user_id },
            doc! { "$set": {
                "account_status": "inActive",
                "deletion_requested_at": &now,
                "updated_at": &now,
            }},
        )
        .await
        .map_err(|e| format!("Failed to deactivate account: {}", e))?;

    if result.matched_count == 0 {
        return Err(format!("User {} not found", user_id));
    }

    log::info!("🗑️ Account flagged for deletion: {}", user_id);
    Ok(())
}

// Generate Google OAuth URL
pub fn generate_google_oauth_url() -> Result<GoogleAuthUrlResponse, String> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| "GOOGLE_CLIENT_ID not configured".to_string())?;

    let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI")
        .unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string());

    // Generate state for CSRF protection
    let state = Uuid::new_v4().to_string();

    let params = vec![
        ("client_id", client_id.as_str()),
        ("redirect_uri", redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("state", state.as_str()),
        ("access_type", "offline"),
        ("prompt", "select_account"),
    ];

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let auth_url = format!("https://accounts.google.com/o/oauth2/v2/auth?{}", query_string);

    Ok(GoogleAuthUrlResponse {
        success: true,
        auth_url,
        state,
    })
}

// Handle Google OAuth callback: exchange the code, then find-or-create the
// account by google_id first, email second (first federated sign-in creates
// a consumer account, mirroring the sign-up-with-Google flow).
pub async fn handle_google_callback(db: &MongoDB, code: &str) -> Result<AuthResponse, String> {
    let client_id = std::env::var("GOOGLE_CLIENT_ID")
        .map_err(|_| "GOOGLE_CLIENT_ID not configured".to_string())?;
    let client_secret = std::env::var("GOOGLE_CLIENT_SECRET")
        .map_err(|_| "GOOGLE_CLIENT_SECRET not configured".to_string())?;
    let redirect_uri = std::env::var("GOOGLE_REDIRECT_URI")
        .unwrap_or_else(|_| "http://localhost:3000/auth/callback".to_string());

    // Exchange code for tokens
    let client = reqwest::Client::new();
    let token_response = client
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("code", code),
            ("client_id", &client_id),
            ("client_secret", &client_secret),
            ("redirect_uri", &redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| format!("Failed to exchange code: {}", e))?;

    if !token_response.status().is_success() {
        return Err("Failed to exchange authorization code".to_string());
    }

    let tokens: serde_json::Value = token_response
        .json()
        .await
        .map_err(|e| format!("Failed to parse token response: {}", e))?;

    let access_token = tokens["access_token"]
        .as_str()
        .ok_or_else(|| "No access token in response".to_string())?;

    // Get user info
    let user_info_response = client
        .get("https://www.googleapis.com/oauth2/v2/userinfo")
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Failed to get user info: {}", e))?;

    let user_info: serde_json::Value = user_info_response
        .json()
        .await
        .map_err(|e| format!("Failed to parse user info: {}", e))?;

    let email = user_info["email"]
        .as_str()
        .ok_or_else(|| "No email in user info".to_string())?;
    let name = user_info["name"].as_str().map(String::from);
    let google_id = user_info["id"]
        .as_str()
        .ok_or_else(|| "No google_id in user info".to_string())?;

    let collection = db.collection::<User>("users");
    let now = Utc::now().to_rfc3339();

    // First try by google_id
    let user = if let Some(existing_user) = collection
        .find_one(doc! { "google_id": google_id })
        .await
        .map_err(|e| format!("Database error: {}", e))?
    {
        log::info!("✅ Found existing user by google_id: {}", existing_user.user_id);

        collection
            .update_one(
                doc! { "user_id": &existing_user.user_id },
                doc! { "$set": {
                    "last_login": &now,
                    "updated_at": &now,
                }},
            )
            .await
            .map_err(|e| format!("Failed to update user: {}", e))?;

        existing_user
    } else if let Some(mut existing_user) = collection
        .find_one(doc! { "email": email })
        .await
        .map_err(|e| format!("Database error: {}", e))?
    {
        // Existing password account linking Google for the first time
        log::info!(
            "✅ Found existing user by email, adding google_id: {}",
            existing_user.user_id
        );

        collection
            .update_one(
                doc! { "user_id": &existing_user.user_id },
                doc! { "$set": {
                    "google_id": google_id,
                    "provider": "google",
                    "last_login": &now,
                    "updated_at": &now,
                }},
            )
            .await
            .map_err(|e| format!("Failed to update user with google_id: {}", e))?;

        existing_user.google_id = Some(google_id.to_string());
        existing_user.provider = Some("google".to_string());
        existing_user
    } else {
        // First federated sign-in: create a consumer account
        let new_user_id = ObjectId::new().to_hex();
        log::info!("✅ Creating new user with user_id: {}", new_user_id);

        let mut new_user = blank_user(new_user_id, email.to_string(), UserRole::User);
        new_user.full_name = name;
        new_user.google_id = Some(google_id.to_string());
        new_user.provider = Some("google".to_string());

        collection
            .insert_one(&new_user)
            .await
            .map_err(|e| format!("Failed to create user: {}", e))?;

        new_user
    };

    let token = generate_jwt(&user)?;
    let refresh_token = generate_refresh_token(&user.user_id)?;

    Ok(AuthResponse {
        success: true,
        token,
        refresh_token: Some(refresh_token),
        user: UserInfo::from(&user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        blank_user("u-test".into(), "test@cravings.in".into(), UserRole::User)
    }

    #[test]
    fn jwt_roundtrip_keeps_identity() {
        let user = test_user();
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "u-test");
        assert_eq!(claims.email, "test@cravings.in");
        assert_eq!(claims.role, "user");
        assert!(claims.is_active);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = test_user();
        let mut token = generate_jwt(&user).unwrap();
        token.push('x');
        assert!(verify_token(&token).is_err());
    }
}
