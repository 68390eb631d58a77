use crate::{
    auth::{
        generate_token, hash_password, normalize_email, verify_password, Claims, CurrentUser,
        SessionResponse, SignInRequest, SignUpRequest,
    },
    config::AuthSettings,
    error::AppError,
    models::{NewUser, DEFAULT_ROLE},
    repository::{StorageError, UserRepository},
    response::ApiResponse,
};
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get, post, web, HttpResponse, Responder,
};
use serde_json::Value;
use validator::Validate;

/// Register a new user
///
/// Creates a credentials account with the default role. Does not sign the user in.
#[post("/signup")]
pub async fn signup(
    users: web::Data<dyn UserRepository>,
    signup_data: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    signup_data
        .check()
        .map_err(|msg| AppError::BadRequest(msg.to_string()))?;

    let password_hash = hash_password(&signup_data.password)?;

    let user = users
        .create(NewUser {
            name: signup_data.name.trim().to_string(),
            email: signup_data.normalized_email(),
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        })
        .await
        .map_err(|e| match e {
            StorageError::Duplicate => {
                AppError::Conflict("Un compte avec cet email existe déjà".into())
            }
            other => AppError::from(other),
        })?;

    log::info!("account created for {}", user.email);
    Ok(HttpResponse::Created().json(ApiResponse::ok(user, "Compte créé avec succès")))
}

/// Sign in with email and password
///
/// Issues a session token, returned in the body and set as an HttpOnly cookie.
#[post("/signin")]
pub async fn signin(
    users: web::Data<dyn UserRepository>,
    settings: web::Data<AuthSettings>,
    signin_data: web::Json<SignInRequest>,
) -> Result<impl Responder, AppError> {
    if signin_data.validate().is_err() {
        return Err(AppError::BadRequest("Email et mot de passe requis".into()));
    }

    let user = users
        .find_by_email(&normalize_email(&signin_data.email))
        .await?
        .ok_or_else(|| {
            AppError::InvalidCredentials("Aucun utilisateur trouvé avec cet email".into())
        })?;

    if !verify_password(&signin_data.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials("Mot de passe incorrect".into()));
    }

    let claims = Claims::new(user.id.to_string(), Some(user.role.clone()), &settings);
    let token = generate_token(&claims, &settings)?;

    let cookie = Cookie::build(settings.cookie_name.clone(), token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(settings.session_max_age.num_seconds()))
        .finish();

    log::info!("user {} signed in", user.email);
    Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::ok(
        SessionResponse {
            token,
            user_id: claims.sub,
            role: user.role,
            expires: claims.exp,
        },
        "Connexion réussie",
    )))
}

/// Sign out
///
/// Expires the session cookie. A bearer token held by the client stays valid until it expires.
#[post("/signout")]
pub async fn signout(
    settings: web::Data<AuthSettings>,
    current: Option<CurrentUser>,
) -> impl Responder {
    if let Some(CurrentUser(claims)) = current {
        log::info!("user {} signed out", claims.sub);
    }

    let mut cookie = Cookie::build(settings.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();

    HttpResponse::Ok()
        .cookie(cookie)
        .json(ApiResponse::message("Déconnexion réussie"))
}

/// Current session
///
/// Returns the verified claims, or `data: null` when the caller has no valid session.
#[get("/session")]
pub async fn session(current: Option<CurrentUser>) -> impl Responder {
    let response = match current {
        Some(CurrentUser(claims)) => ApiResponse::ok(
            serde_json::to_value(claims).unwrap_or(Value::Null),
            "Session active",
        ),
        None => ApiResponse::ok(Value::Null, "Aucune session"),
    };
    HttpResponse::Ok().json(response)
}
