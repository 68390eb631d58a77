#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::test;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use stockroom::auth::SessionResponse;
use stockroom::repository::Storage;
use stockroom::response::ApiResponse;

#[actix_rt::test]
async fn test_signup_signin_session_flow() {
    let app = test_app!(Storage::memory());

    let signup_payload = json!({
        "name": "  Ana Lopez ",
        "email": "  Ana@Example.com ",
        "password": "secret1"
    });
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(&signup_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Compte créé avec succès");
    assert_eq!(body["data"]["name"], "Ana Lopez");
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("passwordHash").is_none());

    // Same email again, different case
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "name": "Ana", "email": "ANA@example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "success": false, "error": "Un compte avec cet email existe déjà" })
    );

    // Wrong password, unknown email
    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "ana@example.com", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Mot de passe incorrect");

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "nobody@example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Aucun utilisateur trouvé avec cet email");

    // Successful sign-in sets the session cookie and returns the token
    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .set_json(json!({ "email": "ANA@example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session-token")
        .map(|c| c.into_owned())
        .expect("sign-in must set the session cookie");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    let body: ApiResponse<SessionResponse> = test::read_body_json(resp).await;
    let session = body.data.expect("sign-in must return the session");
    assert!(body.success);
    assert_eq!(session.role, "user");
    assert_eq!(cookie.value(), session.token);

    // The token works as a bearer header and as a cookie
    let req = test::TestRequest::get()
        .uri("/api/auth/session")
        .insert_header(common::bearer(&session.token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["sub"], session.user_id);
    assert_eq!(body["data"]["role"], "user");

    let req = test::TestRequest::post()
        .uri("/api/products")
        .cookie(Cookie::new("session-token", session.token.clone()))
        .set_json(json!({ "name": "Mug", "price": 8.5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Sign-out expires the cookie
    let req = test::TestRequest::post()
        .uri("/api/auth/signout")
        .cookie(Cookie::new("session-token", session.token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == "session-token")
        .map(|c| c.into_owned())
        .expect("sign-out must reset the session cookie");
    assert_eq!(removal.value(), "");
    assert_eq!(
        removal.max_age(),
        Some(actix_web::cookie::time::Duration::ZERO)
    );
}

#[actix_rt::test]
async fn test_session_without_token_is_null() {
    let app = test_app!(Storage::memory());

    let req = test::TestRequest::get().uri("/api/auth/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({ "success": true, "data": null, "message": "Aucune session" })
    );
}

#[actix_rt::test]
async fn test_invalid_signup_inputs() {
    let app = test_app!(Storage::memory());

    let test_cases = vec![
        (
            json!({ "email": "test@example.com", "password": "secret1" }),
            "Tous les champs sont requis",
        ),
        (
            json!({ "name": "   ", "email": "test@example.com", "password": "secret1" }),
            "Tous les champs sont requis",
        ),
        (
            json!({ "name": "Test", "email": "test@example.com", "password": "12345" }),
            "Le mot de passe doit contenir au moins 6 caractères",
        ),
        (
            json!({ "name": "Test", "email": "invalid-email", "password": "secret1" }),
            "Adresse email invalide",
        ),
        (
            json!({ "name": "Test", "email": "a@b", "password": "secret1" }),
            "Adresse email invalide",
        ),
    ];

    for (payload, expected) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": false, "error": expected }));
    }
}

#[actix_rt::test]
async fn test_signin_requires_both_fields() {
    let app = test_app!(Storage::memory());

    for payload in [
        json!({ "email": "ana@example.com" }),
        json!({ "password": "secret1" }),
        json!({ "email": "", "password": "" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/signin")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Email et mot de passe requis");
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/signin")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ broken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Corps de requête JSON invalide");
}

#[actix_rt::test]
async fn test_protected_pages_redirect_to_sign_in() {
    let app = test_app!(Storage::memory());

    for path in ["/products/new", "/products/17/edit", "/tasks/new", "/tasks/4/edit"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "path: {}", path);

        let location = resp
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .expect("redirect must carry a location")
            .to_string();
        let (target, query) = location.split_once('?').expect("location must carry a query");
        assert_eq!(target, "/auth/signin");
        let callback = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "callbackUrl")
            .map(|(_, value)| value.into_owned());
        assert_eq!(callback.as_deref(), Some(path));
    }

    // With a session the gate lets the request through; no page is served here.
    let req = test::TestRequest::get()
        .uri("/products/new")
        .insert_header(common::bearer(&common::token(Some("user"))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_admin_routes_require_admin_role() {
    let app = test_app!(Storage::memory());

    let anonymous = test::TestRequest::get().uri("/admin/stats").to_request();
    let user = test::TestRequest::get()
        .uri("/admin/stats")
        .insert_header(common::bearer(&common::token(Some("user"))))
        .to_request();
    let no_role = test::TestRequest::get()
        .uri("/admin/stats")
        .insert_header(common::bearer(&common::token(None)))
        .to_request();

    for req in [anonymous, user, no_role] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": false, "error": "Accès admin requis" }));
    }

    let req = test::TestRequest::get()
        .uri("/admin/stats")
        .insert_header(common::bearer(&common::token(Some("admin"))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"],
        json!({ "products": 0, "tasks": 0, "users": 0 })
    );

    // `/administrator` is not under the admin prefix.
    let req = test::TestRequest::get().uri("/administrator").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_health_is_public() {
    let app = test_app!(Storage::memory());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "stockroom");
}

#[actix_rt::test]
async fn test_percent_encoded_paths_are_gated() {
    let app = test_app!(Storage::memory());

    // `%6e` is `n`: the router serves `/products/new`, so the gate must redirect.
    let req = test::TestRequest::get().uri("/products/%6eew").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);

    let req = test::TestRequest::get()
        .uri("/%61dmin/stats")
        .insert_header(common::bearer(&common::token(Some("user"))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
