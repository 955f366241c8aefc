use halalan_auth::domain::types::{AuthProvider, SESSION_TOKEN_LEN};
use halalan_auth::error::AuthServiceError;
use halalan_auth::usecase::oauth::{GoogleCallbackInput, GoogleCallbackUseCase};
use halalan_auth::usecase::session::{
    AdminLoginUseCase, LoginInput, LoginUseCase, LogoutUseCase, issue_session,
};
use halalan_auth::usecase::user::DeleteAccountUseCase;

use crate::helpers::{MockSessionRepo, MockUserRepo, credentials_user, google_user};

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn should_login_with_valid_credentials() {
    let users = MockUserRepo::new(vec![credentials_user("a@x.com", "pass1234")]);
    let sessions = MockSessionRepo::empty();

    let out = LoginUseCase {
        users: users.clone(),
        sessions: sessions.clone(),
    }
    .execute(login_input("a@x.com", "pass1234"))
    .await
    .unwrap();

    assert_eq!(out.token.len(), SESSION_TOKEN_LEN);
    assert!(out.user.last_login_at.is_some(), "login stamps last_login_at");

    let sessions = sessions.sessions_handle();
    let sessions = sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].user_id, out.user.id);
    assert!(sessions[0].expires_at > chrono::Utc::now());
}

#[tokio::test]
async fn should_reject_unknown_email() {
    let result = LoginUseCase {
        users: MockUserRepo::empty(),
        sessions: MockSessionRepo::empty(),
    }
    .execute(login_input("nobody@x.com", "pass1234"))
    .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let users = MockUserRepo::new(vec![credentials_user("a@x.com", "pass1234")]);
    let result = LoginUseCase {
        users,
        sessions: MockSessionRepo::empty(),
    }
    .execute(login_input("a@x.com", "hunter22222"))
    .await;
    assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
}

#[tokio::test]
async fn should_point_oauth_accounts_at_google() {
    let users = MockUserRepo::new(vec![google_user("g@x.com")]);
    let result = LoginUseCase {
        users,
        sessions: MockSessionRepo::empty(),
    }
    .execute(login_input("g@x.com", "pass1234"))
    .await;
    assert!(matches!(result, Err(AuthServiceError::PasswordNotSet)));
}

#[tokio::test]
async fn should_require_admin_flag_for_admin_login() {
    let users = MockUserRepo::new(vec![credentials_user("a@x.com", "pass1234")]);
    let result = AdminLoginUseCase {
        users,
        sessions: MockSessionRepo::empty(),
    }
    .execute(login_input("a@x.com", "pass1234"))
    .await;
    assert!(matches!(result, Err(AuthServiceError::AdminRequired)));
}

#[tokio::test]
async fn should_login_admin_with_valid_credentials() {
    let mut admin = credentials_user("admin@x.com", "pass1234");
    admin.is_admin = true;
    let sessions = MockSessionRepo::empty();

    let out = AdminLoginUseCase {
        users: MockUserRepo::new(vec![admin]),
        sessions: sessions.clone(),
    }
    .execute(login_input("admin@x.com", "pass1234"))
    .await
    .unwrap();

    assert!(out.user.is_admin);
    assert_eq!(sessions.sessions_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_admin_without_password_hash() {
    let mut admin = google_user("admin@x.com");
    admin.is_admin = true;
    let result = AdminLoginUseCase {
        users: MockUserRepo::new(vec![admin]),
        sessions: MockSessionRepo::empty(),
    }
    .execute(login_input("admin@x.com", "pass1234"))
    .await;
    assert!(matches!(
        result,
        Err(AuthServiceError::AdminPasswordNotSet)
    ));
}

#[tokio::test]
async fn should_revoke_session_on_logout() {
    let user = credentials_user("a@x.com", "pass1234");
    let sessions = MockSessionRepo::empty();
    let session = issue_session(&sessions, user.id).await.unwrap();

    LogoutUseCase {
        sessions: sessions.clone(),
    }
    .execute(Some(&session.token))
    .await
    .unwrap();

    assert!(sessions.sessions_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_tolerate_logout_without_a_token() {
    // Header-authenticated requests present no cookie token.
    let result = LogoutUseCase {
        sessions: MockSessionRepo::empty(),
    }
    .execute(None)
    .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn should_create_google_user_on_first_callback() {
    let users = MockUserRepo::empty();
    let sessions = MockSessionRepo::empty();

    let out = GoogleCallbackUseCase {
        users: users.clone(),
        sessions,
    }
    .execute(GoogleCallbackInput {
        email: "g@x.com".to_owned(),
        name: "Maria".to_owned(),
        google_id: "google-sub-9".to_owned(),
        image: Some("https://lh3.example/avatar.png".to_owned()),
    })
    .await
    .unwrap();

    assert_eq!(out.user.provider, AuthProvider::Google);
    assert!(out.user.password_hash.is_none());
    assert!(out.user.email_verified_at.is_some());
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reuse_existing_account_on_repeat_callback() {
    let users = MockUserRepo::new(vec![google_user("g@x.com")]);
    let sessions = MockSessionRepo::empty();

    let out = GoogleCallbackUseCase {
        users: users.clone(),
        sessions,
    }
    .execute(GoogleCallbackInput {
        email: "g@x.com".to_owned(),
        name: "Maria".to_owned(),
        google_id: "google-sub-1".to_owned(),
        image: Some("https://lh3.example/new.png".to_owned()),
    })
    .await
    .unwrap();

    assert!(out.user.last_login_at.is_some());
    assert_eq!(
        out.user.image.as_deref(),
        Some("https://lh3.example/new.png")
    );
    // Upsert, not insert: still one account.
    assert_eq!(users.users_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_delete_account() {
    let user = credentials_user("a@x.com", "pass1234");
    let user_id = user.id;
    let users = MockUserRepo::new(vec![user]);

    DeleteAccountUseCase {
        users: users.clone(),
    }
    .execute(user_id)
    .await
    .unwrap();

    assert!(users.users_handle().lock().unwrap().is_empty());
}
