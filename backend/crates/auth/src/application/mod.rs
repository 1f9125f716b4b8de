//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod check_session;
pub mod config;
pub mod login;
pub mod login_oauth;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod reset_password;
pub mod tokens;
pub mod verify_email;

// Re-exports
pub use authenticate::{AuthTokens, Authenticator};
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use login_oauth::{LoginOauthUseCase, OauthCallbackInput, OauthDecision};
pub use logout::{LogoutOutput, LogoutUseCase};
pub use profile::{
    ChangePasswordInput, ChangePasswordUseCase, EditProfileUseCase, GetProfileUseCase,
    ProfileOutput,
};
pub use refresh::{RefreshOutput, RefreshUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use reset_password::{
    ConfirmPasswordResetUseCase, RequestPasswordResetOutput, RequestPasswordResetUseCase,
};
pub use tokens::{AccessClaims, RefreshClaims, TokenCodec, TokenKind};
pub use verify_email::{
    ConfirmEmailVerificationUseCase, RequestEmailVerificationOutput,
    RequestEmailVerificationUseCase,
};
