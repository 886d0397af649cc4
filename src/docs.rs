use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use mukando_auth::Role;
use mukando_core::pagination::{PaginationMeta, PaginationParams};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutRequest, MessageResponse,
    RefreshRequest, RefreshResponse, RegisterRequestDto, ResetPasswordRequest,
};
use crate::modules::users::model::{
    AssignRoleDto, ChangePasswordDto, CreateUserDto, PaginatedUsersResponse, StatusParams,
    UpdateUserDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::current_user,
        crate::modules::auth::controller::forgot_password,
        crate::modules::auth::controller::reset_password,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::assign_role,
        crate::modules::users::controller::update_status,
        crate::modules::users::controller::change_password,
    ),
    components(
        schemas(
            User,
            Role,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            LogoutRequest,
            ForgotPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            ErrorResponse,
            CreateUserDto,
            UpdateUserDto,
            AssignRoleDto,
            StatusParams,
            ChangePasswordDto,
            PaginationMeta,
            PaginationParams,
            PaginatedUsersResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, token refresh, and password reset"),
        (name = "Users", description = "User management endpoints")
    ),
    info(
        title = "Mukando API",
        version = "0.1.0",
        description = "Backend for the Mukando rotating savings platform: JWT-based authentication and user management behind an API gateway.",
        contact(
            name = "API Support",
            email = "support@mukando.com"
        ),
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
