use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    common::resposta::RespostaApi,
    config::AppState,
    middleware::auth::UsuarioAutenticado,
    models::auth::{AlterarSenhaPayload, LoginPayload, RespostaLogin, RespostaToken},
};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Login bem sucedido", body = RespostaLogin),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(estado): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, token) = estado
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(RespostaApi::dados(RespostaLogin { user, token })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Logout realizado")),
    security(("api_jwt" = []))
)]
pub async fn logout() -> Result<impl IntoResponse, AppError> {
    // O token é descartado no cliente; nada a invalidar no servidor.
    Ok(Json(RespostaApi::mensagem("Logout realizado com sucesso")))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses((status = 200, description = "Dados do usuário autenticado")),
    security(("api_jwt" = []))
)]
pub async fn me(
    State(estado): State<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<impl IntoResponse, AppError> {
    let dados = estado.auth_service.me(usuario.0.id).await?;
    Ok(Json(RespostaApi::dados(dados)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Auth",
    responses((status = 200, description = "Novo token emitido", body = RespostaToken)),
    security(("api_jwt" = []))
)]
pub async fn refresh(
    State(estado): State<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<impl IntoResponse, AppError> {
    let token = estado.auth_service.refresh(usuario.0.id).await?;
    Ok(Json(RespostaApi::dados(RespostaToken { token })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Auth",
    request_body = AlterarSenhaPayload,
    responses((status = 200, description = "Senha alterada")),
    security(("api_jwt" = []))
)]
pub async fn alterar_senha(
    State(estado): State<AppState>,
    usuario: UsuarioAutenticado,
    Json(payload): Json<AlterarSenhaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    estado
        .auth_service
        .alterar_senha(usuario.0.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(RespostaApi::mensagem("Senha alterada com sucesso")))
}
