use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{common::error::AppError, config::AppState, models::voluntario::Voluntario};

/// Valida o bearer token e pendura o voluntário autenticado na requisição.
pub async fn auth_guard(
    State(estado): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::TokenInvalido)?;

    let voluntario = estado.auth_service.validar_token(bearer.token()).await?;
    request
        .extensions_mut()
        .insert(UsuarioAutenticado(voluntario));

    Ok(next.run(request).await)
}

/// Camada extra das rotas de super admin: exige cargo com acesso global.
pub async fn super_admin_guard(
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let usuario = request
        .extensions()
        .get::<UsuarioAutenticado>()
        .ok_or(AppError::TokenInvalido)?;

    if !usuario.0.cargo.acesso_global() {
        return Err(AppError::AcessoNegado(
            "Acesso restrito à administração geral".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Extrator para obter o usuário autenticado diretamente nos handlers.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado(pub Voluntario);

impl<S> FromRequestParts<S> for UsuarioAutenticado
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UsuarioAutenticado>()
            .cloned()
            .ok_or(AppError::TokenInvalido)
    }
}
