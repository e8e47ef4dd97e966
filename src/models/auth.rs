use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::voluntario::Cargo;

/// Claims do token JWT emitido no login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub cargo: Cargo,
    pub sede_id: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlterarSenhaPayload {
    #[validate(length(min = 1, message = "Senha atual é obrigatória"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "A nova senha deve ter pelo menos 6 caracteres"))]
    pub new_password: String,
}

/// Dados do usuário devolvidos no login e em `/auth/me`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsuarioLogado {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub sede_id: Uuid,
    pub cargo: Cargo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RespostaLogin {
    pub user: UsuarioLogado,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RespostaToken {
    pub token: String,
}
