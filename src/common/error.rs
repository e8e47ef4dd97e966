use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro unificado, com `thiserror` para melhor ergonomia.
// Cada variante corresponde a um status HTTP; os erros de infraestrutura
// (banco, bcrypt, jwt) viram 500 com detalhe apenas no log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    Validacao(#[from] validator::ValidationErrors),

    // Regras de negócio violadas (corpo bem formado, conteúdo inválido)
    #[error("{0}")]
    Invalido(String),

    #[error("{0}")]
    NaoEncontrado(String),

    #[error("{0}")]
    Conflito(String),

    #[error("E-mail ou senha inválidos")]
    CredenciaisInvalidas,

    #[error("Token de autenticação inválido ou ausente")]
    TokenInvalido,

    #[error("{0}")]
    AcessoNegado(String),

    #[error("Fonte não encontrada: {0}")]
    FonteNaoEncontrada(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    BancoDeDados(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    Interno(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensagem) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::Validacao(erros) => {
                let mut detalhes = std::collections::HashMap::new();
                for (campo, erros_campo) in erros.field_errors() {
                    let mensagens: Vec<String> = erros_campo
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    detalhes.insert(campo.to_string(), mensagens);
                }
                let corpo = Json(json!({
                    "success": false,
                    "message": "Um ou mais campos são inválidos.",
                    "details": detalhes,
                }));
                return (StatusCode::BAD_REQUEST, corpo).into_response();
            }
            AppError::Invalido(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NaoEncontrado(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflito(msg) => (StatusCode::CONFLICT, msg),
            AppError::CredenciaisInvalidas => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos".to_string())
            }
            AppError::TokenInvalido => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente".to_string(),
            ),
            AppError::AcessoNegado(msg) => (StatusCode::FORBIDDEN, msg),

            // Todos os outros erros (banco, bcrypt, jwt, interno) viram 500.
            // O cliente recebe uma mensagem genérica; o detalhe fica no log.
            ref e => {
                tracing::error!("Erro interno do servidor: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let corpo = Json(json!({ "success": false, "message": mensagem }));
        (status, corpo).into_response()
    }
}
