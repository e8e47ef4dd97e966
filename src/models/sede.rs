use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Sede (filial) da organização. Agrupa voluntários e assistidos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sede {
    pub id: Uuid,
    pub nome: String,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub cep: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Sede com a contagem de pessoas vinculadas (para listagens e dashboard).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SedeComContadores {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub sede: Sede,
    pub total_voluntarios: i64,
    pub total_assistidos: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarSede {
    #[validate(length(min = 1, max = 100, message = "Nome é obrigatório"))]
    pub nome: String,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub cep: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarSede {
    #[validate(length(min = 1, max = 100, message = "Nome é obrigatório"))]
    pub nome: Option<String>,
    pub endereco: Option<String>,
    pub cidade: Option<String>,
    pub cep: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroSede {
    pub search: Option<String>,
    pub nome: Option<String>,
    pub ativo: Option<bool>,
}

/// Item enxuto para seleção de sede ativa em formulários.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SedeResumida {
    pub id: Uuid,
    pub nome: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasSedes {
    pub total: i64,
    pub ativas: i64,
    pub inativas: i64,
}
