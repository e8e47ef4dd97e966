use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_configuracao", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoConfiguracao {
    String,
    Number,
    Boolean,
    Json,
}

/// Configuração do sistema em chave-valor tipado. Usada, por exemplo, para
/// os dados da organização impressos na nota fiscal e a chave PIX das
/// cobranças.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuracao {
    pub id: Uuid,
    pub chave: String,
    pub valor: String,
    pub descricao: Option<String>,
    pub tipo: TipoConfiguracao,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefinirConfiguracao {
    #[validate(length(min = 1, message = "Chave é obrigatória"))]
    pub chave: String,
    #[validate(length(min = 1, message = "Valor é obrigatório"))]
    pub valor: String,
    pub descricao: Option<String>,
    pub tipo: Option<TipoConfiguracao>,
}
