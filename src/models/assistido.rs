use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{validar_cpf, validar_valor_positivo};
use crate::models::voluntario::StatusPessoa;

/// Assistido: pessoa que recebe auxílio mensal e é cobrada via contribuições.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assistido {
    pub id: Uuid,
    pub nome_completo: String,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub email: String,
    pub endereco: Option<String>,
    pub data_ingresso: NaiveDate,
    pub valor_mensal: Decimal,
    pub dia_vencimento: i16,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub status: StatusPessoa,
    pub sede_id: Uuid,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistidoComSede {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub assistido: Assistido,
    pub sede_nome: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarAssistido {
    #[validate(length(min = 3, max = 100, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub nome_completo: String,
    #[validate(custom(function = validar_cpf, message = "CPF deve ter 11 dígitos"))]
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    pub endereco: Option<String>,
    pub data_ingresso: NaiveDate,
    #[validate(custom(function = validar_valor_positivo, message = "Valor mensal deve ser positivo"))]
    pub valor_mensal: Decimal,
    #[validate(range(min = 1, max = 31, message = "Dia deve ser entre 1 e 31"))]
    pub dia_vencimento: i16,
    pub observacoes: Option<String>,
    pub sede_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarAssistido {
    #[validate(length(min = 3, max = 100, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub nome_completo: Option<String>,
    #[validate(custom(function = validar_cpf, message = "CPF deve ter 11 dígitos"))]
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub data_ingresso: Option<NaiveDate>,
    #[validate(custom(function = validar_valor_positivo, message = "Valor mensal deve ser positivo"))]
    pub valor_mensal: Option<Decimal>,
    #[validate(range(min = 1, max = 31, message = "Dia deve ser entre 1 e 31"))]
    pub dia_vencimento: Option<i16>,
    pub observacoes: Option<String>,
    pub sede_id: Option<Uuid>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroAssistido {
    pub status: Option<StatusPessoa>,
    pub search: Option<String>,
    pub sede_id: Option<Uuid>,
    pub valor_min: Option<Decimal>,
    pub valor_max: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasAssistidos {
    pub total: i64,
    pub ativos: i64,
    pub inativos: i64,
    pub suspensos: i64,
    pub valor_mensal_total: Decimal,
}
