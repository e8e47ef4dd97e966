use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::validar_valor_positivo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_contribuicao", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusContribuicao {
    Pendente,
    Pago,
    Atrasado,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "forma_pagamento", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FormaPagamento {
    Pix,
    Boleto,
    Transferencia,
    Dinheiro,
    Cartao,
}

/// Contribuição mensal devida por um voluntário OU um assistido
/// (exatamente um dos dois — a CHECK do banco garante o invariante).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contribuicao {
    pub id: Uuid,
    pub voluntario_id: Option<Uuid>,
    pub assistido_id: Option<Uuid>,
    pub valor: Decimal,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<NaiveDate>,
    pub status: StatusContribuicao,
    pub forma_pagamento: Option<FormaPagamento>,
    pub comprovante: Option<String>,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Contribuição acrescida dos dados de contato da pessoa vinculada.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContribuicaoDetalhada {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub contribuicao: Contribuicao,
    pub pessoa_nome: String,
    pub pessoa_email: String,
    pub pessoa_telefone: Option<String>,
    /// "voluntario" ou "assistido"
    pub tipo_pessoa: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarContribuicao {
    pub voluntario_id: Option<Uuid>,
    pub assistido_id: Option<Uuid>,
    #[validate(custom(function = validar_valor_positivo, message = "Valor deve ser positivo"))]
    pub valor: Decimal,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<NaiveDate>,
    pub forma_pagamento: Option<FormaPagamento>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarContribuicao {
    #[validate(custom(function = validar_valor_positivo, message = "Valor deve ser positivo"))]
    pub valor: Option<Decimal>,
    pub data_vencimento: Option<NaiveDate>,
    pub data_pagamento: Option<NaiveDate>,
    pub status: Option<StatusContribuicao>,
    pub forma_pagamento: Option<FormaPagamento>,
    pub observacoes: Option<String>,
}

/// Dados do pagamento de uma contribuição.
///
/// `criar_movimentacao` controla o lançamento automático no caixa:
/// o padrão é `true` — só não lança quando o chamador manda `false`
/// explicitamente.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DadosPagamento {
    pub data_pagamento: NaiveDate,
    pub forma_pagamento: FormaPagamento,
    pub comprovante: Option<String>,
    pub observacoes: Option<String>,
    #[serde(default = "padrao_criar_movimentacao")]
    pub criar_movimentacao: bool,
}

fn padrao_criar_movimentacao() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GerarMensaisPayload {
    pub ano: i32,
    #[validate(range(min = 1, max = 12, message = "Mês deve estar entre 1 e 12"))]
    pub mes: u32,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroContribuicao {
    pub status: Option<StatusContribuicao>,
    pub voluntario_id: Option<Uuid>,
    pub assistido_id: Option<Uuid>,
    pub search: Option<String>,
    pub valor_min: Option<Decimal>,
    pub valor_max: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParamsMes {
    pub ano: i32,
    pub mes: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasContribuicoes {
    pub total: i64,
    pub pendentes: i64,
    pub pagas: i64,
    pub atrasadas: i64,
    pub canceladas: i64,
    pub valor_total_pago: Decimal,
    pub valor_total_pendente: Decimal,
    /// Percentual pagas/total com duas casas, ex.: "60.00"
    pub taxa_adimplencia: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoGeracaoMensal {
    pub total: usize,
    pub contribuicoes: Vec<Contribuicao>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContribuicaoAtrasadaResumo {
    pub id: Uuid,
    pub valor: Decimal,
    pub data_vencimento: NaiveDate,
    pub dias_atraso: i64,
}

/// Linha do relatório de inadimplência: uma pessoa com tudo que deve.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InadimplenciaPessoa {
    pub pessoa_id: Uuid,
    pub pessoa_nome: String,
    pub pessoa_email: String,
    pub tipo_pessoa: String,
    pub contribuicoes: Vec<ContribuicaoAtrasadaResumo>,
    pub valor_total: Decimal,
    pub dias_atraso: i64,
}
