use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::validar_valor_positivo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_movimentacao", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimentacao {
    Entrada,
    Saida,
}

/// Lançamento do livro-caixa da organização.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movimentacao {
    pub id: Uuid,
    pub data: NaiveDate,
    pub descricao: String,
    pub valor: Decimal,
    pub tipo: TipoMovimentacao,
    pub categoria: String,
    pub conta: String,
    pub centro_de_custo: Option<String>,
    pub favorecido_pagador: Option<String>,
    pub contribuicao_id: Option<Uuid>,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarMovimentacao {
    pub data: NaiveDate,
    #[validate(length(min = 3, message = "Descrição deve ter pelo menos 3 caracteres"))]
    pub descricao: String,
    #[validate(custom(function = validar_valor_positivo, message = "Valor deve ser maior que zero"))]
    pub valor: Decimal,
    pub tipo: TipoMovimentacao,
    #[validate(length(min = 1, message = "Categoria é obrigatória"))]
    pub categoria: String,
    #[validate(length(min = 1, message = "Conta é obrigatória"))]
    pub conta: String,
    pub centro_de_custo: Option<String>,
    pub favorecido_pagador: Option<String>,
    pub contribuicao_id: Option<Uuid>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarMovimentacao {
    pub data: Option<NaiveDate>,
    #[validate(length(min = 3, message = "Descrição deve ter pelo menos 3 caracteres"))]
    pub descricao: Option<String>,
    #[validate(custom(function = validar_valor_positivo, message = "Valor deve ser maior que zero"))]
    pub valor: Option<Decimal>,
    pub tipo: Option<TipoMovimentacao>,
    #[validate(length(min = 1, message = "Categoria é obrigatória"))]
    pub categoria: Option<String>,
    #[validate(length(min = 1, message = "Conta é obrigatória"))]
    pub conta: Option<String>,
    pub centro_de_custo: Option<String>,
    pub favorecido_pagador: Option<String>,
    pub contribuicao_id: Option<Uuid>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroMovimentacao {
    pub tipo: Option<TipoMovimentacao>,
    pub categoria: Option<String>,
    pub conta: Option<String>,
    pub search: Option<String>,
    pub valor_min: Option<Decimal>,
    pub valor_max: Option<Decimal>,
}

/// Totais de entrada/saída de um lado do resumo financeiro.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LadoResumo {
    pub total: Decimal,
    pub quantidade: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoFinanceiro {
    pub conta: String,
    pub entradas: LadoResumo,
    pub saidas: LadoResumo,
    pub saldo: Decimal,
}

/// Linha agregada por categoria, ordenada por total decrescente.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoCategoria {
    pub categoria: String,
    pub entradas: Decimal,
    pub saidas: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoConta {
    pub conta: String,
    pub entradas: Decimal,
    pub saidas: Decimal,
    pub saldo: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasMovimentacoes {
    pub total: i64,
    pub entradas: LadoResumo,
    pub saidas: LadoResumo,
    pub saldo_total: Decimal,
    pub ultimas_movimentacoes: Vec<Movimentacao>,
}
