use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::contribuicao::FormaPagamento;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_nota_fiscal", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusNotaFiscal {
    Emitida,
    Cancelada,
}

/// Nota fiscal emitida contra uma contribuição paga (relação 1:1).
/// `numero` segue o formato `NF<ano><sequencial de 6 dígitos>`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotaFiscal {
    pub id: Uuid,
    pub numero: String,
    pub contribuicao_id: Uuid,
    pub valor: Decimal,
    pub data_emissao: DateTime<Utc>,
    pub status: StatusNotaFiscal,
    pub arquivo: Option<String>,
    pub observacoes: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Nota fiscal com os dados da contribuição e do pagador, para listagens e PDF.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotaFiscalDetalhada {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub nota: NotaFiscal,
    pub pessoa_nome: String,
    pub pessoa_email: String,
    pub pessoa_telefone: Option<String>,
    pub pessoa_endereco: Option<String>,
    pub tipo_pessoa: String,
    pub data_vencimento: NaiveDate,
    pub data_pagamento: Option<NaiveDate>,
    pub forma_pagamento: Option<FormaPagamento>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarNotaFiscal {
    pub contribuicao_id: Uuid,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarNotaFiscal {
    pub status: Option<StatusNotaFiscal>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelarNotaFiscal {
    pub motivo: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GerarLotePayload {
    #[validate(length(min = 1, message = "Lista de contribuições não pode estar vazia"))]
    pub contribuicao_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErroLote {
    pub contribuicao_id: Uuid,
    pub erro: String,
}

/// Resultado do lote: sucesso parcial nunca aborta as demais notas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoLote {
    pub notas_fiscais_criadas: Vec<NotaFiscal>,
    pub erros: Vec<ErroLote>,
    pub total_processadas: usize,
    pub total_criadas: usize,
    pub total_erros: usize,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroNotaFiscal {
    pub status: Option<StatusNotaFiscal>,
    pub numero_nota: Option<String>,
    pub contribuicao_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotasPorMes {
    /// "YYYY-MM"
    pub mes: String,
    pub quantidade: i64,
    pub valor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasNotasFiscais {
    pub total: i64,
    pub emitidas: i64,
    pub canceladas: i64,
    pub valor_total_emitido: Decimal,
    /// Percentual canceladas/total com duas casas, ex.: "12.50"
    pub taxa_cancelamento: String,
    pub notas_por_mes: Vec<NotasPorMes>,
}

/// Campos legíveis usados na montagem do PDF.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DadosPdfNota {
    pub numero: String,
    pub data_emissao: String,
    pub valor: Decimal,
    pub pagador_nome: String,
    pub pagador_email: String,
    pub pagador_endereco: String,
    pub contribuicao_id: Uuid,
    pub data_vencimento: String,
    pub data_pagamento: Option<String>,
    pub forma_pagamento: Option<FormaPagamento>,
    pub tipo_pessoa: String,
    pub observacoes: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoPdf {
    pub nota_fiscal: NotaFiscal,
    pub dados_formatados: DadosPdfNota,
    pub arquivo: String,
}
