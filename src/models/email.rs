use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_template_email", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TipoTemplateEmail {
    Cobranca,
    Lembrete,
    Agradecimento,
    BoasVindas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_envio_email", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusEnvioEmail {
    Pendente,
    Enviado,
    Erro,
    Agendado,
}

/// Template de e-mail com marcadores `{{chave}}` no assunto e no corpo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateEmail {
    pub id: Uuid,
    pub nome: String,
    pub assunto: String,
    pub corpo: String,
    pub tipo: TipoTemplateEmail,
    pub ativo: bool,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Registro de envio (ou tentativa de envio) de um e-mail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEmail {
    pub id: Uuid,
    pub destinatario: String,
    pub assunto: String,
    pub corpo: String,
    pub template_id: Option<Uuid>,
    pub status: StatusEnvioEmail,
    pub tentativas: i32,
    pub ultima_tentativa: Option<DateTime<Utc>>,
    pub erro_envio: Option<String>,
    pub agendar_para: Option<DateTime<Utc>>,
    pub enviado_em: Option<DateTime<Utc>>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarTemplateEmail {
    #[validate(length(min = 3, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub nome: String,
    #[validate(length(min = 5, message = "Assunto deve ter pelo menos 5 caracteres"))]
    pub assunto: String,
    #[validate(length(min = 10, message = "Corpo do email deve ter pelo menos 10 caracteres"))]
    pub corpo: String,
    pub tipo: TipoTemplateEmail,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarTemplateEmail {
    #[validate(length(min = 3, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub nome: Option<String>,
    #[validate(length(min = 5, message = "Assunto deve ter pelo menos 5 caracteres"))]
    pub assunto: Option<String>,
    #[validate(length(min = 10, message = "Corpo do email deve ter pelo menos 10 caracteres"))]
    pub corpo: Option<String>,
    pub tipo: Option<TipoTemplateEmail>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AtivarTemplatePayload {
    pub ativo: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicarTemplatePayload {
    #[validate(length(min = 3, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub novo_nome: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenderizarTemplatePayload {
    #[serde(default)]
    pub dados: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRenderizado {
    pub assunto: String,
    pub corpo: String,
    pub template: TemplateEmail,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnviarEmailPayload {
    #[validate(email(message = "Email inválido"))]
    pub destinatario: String,
    pub assunto: Option<String>,
    pub corpo: Option<String>,
    pub template_id: Option<Uuid>,
    #[serde(default)]
    pub dados: HashMap<String, serde_json::Value>,
    pub agendar_para: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DestinatarioLote {
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    pub nome: Option<String>,
    #[serde(default)]
    pub dados: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnviarEmailLotePayload {
    #[validate(length(min = 1, message = "Lista de destinatários não pode estar vazia"), nested)]
    pub destinatarios: Vec<DestinatarioLote>,
    pub template_id: Option<Uuid>,
    pub assunto: Option<String>,
    pub corpo: Option<String>,
    pub agendar_para: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErroEnvioLote {
    pub destinatario: String,
    pub erro: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoEnvioLote {
    pub enviados: Vec<LogEmail>,
    pub erros: Vec<ErroEnvioLote>,
    pub total_processados: usize,
    pub total_enviados: usize,
    pub total_erros: usize,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroLogEmail {
    pub status: Option<StatusEnvioEmail>,
    pub template_id: Option<Uuid>,
    pub destinatario: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroTemplateEmail {
    pub tipo: Option<TipoTemplateEmail>,
    pub ativo: Option<bool>,
}
