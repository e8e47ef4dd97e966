use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::validar_cpf;

/// Cargo do voluntário dentro da organização. Também define o que ele pode
/// fazer no sistema (ver `middleware::rbac`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cargo_voluntario", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Cargo {
    Voluntario,
    Secretario,
    Tesoureiro,
    Presidente,
    SuperAdmin,
}

impl Cargo {
    /// Cargos com acesso administrativo entre sedes.
    pub fn acesso_global(self) -> bool {
        matches!(self, Cargo::SuperAdmin | Cargo::Presidente)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "status_pessoa", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusPessoa {
    Ativo,
    Inativo,
    Suspenso,
}

/// Voluntário. Também é a identidade usada para login no sistema.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Voluntario {
    pub id: Uuid,
    pub nome_completo: String,
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    pub email: String,
    pub endereco: Option<String>,
    pub data_ingresso: NaiveDate,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub status: StatusPessoa,
    pub cargo: Cargo,
    pub sede_id: Uuid,
    // Hash bcrypt; nunca sai na serialização
    #[serde(skip_serializing, default)]
    pub senha: Option<String>,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoluntarioComSede {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub voluntario: Voluntario,
    pub sede_nome: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CriarVoluntario {
    #[validate(length(min = 3, max = 100, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub nome_completo: String,
    #[validate(custom(function = validar_cpf, message = "CPF deve ter 11 dígitos"))]
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    pub endereco: Option<String>,
    pub data_ingresso: NaiveDate,
    pub observacoes: Option<String>,
    pub sede_id: Uuid,
    pub cargo: Option<Cargo>,
    #[validate(length(min = 6, message = "Senha deve ter pelo menos 6 caracteres"))]
    pub senha: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AtualizarVoluntario {
    #[validate(length(min = 3, max = 100, message = "Nome deve ter pelo menos 3 caracteres"))]
    pub nome_completo: Option<String>,
    #[validate(custom(function = validar_cpf, message = "CPF deve ter 11 dígitos"))]
    pub cpf: Option<String>,
    pub telefone: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    pub endereco: Option<String>,
    pub data_ingresso: Option<NaiveDate>,
    pub observacoes: Option<String>,
    pub sede_id: Option<Uuid>,
    pub cargo: Option<Cargo>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AtualizarStatusPessoa {
    pub status: StatusPessoa,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroVoluntario {
    pub status: Option<StatusPessoa>,
    pub search: Option<String>,
    pub sede_id: Option<Uuid>,
    pub cargo: Option<Cargo>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstatisticasVoluntarios {
    pub total: i64,
    pub ativos: i64,
    pub inativos: i64,
    pub suspensos: i64,
}
