use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    common::resposta::RespostaApi,
    config::AppState,
    models::assistido::{AtualizarAssistido, CriarAssistido, FiltroAssistido},
    models::sede::{AtualizarSede, CriarSede},
    models::voluntario::{AtualizarVoluntario, CriarVoluntario, FiltroVoluntario},
};

// As rotas deste módulo já passam pelo `super_admin_guard`; não há checagem
// adicional de permissão por recurso.

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferirUsuarioPayload {
    pub sede_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/v1/super-admin/dashboard",
    tag = "Super Admin",
    responses((status = 200, description = "Totais globais e por sede")),
    security(("api_jwt" = []))
)]
pub async fn dashboard(State(estado): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let dashboard = estado.super_admin_service.dashboard().await?;
    Ok(Json(RespostaApi::dados(dashboard)))
}

// ========== USUÁRIOS ==========

#[utoipa::path(
    get,
    path = "/api/v1/super-admin/usuarios",
    tag = "Super Admin",
    params(FiltroVoluntario, ParamsPaginacao),
    responses((status = 200, description = "Usuários de todas as sedes")),
    security(("api_jwt" = []))
)]
pub async fn listar_usuarios(
    State(estado): State<AppState>,
    Query(filtro): Query<FiltroVoluntario>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado
        .super_admin_service
        .listar_usuarios(filtro, paginacao)
        .await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    post,
    path = "/api/v1/super-admin/usuarios",
    tag = "Super Admin",
    request_body = CriarVoluntario,
    responses((status = 201, description = "Usuário criado em qualquer sede")),
    security(("api_jwt" = []))
)]
pub async fn criar_usuario(
    State(estado): State<AppState>,
    Json(payload): Json<CriarVoluntario>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let usuario = estado.super_admin_service.criar_usuario(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(usuario))))
}

#[utoipa::path(
    put,
    path = "/api/v1/super-admin/usuarios/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = AtualizarVoluntario,
    responses((status = 200, description = "Usuário atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_usuario(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarVoluntario>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let usuario = estado
        .super_admin_service
        .atualizar_usuario(id, payload)
        .await?;
    Ok(Json(RespostaApi::dados(usuario)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/super-admin/usuarios/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses((status = 200, description = "Usuário excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir_usuario(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.super_admin_service.excluir_usuario(id).await?;
    Ok(Json(RespostaApi::mensagem("Usuário excluído com sucesso")))
}

#[utoipa::path(
    post,
    path = "/api/v1/super-admin/usuarios/{id}/transferir",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = TransferirUsuarioPayload,
    responses(
        (status = 200, description = "Usuário transferido de sede"),
        (status = 400, description = "Sede de destino inativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn transferir_usuario(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransferirUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    let usuario = estado
        .super_admin_service
        .transferir_usuario(id, payload.sede_id)
        .await?;
    Ok(Json(RespostaApi::dados(usuario)))
}

// ========== ASSISTIDOS ==========

#[utoipa::path(
    get,
    path = "/api/v1/super-admin/assistidos",
    tag = "Super Admin",
    params(FiltroAssistido, ParamsPaginacao),
    responses((status = 200, description = "Assistidos de todas as sedes")),
    security(("api_jwt" = []))
)]
pub async fn listar_assistidos(
    State(estado): State<AppState>,
    Query(filtro): Query<FiltroAssistido>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado
        .super_admin_service
        .listar_assistidos(filtro, paginacao)
        .await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    post,
    path = "/api/v1/super-admin/assistidos",
    tag = "Super Admin",
    request_body = CriarAssistido,
    responses((status = 201, description = "Assistido criado em qualquer sede")),
    security(("api_jwt" = []))
)]
pub async fn criar_assistido(
    State(estado): State<AppState>,
    Json(payload): Json<CriarAssistido>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let assistido = estado.super_admin_service.criar_assistido(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(assistido))))
}

#[utoipa::path(
    put,
    path = "/api/v1/super-admin/assistidos/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID do assistido")),
    request_body = AtualizarAssistido,
    responses((status = 200, description = "Assistido atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_assistido(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarAssistido>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let assistido = estado
        .super_admin_service
        .atualizar_assistido(id, payload)
        .await?;
    Ok(Json(RespostaApi::dados(assistido)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/super-admin/assistidos/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID do assistido")),
    responses((status = 200, description = "Assistido excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir_assistido(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.super_admin_service.excluir_assistido(id).await?;
    Ok(Json(RespostaApi::mensagem("Assistido excluído com sucesso")))
}

// ========== SEDES ==========

#[utoipa::path(
    get,
    path = "/api/v1/super-admin/sedes",
    tag = "Super Admin",
    responses((status = 200, description = "Todas as sedes com contadores")),
    security(("api_jwt" = []))
)]
pub async fn listar_sedes(State(estado): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sedes = estado.super_admin_service.listar_sedes().await?;
    Ok(Json(RespostaApi::dados(sedes)))
}

#[utoipa::path(
    post,
    path = "/api/v1/super-admin/sedes",
    tag = "Super Admin",
    request_body = CriarSede,
    responses((status = 201, description = "Sede criada")),
    security(("api_jwt" = []))
)]
pub async fn criar_sede(
    State(estado): State<AppState>,
    Json(payload): Json<CriarSede>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sede = estado.super_admin_service.criar_sede(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(sede))))
}

#[utoipa::path(
    put,
    path = "/api/v1/super-admin/sedes/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID da sede")),
    request_body = AtualizarSede,
    responses((status = 200, description = "Sede atualizada")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_sede(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarSede>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sede = estado.super_admin_service.atualizar_sede(id, payload).await?;
    Ok(Json(RespostaApi::dados(sede)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/super-admin/sedes/{id}",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID da sede")),
    responses(
        (status = 200, description = "Sede excluída"),
        (status = 409, description = "Sede ainda possui pessoas vinculadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn excluir_sede(
    State(estado): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.super_admin_service.excluir_sede(id).await?;
    Ok(Json(RespostaApi::mensagem("Sede excluída com sucesso")))
}
