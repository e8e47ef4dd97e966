use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPaginacao,
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{EscreverVoluntarios, ExigePermissao, LerVoluntarios},
    models::voluntario::{
        AtualizarStatusPessoa, AtualizarVoluntario, CriarVoluntario, FiltroVoluntario,
    },
};

#[utoipa::path(
    get,
    path = "/api/v1/voluntarios",
    tag = "Voluntários",
    params(FiltroVoluntario, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada de voluntários")),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerVoluntarios>,
    Query(filtro): Query<FiltroVoluntario>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado.voluntario_service.listar(filtro, paginacao).await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/voluntarios/statistics",
    tag = "Voluntários",
    responses((status = 200, description = "Contagens por status")),
    security(("api_jwt" = []))
)]
pub async fn estatisticas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerVoluntarios>,
) -> Result<impl IntoResponse, AppError> {
    let stats = estado.voluntario_service.estatisticas().await?;
    Ok(Json(RespostaApi::dados(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/voluntarios/{id}",
    tag = "Voluntários",
    params(("id" = Uuid, Path, description = "ID do voluntário")),
    responses((status = 200), (status = 404, description = "Voluntário não encontrado")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerVoluntarios>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let voluntario = estado.voluntario_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(voluntario)))
}

#[utoipa::path(
    post,
    path = "/api/v1/voluntarios",
    tag = "Voluntários",
    request_body = CriarVoluntario,
    responses((status = 201, description = "Voluntário criado")),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverVoluntarios>,
    Json(payload): Json<CriarVoluntario>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let voluntario = estado.voluntario_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(voluntario))))
}

#[utoipa::path(
    put,
    path = "/api/v1/voluntarios/{id}",
    tag = "Voluntários",
    params(("id" = Uuid, Path, description = "ID do voluntário")),
    request_body = AtualizarVoluntario,
    responses((status = 200, description = "Voluntário atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverVoluntarios>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarVoluntario>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let voluntario = estado.voluntario_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(voluntario)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/voluntarios/{id}/status",
    tag = "Voluntários",
    params(("id" = Uuid, Path, description = "ID do voluntário")),
    request_body = AtualizarStatusPessoa,
    responses((status = 200, description = "Status atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar_status(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverVoluntarios>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarStatusPessoa>,
) -> Result<impl IntoResponse, AppError> {
    let voluntario = estado
        .voluntario_service
        .atualizar_status(id, payload.status)
        .await?;
    Ok(Json(RespostaApi::dados(voluntario)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/voluntarios/{id}",
    tag = "Voluntários",
    params(("id" = Uuid, Path, description = "ID do voluntário")),
    responses((status = 200, description = "Voluntário excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverVoluntarios>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.voluntario_service.excluir(id).await?;
    Ok(Json(RespostaApi::mensagem("Voluntário excluído com sucesso")))
}
