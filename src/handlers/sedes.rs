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
    middleware::rbac::{EscreverSedes, ExigePermissao, LerSedes},
    models::sede::{AtualizarSede, CriarSede, FiltroSede},
};

#[utoipa::path(
    get,
    path = "/api/v1/sedes",
    tag = "Sedes",
    params(FiltroSede, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada de sedes")),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerSedes>,
    Query(filtro): Query<FiltroSede>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado.sede_service.listar(filtro, paginacao).await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sedes/ativas",
    tag = "Sedes",
    responses((status = 200, description = "Sedes ativas para seleção")),
    security(("api_jwt" = []))
)]
pub async fn listar_ativas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerSedes>,
) -> Result<impl IntoResponse, AppError> {
    let sedes = estado.sede_service.listar_ativas().await?;
    Ok(Json(RespostaApi::dados(sedes)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sedes/statistics",
    tag = "Sedes",
    responses((status = 200, description = "Contagens de sedes")),
    security(("api_jwt" = []))
)]
pub async fn estatisticas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerSedes>,
) -> Result<impl IntoResponse, AppError> {
    let stats = estado.sede_service.estatisticas().await?;
    Ok(Json(RespostaApi::dados(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sedes/{id}",
    tag = "Sedes",
    params(("id" = Uuid, Path, description = "ID da sede")),
    responses((status = 200), (status = 404, description = "Sede não encontrada")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerSedes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sede = estado.sede_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(sede)))
}

#[utoipa::path(
    post,
    path = "/api/v1/sedes",
    tag = "Sedes",
    request_body = CriarSede,
    responses((status = 201, description = "Sede criada")),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverSedes>,
    Json(payload): Json<CriarSede>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sede = estado.sede_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(sede))))
}

#[utoipa::path(
    put,
    path = "/api/v1/sedes/{id}",
    tag = "Sedes",
    params(("id" = Uuid, Path, description = "ID da sede")),
    request_body = AtualizarSede,
    responses((status = 200, description = "Sede atualizada")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverSedes>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarSede>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let sede = estado.sede_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(sede)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sedes/{id}",
    tag = "Sedes",
    params(("id" = Uuid, Path, description = "ID da sede")),
    responses((status = 200, description = "Sede excluída")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverSedes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.sede_service.excluir(id).await?;
    Ok(Json(RespostaApi::mensagem("Sede excluída com sucesso")))
}

#[utoipa::path(
    post,
    path = "/api/v1/sedes/{id}/toggle-status",
    tag = "Sedes",
    params(("id" = Uuid, Path, description = "ID da sede")),
    responses((status = 200, description = "Status alternado")),
    security(("api_jwt" = []))
)]
pub async fn alternar_status(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverSedes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sede = estado.sede_service.alternar_status(id).await?;
    Ok(Json(RespostaApi::dados(sede)))
}
