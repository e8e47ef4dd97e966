use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    common::paginacao::{ParamsPaginacao, ParamsPeriodo},
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{EscreverMovimentacoes, ExigePermissao, LerMovimentacoes},
    models::movimentacao::{
        AtualizarMovimentacao, CriarMovimentacao, FiltroMovimentacao, TipoMovimentacao,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParamsResumo {
    pub conta: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParamsTipo {
    pub tipo: Option<TipoMovimentacao>,
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes",
    tag = "Movimentações",
    params(FiltroMovimentacao, ParamsPeriodo, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada do livro-caixa")),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
    Query(filtro): Query<FiltroMovimentacao>,
    Query(periodo): Query<ParamsPeriodo>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado
        .movimentacao_service
        .listar(filtro, periodo, paginacao)
        .await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/resumo",
    tag = "Movimentações",
    params(ParamsResumo, ParamsPeriodo),
    responses((status = 200, description = "Entradas, saídas e saldo do período")),
    security(("api_jwt" = []))
)]
pub async fn resumo(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
    Query(params): Query<ParamsResumo>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let resumo = estado
        .movimentacao_service
        .resumo_financeiro(params.conta, periodo)
        .await?;
    Ok(Json(RespostaApi::dados(resumo)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/relatorio/categoria",
    tag = "Movimentações",
    params(ParamsTipo, ParamsPeriodo),
    responses((status = 200, description = "Totais agrupados por categoria")),
    security(("api_jwt" = []))
)]
pub async fn relatorio_categoria(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
    Query(params): Query<ParamsTipo>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado
        .movimentacao_service
        .relatorio_por_categoria(params.tipo, periodo)
        .await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/relatorio/conta",
    tag = "Movimentações",
    params(ParamsPeriodo),
    responses((status = 200, description = "Totais agrupados por conta")),
    security(("api_jwt" = []))
)]
pub async fn relatorio_conta(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado
        .movimentacao_service
        .relatorio_por_conta(periodo)
        .await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/categorias",
    tag = "Movimentações",
    responses((status = 200, description = "Categorias já utilizadas")),
    security(("api_jwt" = []))
)]
pub async fn categorias(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
) -> Result<impl IntoResponse, AppError> {
    let categorias = estado.movimentacao_service.categorias().await?;
    Ok(Json(RespostaApi::dados(categorias)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/contas",
    tag = "Movimentações",
    responses((status = 200, description = "Contas já utilizadas")),
    security(("api_jwt" = []))
)]
pub async fn contas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
) -> Result<impl IntoResponse, AppError> {
    let contas = estado.movimentacao_service.contas().await?;
    Ok(Json(RespostaApi::dados(contas)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/statistics",
    tag = "Movimentações",
    params(ParamsPeriodo),
    responses((status = 200, description = "Totais e últimos lançamentos")),
    security(("api_jwt" = []))
)]
pub async fn estatisticas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let stats = estado.movimentacao_service.estatisticas(periodo).await?;
    Ok(Json(RespostaApi::dados(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/movimentacoes/{id}",
    tag = "Movimentações",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses((status = 200), (status = 404, description = "Movimentação não encontrada")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerMovimentacoes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let movimentacao = estado.movimentacao_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(movimentacao)))
}

#[utoipa::path(
    post,
    path = "/api/v1/movimentacoes",
    tag = "Movimentações",
    request_body = CriarMovimentacao,
    responses((status = 201, description = "Lançamento registrado")),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverMovimentacoes>,
    Json(payload): Json<CriarMovimentacao>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let movimentacao = estado.movimentacao_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(movimentacao))))
}

#[utoipa::path(
    put,
    path = "/api/v1/movimentacoes/{id}",
    tag = "Movimentações",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    request_body = AtualizarMovimentacao,
    responses((status = 200, description = "Lançamento atualizado")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverMovimentacoes>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarMovimentacao>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let movimentacao = estado.movimentacao_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(movimentacao)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/movimentacoes/{id}",
    tag = "Movimentações",
    params(("id" = Uuid, Path, description = "ID da movimentação")),
    responses((status = 200, description = "Lançamento excluído")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverMovimentacoes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.movimentacao_service.excluir(id).await?;
    Ok(Json(RespostaApi::mensagem("Movimentação excluída com sucesso")))
}
