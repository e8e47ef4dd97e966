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
    common::paginacao::{ParamsPaginacao, ParamsPeriodo},
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{EscreverContribuicoes, ExigePermissao, LerContribuicoes},
    models::contribuicao::{
        AtualizarContribuicao, CriarContribuicao, DadosPagamento, FiltroContribuicao,
        GerarMensaisPayload, ParamsMes,
    },
};

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes",
    tag = "Contribuições",
    params(FiltroContribuicao, ParamsPeriodo, ParamsPaginacao),
    responses((status = 200, description = "Listagem paginada de contribuições")),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
    Query(filtro): Query<FiltroContribuicao>,
    Query(periodo): Query<ParamsPeriodo>,
    Query(paginacao): Query<ParamsPaginacao>,
) -> Result<impl IntoResponse, AppError> {
    let pagina = estado
        .contribuicao_service
        .listar(filtro, periodo, paginacao)
        .await?;
    Ok(Json(RespostaApi::de_pagina(pagina)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes/pendentes",
    tag = "Contribuições",
    params(ParamsPeriodo),
    responses((status = 200, description = "Contribuições pendentes em ordem de vencimento")),
    security(("api_jwt" = []))
)]
pub async fn pendentes(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let contribuicoes = estado.contribuicao_service.pendentes(periodo).await?;
    Ok(Json(RespostaApi::dados(contribuicoes)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes/atrasadas",
    tag = "Contribuições",
    responses((status = 200, description = "Contribuições vencidas e não pagas")),
    security(("api_jwt" = []))
)]
pub async fn atrasadas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
) -> Result<impl IntoResponse, AppError> {
    let contribuicoes = estado.contribuicao_service.atrasadas().await?;
    Ok(Json(RespostaApi::dados(contribuicoes)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes/mes",
    tag = "Contribuições",
    params(ParamsMes),
    responses((status = 200, description = "Contribuições com vencimento no mês")),
    security(("api_jwt" = []))
)]
pub async fn do_mes(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
    Query(params): Query<ParamsMes>,
) -> Result<impl IntoResponse, AppError> {
    let contribuicoes = estado
        .contribuicao_service
        .do_mes(params.ano, params.mes)
        .await?;
    Ok(Json(RespostaApi::dados(contribuicoes)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes/statistics",
    tag = "Contribuições",
    params(ParamsPeriodo),
    responses((status = 200, description = "Contagens, somas e taxa de adimplência")),
    security(("api_jwt" = []))
)]
pub async fn estatisticas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let stats = estado.contribuicao_service.estatisticas(periodo).await?;
    Ok(Json(RespostaApi::dados(stats)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes/relatorio-inadimplencia",
    tag = "Contribuições",
    responses((status = 200, description = "Devedores ordenados pelo total em atraso")),
    security(("api_jwt" = []))
)]
pub async fn relatorio_inadimplencia(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado.contribuicao_service.relatorio_inadimplencia().await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contribuicoes/{id}",
    tag = "Contribuições",
    params(("id" = Uuid, Path, description = "ID da contribuição")),
    responses((status = 200), (status = 404, description = "Contribuição não encontrada")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerContribuicoes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let contribuicao = estado.contribuicao_service.buscar_por_id(id).await?;
    Ok(Json(RespostaApi::dados(contribuicao)))
}

#[utoipa::path(
    post,
    path = "/api/v1/contribuicoes",
    tag = "Contribuições",
    request_body = CriarContribuicao,
    responses((status = 201, description = "Contribuição criada como pendente")),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverContribuicoes>,
    Json(payload): Json<CriarContribuicao>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contribuicao = estado.contribuicao_service.criar(payload).await?;
    Ok((StatusCode::CREATED, Json(RespostaApi::dados(contribuicao))))
}

#[utoipa::path(
    put,
    path = "/api/v1/contribuicoes/{id}",
    tag = "Contribuições",
    params(("id" = Uuid, Path, description = "ID da contribuição")),
    request_body = AtualizarContribuicao,
    responses((status = 200, description = "Contribuição atualizada")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverContribuicoes>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AtualizarContribuicao>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contribuicao = estado.contribuicao_service.atualizar(id, payload).await?;
    Ok(Json(RespostaApi::dados(contribuicao)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contribuicoes/{id}",
    tag = "Contribuições",
    params(("id" = Uuid, Path, description = "ID da contribuição")),
    responses((status = 200), (status = 409, description = "Contribuição possui nota fiscal")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverContribuicoes>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    estado.contribuicao_service.excluir(id).await?;
    Ok(Json(RespostaApi::mensagem("Contribuição excluída com sucesso")))
}

#[utoipa::path(
    post,
    path = "/api/v1/contribuicoes/{id}/processar-pagamento",
    tag = "Contribuições",
    params(("id" = Uuid, Path, description = "ID da contribuição")),
    request_body = DadosPagamento,
    responses(
        (status = 200, description = "Pagamento registrado"),
        (status = 409, description = "Contribuição já paga")
    ),
    security(("api_jwt" = []))
)]
pub async fn processar_pagamento(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverContribuicoes>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DadosPagamento>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let contribuicao = estado
        .contribuicao_service
        .processar_pagamento(id, payload)
        .await?;
    Ok(Json(RespostaApi::dados_com_mensagem(
        contribuicao,
        "Pagamento processado com sucesso",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/contribuicoes/gerar-mensais",
    tag = "Contribuições",
    request_body = GerarMensaisPayload,
    responses((status = 200, description = "Contribuições do mês geradas")),
    security(("api_jwt" = []))
)]
pub async fn gerar_mensais(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverContribuicoes>,
    Json(payload): Json<GerarMensaisPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let resultado = estado
        .contribuicao_service
        .gerar_contribuicoes_mensais(payload.ano, payload.mes)
        .await?;
    Ok(Json(RespostaApi::dados_com_mensagem(
        resultado,
        format!(
            "Contribuições de {}/{} geradas com sucesso",
            payload.mes, payload.ano
        ),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/contribuicoes/marcar-atrasadas",
    tag = "Contribuições",
    responses((status = 200, description = "Pendentes vencidas marcadas como atrasadas")),
    security(("api_jwt" = []))
)]
pub async fn marcar_atrasadas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<EscreverContribuicoes>,
) -> Result<impl IntoResponse, AppError> {
    let total = estado.contribuicao_service.marcar_atrasadas().await?;
    Ok(Json(RespostaApi::dados_com_mensagem(
        serde_json::json!({ "total": total }),
        "Contribuições atrasadas marcadas com sucesso",
    )))
}
