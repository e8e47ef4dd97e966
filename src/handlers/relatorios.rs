use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPeriodo,
    common::resposta::RespostaApi,
    config::AppState,
    middleware::rbac::{ExigePermissao, LerRelatorios},
    models::relatorio::{
        FiltroRelatorioContribuicoes, FiltroRelatorioMovimentos, ParamsAno, ParamsProjecao,
        ParamsResumoFinanceiro,
    },
};

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/dashboard",
    tag = "Relatórios",
    params(ParamsPeriodo),
    responses((status = 200, description = "Visão geral financeira e de pessoas")),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = estado.relatorio_service.dashboard_geral(periodo).await?;
    Ok(Json(RespostaApi::dados(dashboard)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/resumo-financeiro",
    tag = "Relatórios",
    params(ParamsResumoFinanceiro, ParamsPeriodo),
    responses((status = 200, description = "Resumo por período nomeado ou intervalo")),
    security(("api_jwt" = []))
)]
pub async fn resumo_financeiro(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(params): Query<ParamsResumoFinanceiro>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let (nome, intervalo, dashboard) = estado
        .relatorio_service
        .resumo_financeiro(params.periodo, periodo)
        .await?;
    Ok(Json(RespostaApi::dados(json!({
        "periodo": nome,
        "dataInicio": intervalo.start_date,
        "dataFim": intervalo.end_date,
        "dashboard": dashboard,
    }))))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/metricas-chave",
    tag = "Relatórios",
    responses((status = 200, description = "Métricas dos últimos 30 dias")),
    security(("api_jwt" = []))
)]
pub async fn metricas_chave(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
) -> Result<impl IntoResponse, AppError> {
    let metricas = estado.relatorio_service.metricas_chave().await?;
    Ok(Json(RespostaApi::dados(metricas)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/receitas",
    tag = "Relatórios",
    params(FiltroRelatorioMovimentos, ParamsPeriodo),
    responses((status = 200, description = "Receitas agrupadas e detalhadas")),
    security(("api_jwt" = []))
)]
pub async fn receitas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(filtro): Query<FiltroRelatorioMovimentos>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado
        .relatorio_service
        .relatorio_receitas(
            filtro.categoria,
            filtro.conta,
            filtro.agrupamento.unwrap_or_default(),
            periodo,
        )
        .await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/despesas",
    tag = "Relatórios",
    params(FiltroRelatorioMovimentos, ParamsPeriodo),
    responses((status = 200, description = "Despesas agrupadas e detalhadas")),
    security(("api_jwt" = []))
)]
pub async fn despesas(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(filtro): Query<FiltroRelatorioMovimentos>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado
        .relatorio_service
        .relatorio_despesas(
            filtro.categoria,
            filtro.conta,
            filtro.agrupamento.unwrap_or_default(),
            periodo,
        )
        .await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/contribuicoes",
    tag = "Relatórios",
    params(FiltroRelatorioContribuicoes, ParamsPeriodo),
    responses((status = 200, description = "Contribuições por status e tipo de pessoa")),
    security(("api_jwt" = []))
)]
pub async fn contribuicoes(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(filtro): Query<FiltroRelatorioContribuicoes>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado
        .relatorio_service
        .relatorio_contribuicoes(filtro.status, filtro.tipo, periodo)
        .await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/projecao-financeira",
    tag = "Relatórios",
    params(ParamsProjecao),
    responses((status = 200, description = "Projeção linear dos próximos meses")),
    security(("api_jwt" = []))
)]
pub async fn projecao_financeira(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(params): Query<ParamsProjecao>,
) -> Result<impl IntoResponse, AppError> {
    let projecao = estado
        .relatorio_service
        .projecao_financeira(params.meses.unwrap_or(12))
        .await?;
    Ok(Json(RespostaApi::dados(projecao)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/comparativo-mensal",
    tag = "Relatórios",
    params(ParamsAno),
    responses((status = 200, description = "Doze meses de receitas, despesas e contribuições")),
    security(("api_jwt" = []))
)]
pub async fn comparativo_mensal(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(params): Query<ParamsAno>,
) -> Result<impl IntoResponse, AppError> {
    let comparativo = estado
        .relatorio_service
        .comparativo_mensal(params.ano)
        .await?;
    Ok(Json(RespostaApi::dados(comparativo)))
}

#[utoipa::path(
    get,
    path = "/api/v1/relatorios/completo",
    tag = "Relatórios",
    params(ParamsPeriodo),
    responses((status = 200, description = "Dashboard, receitas, despesas e contribuições")),
    security(("api_jwt" = []))
)]
pub async fn completo(
    State(estado): State<AppState>,
    _perm: ExigePermissao<LerRelatorios>,
    Query(periodo): Query<ParamsPeriodo>,
) -> Result<impl IntoResponse, AppError> {
    let relatorio = estado.relatorio_service.relatorio_completo(periodo).await?;
    Ok(Json(RespostaApi::dados(relatorio)))
}
