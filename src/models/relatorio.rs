use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::contribuicao::EstatisticasContribuicoes;
use crate::models::movimentacao::Movimentacao;

/// Agrupamento temporal escolhido pelo chamador nos relatórios de
/// receitas/despesas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Agrupamento {
    Dia,
    #[default]
    Mes,
    Ano,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroRelatorioMovimentos {
    pub categoria: Option<String>,
    pub conta: Option<String>,
    pub agrupamento: Option<Agrupamento>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FiltroRelatorioContribuicoes {
    pub status: Option<crate::models::contribuicao::StatusContribuicao>,
    /// "voluntario" ou "assistido"
    pub tipo: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoFinanceiroDashboard {
    pub total_receitas: Decimal,
    pub total_despesas: Decimal,
    pub saldo_liquido: Decimal,
    pub qtd_entradas: i64,
    pub qtd_saidas: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PessoasAtivas {
    pub voluntarios_ativos: i64,
    pub assistidos_ativos: i64,
}

/// Quebra de valores por chave de agrupamento (categoria ou conta),
/// em sequência ordenada para serialização determinística.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuebraPorChave {
    pub chave: String,
    pub entradas: Decimal,
    pub saidas: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardGeral {
    pub resumo_financeiro: ResumoFinanceiroDashboard,
    pub pessoas: PessoasAtivas,
    pub contribuicoes: EstatisticasContribuicoes,
    pub categorias: Vec<QuebraPorChave>,
    pub contas: Vec<QuebraPorChave>,
    pub movimentacoes_recentes: Vec<Movimentacao>,
}

/// Total agregado de um período ("YYYY-MM-DD", "YYYY-MM" ou "YYYY").
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoResumo {
    pub periodo: String,
    pub valor: Decimal,
    pub quantidade: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoriaTotal {
    pub categoria: String,
    pub total: Decimal,
    pub quantidade: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoMovimentos {
    pub total: Decimal,
    pub media: Decimal,
    pub quantidade_transacoes: i64,
}

/// Relatório de receitas ou despesas: mesmo formato para os dois lados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioMovimentos {
    pub resumo: ResumoMovimentos,
    pub por_categoria: Vec<CategoriaTotal>,
    pub agrupados: Vec<PeriodoResumo>,
    pub detalhes: Vec<Movimentacao>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusTotal {
    pub status: String,
    pub quantidade: i64,
    pub valor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipoPessoaTotal {
    pub tipo: String,
    pub quantidade: i64,
    pub valor: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoRelatorioContribuicoes {
    pub total_contribuicoes: i64,
    pub valor_total: Decimal,
    pub valor_pago: Decimal,
    pub valor_pendente: Decimal,
    pub taxa_adimplencia: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioContribuicoes {
    pub resumo: ResumoRelatorioContribuicoes,
    pub por_status: Vec<StatusTotal>,
    pub por_tipo: Vec<TipoPessoaTotal>,
    pub detalhes: Vec<crate::models::contribuicao::ContribuicaoDetalhada>,
}

/// Linha de total mensal vinda do banco ("YYYY-MM" + soma).
#[derive(Debug, Clone, FromRow)]
pub struct TotalMensal {
    pub mes: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaseProjecao {
    pub periodo_base: String,
    pub receita_media_mensal: Decimal,
    pub despesa_media_mensal: Decimal,
    pub contribuicoes_esperadas_mes: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjecaoMes {
    /// Ex.: "Janeiro de 2027"
    pub mes: String,
    /// "YYYY-MM"
    pub data: String,
    pub receita_projetada: Decimal,
    pub despesa_projetada: Decimal,
    pub contribuicoes_esperadas: Decimal,
    pub saldo_projetado: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjecaoFinanceira {
    pub base_dados: BaseProjecao,
    pub projecoes: Vec<ProjecaoMes>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LadoComparativo {
    pub valor: Decimal,
    pub quantidade: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparativoMes {
    pub mes: u32,
    pub nome_mes: String,
    pub receitas: LadoComparativo,
    pub despesas: LadoComparativo,
    pub contribuicoes: LadoComparativo,
    pub saldo: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotaisAnuais {
    pub receitas: Decimal,
    pub despesas: Decimal,
    pub contribuicoes: Decimal,
    pub saldo: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparativoMensal {
    pub ano: i32,
    pub comparativo: Vec<ComparativoMes>,
    pub totais_anuais: TotaisAnuais,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricasChave {
    pub periodo: String,
    pub saldo_liquido: Decimal,
    pub total_receitas: Decimal,
    pub total_despesas: Decimal,
    pub taxa_adimplencia: String,
    pub ticket_medio_contribuicao: Decimal,
    /// Percentual das receitas vindo de contribuições, duas casas
    pub eficiencia_arrecadacao: String,
    pub pessoas_ativas: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoRelatorio {
    pub inicio: Option<NaiveDate>,
    pub fim: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioCompleto {
    pub dashboard: DashboardGeral,
    pub receitas: RelatorioMovimentos,
    pub despesas: RelatorioMovimentos,
    pub contribuicoes: RelatorioContribuicoes,
    pub periodo: PeriodoRelatorio,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ParamsResumoFinanceiro {
    /// hoje | semana | mes | ano (ausente = período explícito)
    pub periodo: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParamsProjecao {
    pub meses: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ParamsAno {
    pub ano: i32,
}

/// Dashboard consolidado do super admin (todas as sedes).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotaisPorStatus {
    pub total: i64,
    pub ativos: i64,
    pub inativos: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SedeStats {
    pub id: uuid::Uuid,
    pub nome: String,
    pub ativo: bool,
    pub voluntarios: i64,
    pub assistidos: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSuperAdmin {
    pub sedes: crate::models::sede::EstatisticasSedes,
    pub voluntarios: TotaisPorStatus,
    pub assistidos: TotaisPorStatus,
    pub stats_por_sede: Vec<SedeStats>,
}
