use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    common::paginacao::ParamsPeriodo,
    db::{AssistidoRepository, ContribuicaoRepository, MovimentacaoRepository, RelatorioRepository},
    models::contribuicao::{ContribuicaoDetalhada, StatusContribuicao},
    models::movimentacao::{Movimentacao, TipoMovimentacao},
    models::relatorio::{
        Agrupamento, BaseProjecao, CategoriaTotal, ComparativoMensal, ComparativoMes,
        DashboardGeral, LadoComparativo, MetricasChave, PeriodoRelatorio, PeriodoResumo,
        PessoasAtivas, ProjecaoFinanceira, ProjecaoMes, RelatorioCompleto, RelatorioContribuicoes,
        RelatorioMovimentos, ResumoFinanceiroDashboard, ResumoMovimentos,
        ResumoRelatorioContribuicoes, StatusTotal, TipoPessoaTotal, TotaisAnuais, TotalMensal,
    },
    services::contribuicao_service::{formatar_percentual, montar_estatisticas},
};

pub const NOMES_MESES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Relatórios e dashboards: agregação pura sobre o livro-caixa e as
/// contribuições, sem estado próprio.
#[derive(Clone)]
pub struct RelatorioService {
    relatorio_repo: RelatorioRepository,
    movimentacao_repo: MovimentacaoRepository,
    contribuicao_repo: ContribuicaoRepository,
    assistido_repo: AssistidoRepository,
}

impl RelatorioService {
    pub fn new(
        relatorio_repo: RelatorioRepository,
        movimentacao_repo: MovimentacaoRepository,
        contribuicao_repo: ContribuicaoRepository,
        assistido_repo: AssistidoRepository,
    ) -> Self {
        Self {
            relatorio_repo,
            movimentacao_repo,
            contribuicao_repo,
            assistido_repo,
        }
    }

    pub async fn dashboard_geral(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<DashboardGeral, AppError> {
        let entradas = self
            .movimentacao_repo
            .totais_por_tipo(TipoMovimentacao::Entrada, None, &periodo)
            .await?;
        let saidas = self
            .movimentacao_repo
            .totais_por_tipo(TipoMovimentacao::Saida, None, &periodo)
            .await?;
        let categorias = self.relatorio_repo.quebra_por_categoria(&periodo).await?;
        let contas = self.relatorio_repo.quebra_por_conta(&periodo).await?;
        let voluntarios_ativos = self.relatorio_repo.contar_voluntarios_ativos().await?;
        let assistidos_ativos = self.relatorio_repo.contar_assistidos_ativos().await?;
        let contagens = self.contribuicao_repo.contagens(&periodo).await?;
        let movimentacoes_recentes = self.movimentacao_repo.recentes(&periodo, 10).await?;

        Ok(DashboardGeral {
            resumo_financeiro: ResumoFinanceiroDashboard {
                saldo_liquido: entradas.total - saidas.total,
                total_receitas: entradas.total,
                total_despesas: saidas.total,
                qtd_entradas: entradas.quantidade,
                qtd_saidas: saidas.quantidade,
            },
            pessoas: PessoasAtivas {
                voluntarios_ativos,
                assistidos_ativos,
            },
            contribuicoes: montar_estatisticas(contagens),
            categorias,
            contas,
            movimentacoes_recentes,
        })
    }

    pub async fn relatorio_receitas(
        &self,
        categoria: Option<String>,
        conta: Option<String>,
        agrupamento: Agrupamento,
        periodo: ParamsPeriodo,
    ) -> Result<RelatorioMovimentos, AppError> {
        self.relatorio_movimentos(TipoMovimentacao::Entrada, categoria, conta, agrupamento, periodo)
            .await
    }

    pub async fn relatorio_despesas(
        &self,
        categoria: Option<String>,
        conta: Option<String>,
        agrupamento: Agrupamento,
        periodo: ParamsPeriodo,
    ) -> Result<RelatorioMovimentos, AppError> {
        self.relatorio_movimentos(TipoMovimentacao::Saida, categoria, conta, agrupamento, periodo)
            .await
    }

    async fn relatorio_movimentos(
        &self,
        tipo: TipoMovimentacao,
        categoria: Option<String>,
        conta: Option<String>,
        agrupamento: Agrupamento,
        periodo: ParamsPeriodo,
    ) -> Result<RelatorioMovimentos, AppError> {
        let movimentos = self
            .movimentacao_repo
            .listar_por_tipo(tipo, categoria.as_deref(), conta.as_deref(), &periodo)
            .await?;

        let total: Decimal = movimentos.iter().map(|m| m.valor).sum();
        let quantidade = movimentos.len() as i64;
        let media = if quantidade > 0 {
            total / Decimal::from(quantidade)
        } else {
            Decimal::ZERO
        };

        Ok(RelatorioMovimentos {
            resumo: ResumoMovimentos {
                total,
                media,
                quantidade_transacoes: quantidade,
            },
            por_categoria: totais_por_categoria(&movimentos),
            agrupados: agrupar_por_periodo(&movimentos, agrupamento),
            detalhes: movimentos,
        })
    }

    pub async fn relatorio_contribuicoes(
        &self,
        status: Option<StatusContribuicao>,
        tipo: Option<String>,
        periodo: ParamsPeriodo,
    ) -> Result<RelatorioContribuicoes, AppError> {
        let detalhes = self
            .contribuicao_repo
            .listar_para_relatorio(status, tipo.as_deref(), &periodo)
            .await?;

        Ok(montar_relatorio_contribuicoes(detalhes))
    }

    /// Extrapolação linear: média mensal histórica projetada N meses à
    /// frente, somada às contribuições esperadas dos assistidos ativos.
    pub async fn projecao_financeira(&self, meses: u32) -> Result<ProjecaoFinanceira, AppError> {
        let meses = meses.clamp(1, 60);
        let hoje = Utc::now().date_naive();
        let (ano_inicio, mes_inicio) = somar_meses(hoje.year(), hoje.month(), -(meses as i32));
        let desde = NaiveDate::from_ymd_opt(ano_inicio, mes_inicio, 1).expect("mês válido");

        let historico_receitas = self
            .movimentacao_repo
            .totais_mensais(TipoMovimentacao::Entrada, desde)
            .await?;
        let historico_despesas = self
            .movimentacao_repo
            .totais_mensais(TipoMovimentacao::Saida, desde)
            .await?;
        let contribuicoes_esperadas = self.assistido_repo.soma_valor_mensal_ativos().await?;

        let receita_media = media_mensal(&historico_receitas);
        let despesa_media = media_mensal(&historico_despesas);

        let mut projecoes = Vec::with_capacity(meses as usize);
        for i in 1..=meses {
            let (ano, mes) = somar_meses(hoje.year(), hoje.month(), i as i32);
            projecoes.push(ProjecaoMes {
                mes: format!("{} de {}", NOMES_MESES[(mes - 1) as usize], ano),
                data: format!("{:04}-{:02}", ano, mes),
                receita_projetada: receita_media,
                despesa_projetada: despesa_media,
                contribuicoes_esperadas,
                saldo_projetado: receita_media - despesa_media,
            });
        }

        Ok(ProjecaoFinanceira {
            base_dados: BaseProjecao {
                periodo_base: format!("{} meses", meses),
                receita_media_mensal: receita_media,
                despesa_media_mensal: despesa_media,
                contribuicoes_esperadas_mes: contribuicoes_esperadas,
            },
            projecoes,
        })
    }

    pub async fn comparativo_mensal(&self, ano: i32) -> Result<ComparativoMensal, AppError> {
        let receitas = self
            .movimentacao_repo
            .totais_por_mes_do_ano(TipoMovimentacao::Entrada, ano)
            .await?;
        let despesas = self
            .movimentacao_repo
            .totais_por_mes_do_ano(TipoMovimentacao::Saida, ano)
            .await?;
        let contribuicoes = self.relatorio_repo.contribuicoes_pagas_por_mes(ano).await?;

        let mut comparativo = Vec::with_capacity(12);
        let mut totais = TotaisAnuais {
            receitas: Decimal::ZERO,
            despesas: Decimal::ZERO,
            contribuicoes: Decimal::ZERO,
            saldo: Decimal::ZERO,
        };

        for mes in 1..=12u32 {
            let receita = lado_do_mes(&receitas, mes);
            let despesa = lado_do_mes(&despesas, mes);
            let contribuicao = lado_do_mes(&contribuicoes, mes);
            let saldo = receita.valor - despesa.valor;

            totais.receitas += receita.valor;
            totais.despesas += despesa.valor;
            totais.contribuicoes += contribuicao.valor;
            totais.saldo += saldo;

            comparativo.push(ComparativoMes {
                mes,
                nome_mes: NOMES_MESES[(mes - 1) as usize].to_string(),
                receitas: receita,
                despesas: despesa,
                contribuicoes: contribuicao,
                saldo,
            });
        }

        Ok(ComparativoMensal {
            ano,
            comparativo,
            totais_anuais: totais,
        })
    }

    /// Resumo por período nomeado (hoje/semana/mes/ano) ou por intervalo
    /// explícito.
    pub async fn resumo_financeiro(
        &self,
        periodo_nomeado: Option<String>,
        explicito: ParamsPeriodo,
    ) -> Result<(String, ParamsPeriodo, DashboardGeral), AppError> {
        let hoje = Utc::now().date_naive();
        let periodo = match periodo_nomeado.as_deref() {
            Some(nome) => intervalo_do_periodo(nome, hoje)
                .ok_or_else(|| AppError::Invalido("Período inválido".to_string()))?,
            None => explicito,
        };

        let dashboard = self.dashboard_geral(periodo).await?;
        Ok((
            periodo_nomeado.unwrap_or_else(|| "personalizado".to_string()),
            periodo,
            dashboard,
        ))
    }

    /// Métricas dos últimos 30 dias.
    pub async fn metricas_chave(&self) -> Result<MetricasChave, AppError> {
        let hoje = Utc::now().date_naive();
        let periodo = ParamsPeriodo {
            start_date: hoje.checked_sub_days(chrono::Days::new(30)),
            end_date: Some(hoje),
        };

        let dashboard = self.dashboard_geral(periodo).await?;

        let total_contribuicoes = dashboard.contribuicoes.total;
        let ticket_medio = if total_contribuicoes > 0 {
            dashboard.contribuicoes.valor_total_pago / Decimal::from(total_contribuicoes)
        } else {
            Decimal::ZERO
        };
        let eficiencia = if dashboard.resumo_financeiro.total_receitas > Decimal::ZERO {
            format!(
                "{:.2}",
                dashboard.contribuicoes.valor_total_pago * Decimal::from(100)
                    / dashboard.resumo_financeiro.total_receitas
            )
        } else {
            "0.00".to_string()
        };

        Ok(MetricasChave {
            periodo: "Últimos 30 dias".to_string(),
            saldo_liquido: dashboard.resumo_financeiro.saldo_liquido,
            total_receitas: dashboard.resumo_financeiro.total_receitas,
            total_despesas: dashboard.resumo_financeiro.total_despesas,
            taxa_adimplencia: dashboard.contribuicoes.taxa_adimplencia.clone(),
            ticket_medio_contribuicao: ticket_medio,
            eficiencia_arrecadacao: eficiencia,
            pessoas_ativas: dashboard.pessoas.voluntarios_ativos
                + dashboard.pessoas.assistidos_ativos,
        })
    }

    pub async fn relatorio_completo(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<RelatorioCompleto, AppError> {
        let dashboard = self.dashboard_geral(periodo).await?;
        let receitas = self
            .relatorio_receitas(None, None, Agrupamento::Mes, periodo)
            .await?;
        let despesas = self
            .relatorio_despesas(None, None, Agrupamento::Mes, periodo)
            .await?;
        let contribuicoes = self.relatorio_contribuicoes(None, None, periodo).await?;

        Ok(RelatorioCompleto {
            dashboard,
            receitas,
            despesas,
            contribuicoes,
            periodo: PeriodoRelatorio {
                inicio: periodo.start_date,
                fim: periodo.end_date,
            },
        })
    }
}

/// Agrupa movimentos pela chave temporal pedida, em ordem crescente.
fn agrupar_por_periodo(movimentos: &[Movimentacao], agrupamento: Agrupamento) -> Vec<PeriodoResumo> {
    let mut grupos: std::collections::BTreeMap<String, (Decimal, i64)> = Default::default();

    for movimento in movimentos {
        let chave = match agrupamento {
            Agrupamento::Dia => movimento.data.format("%Y-%m-%d").to_string(),
            Agrupamento::Mes => movimento.data.format("%Y-%m").to_string(),
            Agrupamento::Ano => movimento.data.format("%Y").to_string(),
        };
        let entrada = grupos.entry(chave).or_insert((Decimal::ZERO, 0));
        entrada.0 += movimento.valor;
        entrada.1 += 1;
    }

    grupos
        .into_iter()
        .map(|(periodo, (valor, quantidade))| PeriodoResumo {
            periodo,
            valor,
            quantidade,
        })
        .collect()
}

fn totais_por_categoria(movimentos: &[Movimentacao]) -> Vec<CategoriaTotal> {
    let mut grupos: std::collections::BTreeMap<String, (Decimal, i64)> = Default::default();

    for movimento in movimentos {
        let entrada = grupos
            .entry(movimento.categoria.clone())
            .or_insert((Decimal::ZERO, 0));
        entrada.0 += movimento.valor;
        entrada.1 += 1;
    }

    let mut categorias: Vec<CategoriaTotal> = grupos
        .into_iter()
        .map(|(categoria, (total, quantidade))| CategoriaTotal {
            categoria,
            total,
            quantidade,
        })
        .collect();
    categorias.sort_by(|a, b| b.total.cmp(&a.total));
    categorias
}

fn montar_relatorio_contribuicoes(
    detalhes: Vec<ContribuicaoDetalhada>,
) -> RelatorioContribuicoes {
    let total_contribuicoes = detalhes.len() as i64;
    let valor_total: Decimal = detalhes.iter().map(|c| c.contribuicao.valor).sum();
    let valor_pago: Decimal = detalhes
        .iter()
        .filter(|c| c.contribuicao.status == StatusContribuicao::Pago)
        .map(|c| c.contribuicao.valor)
        .sum();
    let valor_pendente: Decimal = detalhes
        .iter()
        .filter(|c| {
            matches!(
                c.contribuicao.status,
                StatusContribuicao::Pendente | StatusContribuicao::Atrasado
            )
        })
        .map(|c| c.contribuicao.valor)
        .sum();
    let pagas = detalhes
        .iter()
        .filter(|c| c.contribuicao.status == StatusContribuicao::Pago)
        .count() as i64;

    let mut por_status: std::collections::BTreeMap<String, (i64, Decimal)> = Default::default();
    for contrib in &detalhes {
        let chave = match contrib.contribuicao.status {
            StatusContribuicao::Pendente => "pendente",
            StatusContribuicao::Pago => "pago",
            StatusContribuicao::Atrasado => "atrasado",
            StatusContribuicao::Cancelado => "cancelado",
        };
        let entrada = por_status
            .entry(chave.to_string())
            .or_insert((0, Decimal::ZERO));
        entrada.0 += 1;
        entrada.1 += contrib.contribuicao.valor;
    }

    let mut por_tipo: Vec<TipoPessoaTotal> = Vec::new();
    for tipo in ["voluntario", "assistido"] {
        let do_tipo: Vec<&ContribuicaoDetalhada> = detalhes
            .iter()
            .filter(|c| c.tipo_pessoa == tipo)
            .collect();
        por_tipo.push(TipoPessoaTotal {
            tipo: tipo.to_string(),
            quantidade: do_tipo.len() as i64,
            valor: do_tipo.iter().map(|c| c.contribuicao.valor).sum(),
        });
    }

    RelatorioContribuicoes {
        resumo: ResumoRelatorioContribuicoes {
            total_contribuicoes,
            valor_total,
            valor_pago,
            valor_pendente,
            taxa_adimplencia: formatar_percentual(pagas, total_contribuicoes),
        },
        por_status: por_status
            .into_iter()
            .map(|(status, (quantidade, valor))| StatusTotal {
                status,
                quantidade,
                valor,
            })
            .collect(),
        por_tipo,
        detalhes,
    }
}

/// Média simples das somas mensais; zero quando não há histórico.
fn media_mensal(historico: &[TotalMensal]) -> Decimal {
    if historico.is_empty() {
        return Decimal::ZERO;
    }
    let soma: Decimal = historico.iter().map(|t| t.total).sum();
    soma / Decimal::from(historico.len() as i64)
}

/// Aritmética de meses sem depender do dia (resultado sempre é (ano, mes)).
fn somar_meses(ano: i32, mes: u32, delta: i32) -> (i32, u32) {
    let total = ano * 12 + (mes as i32 - 1) + delta;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

fn lado_do_mes(linhas: &[(i32, Decimal, i64)], mes: u32) -> LadoComparativo {
    linhas
        .iter()
        .find(|(m, _, _)| *m == mes as i32)
        .map(|(_, total, quantidade)| LadoComparativo {
            valor: *total,
            quantidade: *quantidade,
        })
        .unwrap_or(LadoComparativo {
            valor: Decimal::ZERO,
            quantidade: 0,
        })
}

/// Intervalo de datas dos períodos nomeados do resumo financeiro.
fn intervalo_do_periodo(nome: &str, hoje: NaiveDate) -> Option<ParamsPeriodo> {
    let inicio = match nome {
        "hoje" => hoje,
        // semana iniciando no domingo
        "semana" => hoje - chrono::Days::new(u64::from(hoje.weekday().num_days_from_sunday())),
        "mes" => NaiveDate::from_ymd_opt(hoje.year(), hoje.month(), 1)?,
        "ano" => NaiveDate::from_ymd_opt(hoje.year(), 1, 1)?,
        _ => return None,
    };
    Some(ParamsPeriodo {
        start_date: Some(inicio),
        end_date: Some(hoje),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn movimento(data: NaiveDate, valor: i64, categoria: &str) -> Movimentacao {
        let agora = Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap();
        Movimentacao {
            id: Uuid::new_v4(),
            data,
            descricao: "Lançamento".to_string(),
            valor: Decimal::new(valor, 2),
            tipo: TipoMovimentacao::Entrada,
            categoria: categoria.to_string(),
            conta: "Conta Principal".to_string(),
            centro_de_custo: None,
            favorecido_pagador: None,
            contribuicao_id: None,
            observacoes: None,
            criado_em: agora,
            atualizado_em: agora,
        }
    }

    #[test]
    fn agrupamento_mensal_soma_e_conta() {
        let movimentos = vec![
            movimento(NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(), 10000, "Doações"),
            movimento(NaiveDate::from_ymd_opt(2024, 10, 20).unwrap(), 5000, "Doações"),
            movimento(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap(), 2500, "Doações"),
        ];

        let agrupados = agrupar_por_periodo(&movimentos, Agrupamento::Mes);
        assert_eq!(
            agrupados,
            vec![
                PeriodoResumo {
                    periodo: "2024-10".to_string(),
                    valor: Decimal::new(15000, 2),
                    quantidade: 2,
                },
                PeriodoResumo {
                    periodo: "2024-11".to_string(),
                    valor: Decimal::new(2500, 2),
                    quantidade: 1,
                },
            ]
        );
    }

    #[test]
    fn agrupamento_anual_usa_ano_como_chave() {
        let movimentos = vec![
            movimento(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), 100, "A"),
            movimento(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 200, "A"),
        ];
        let agrupados = agrupar_por_periodo(&movimentos, Agrupamento::Ano);
        assert_eq!(agrupados[0].periodo, "2023");
        assert_eq!(agrupados[1].periodo, "2024");
    }

    #[test]
    fn categorias_ordenadas_por_total_decrescente() {
        let movimentos = vec![
            movimento(NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(), 1000, "Aluguel"),
            movimento(NaiveDate::from_ymd_opt(2024, 10, 6).unwrap(), 9000, "Doações"),
        ];

        let categorias = totais_por_categoria(&movimentos);
        assert_eq!(categorias[0].categoria, "Doações");
        assert_eq!(categorias[1].categoria, "Aluguel");
    }

    #[test]
    fn media_mensal_divide_pelo_numero_de_meses() {
        let historico = vec![
            TotalMensal {
                mes: "2024-09".to_string(),
                total: Decimal::new(10000, 2),
            },
            TotalMensal {
                mes: "2024-10".to_string(),
                total: Decimal::new(20000, 2),
            },
        ];
        assert_eq!(media_mensal(&historico), Decimal::new(15000, 2));
        assert_eq!(media_mensal(&[]), Decimal::ZERO);
    }

    #[test]
    fn soma_de_meses_atravessa_anos() {
        assert_eq!(somar_meses(2024, 11, 1), (2024, 12));
        assert_eq!(somar_meses(2024, 11, 2), (2025, 1));
        assert_eq!(somar_meses(2024, 11, 14), (2026, 1));
        assert_eq!(somar_meses(2024, 1, -1), (2023, 12));
    }

    #[test]
    fn periodos_nomeados_calculam_o_intervalo() {
        // 2024-11-20 foi uma quarta-feira
        let hoje = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();

        let hoje_p = intervalo_do_periodo("hoje", hoje).unwrap();
        assert_eq!(hoje_p.start_date, Some(hoje));

        let semana = intervalo_do_periodo("semana", hoje).unwrap();
        assert_eq!(
            semana.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 11, 17).unwrap())
        );

        let mes = intervalo_do_periodo("mes", hoje).unwrap();
        assert_eq!(
            mes.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 11, 1).unwrap())
        );

        let ano = intervalo_do_periodo("ano", hoje).unwrap();
        assert_eq!(
            ano.start_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );

        assert!(intervalo_do_periodo("trimestre", hoje).is_none());
    }
}
