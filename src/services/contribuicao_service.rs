use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao, ParamsPeriodo},
    db::{
        AssistidoRepository, ContribuicaoRepository, MovimentacaoRepository, NotaFiscalRepository,
        VoluntarioRepository,
    },
    models::contribuicao::{
        AtualizarContribuicao, ContribuicaoAtrasadaResumo, ContribuicaoDetalhada,
        CriarContribuicao, DadosPagamento, EstatisticasContribuicoes, FiltroContribuicao,
        InadimplenciaPessoa, ResultadoGeracaoMensal, StatusContribuicao,
    },
    models::movimentacao::{CriarMovimentacao, TipoMovimentacao},
};

#[derive(Clone)]
pub struct ContribuicaoService {
    repo: ContribuicaoRepository,
    voluntario_repo: VoluntarioRepository,
    assistido_repo: AssistidoRepository,
    movimentacao_repo: MovimentacaoRepository,
    nota_fiscal_repo: NotaFiscalRepository,
    pool: PgPool, // para as transações de pagamento
}

impl ContribuicaoService {
    pub fn new(
        repo: ContribuicaoRepository,
        voluntario_repo: VoluntarioRepository,
        assistido_repo: AssistidoRepository,
        movimentacao_repo: MovimentacaoRepository,
        nota_fiscal_repo: NotaFiscalRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            voluntario_repo,
            assistido_repo,
            movimentacao_repo,
            nota_fiscal_repo,
            pool,
        }
    }

    /// Cria uma contribuição para exatamente uma pessoa (voluntário OU
    /// assistido). Nasce `pendente`.
    pub async fn criar(&self, dados: CriarContribuicao) -> Result<ContribuicaoDetalhada, AppError> {
        match (dados.voluntario_id, dados.assistido_id) {
            (None, None) => {
                return Err(AppError::Invalido(
                    "Deve ser informado voluntário ou assistido".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(AppError::Invalido(
                    "Não pode informar voluntário e assistido ao mesmo tempo".to_string(),
                ));
            }
            _ => {}
        }

        if let Some(id) = dados.voluntario_id {
            self.voluntario_repo
                .buscar_por_id(id)
                .await?
                .ok_or_else(|| AppError::NaoEncontrado("Voluntário não encontrado".to_string()))?;
        }
        if let Some(id) = dados.assistido_id {
            self.assistido_repo
                .buscar_por_id(id)
                .await?
                .ok_or_else(|| AppError::NaoEncontrado("Assistido não encontrado".to_string()))?;
        }

        let contribuicao = self.repo.criar(&dados).await?;
        self.detalhada(contribuicao.id).await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<ContribuicaoDetalhada, AppError> {
        self.detalhada(id).await
    }

    pub async fn listar(
        &self,
        filtro: FiltroContribuicao,
        periodo: ParamsPeriodo,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<ContribuicaoDetalhada>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (contribuicoes, total) = self.repo.listar(&filtro, &periodo, &paginacao).await?;
        Ok(Paginado::novo(contribuicoes, page, limit, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizarContribuicao,
    ) -> Result<ContribuicaoDetalhada, AppError> {
        self.repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Contribuição não encontrada".to_string()))?;

        self.repo.atualizar(id, &dados).await?;
        self.detalhada(id).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Contribuição não encontrada".to_string()))?;

        if self.nota_fiscal_repo.existe_para_contribuicao(id).await? {
            return Err(AppError::Conflito(
                "Não é possível excluir contribuição com nota fiscal emitida".to_string(),
            ));
        }

        self.repo.excluir(id).await
    }

    /// Liquida a contribuição e, salvo ordem explícita em contrário,
    /// lança a entrada correspondente no caixa na mesma transação.
    pub async fn processar_pagamento(
        &self,
        id: Uuid,
        dados: DadosPagamento,
    ) -> Result<ContribuicaoDetalhada, AppError> {
        let contribuicao = self.detalhada(id).await?;

        if contribuicao.contribuicao.status == StatusContribuicao::Pago {
            return Err(AppError::Conflito("Contribuição já foi paga".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        self.repo.registrar_pagamento(&mut *tx, id, &dados).await?;

        if dados.criar_movimentacao {
            let categoria = match contribuicao.tipo_pessoa.as_str() {
                "voluntario" => "Contribuições Voluntários",
                _ => "Contribuições Assistidos",
            };
            let movimentacao = CriarMovimentacao {
                data: dados.data_pagamento,
                descricao: format!("Contribuição recebida - {}", contribuicao.pessoa_nome),
                valor: contribuicao.contribuicao.valor,
                tipo: TipoMovimentacao::Entrada,
                categoria: categoria.to_string(),
                conta: "Conta Principal".to_string(),
                centro_de_custo: None,
                favorecido_pagador: Some(contribuicao.pessoa_nome.clone()),
                contribuicao_id: Some(id),
                observacoes: Some(format!(
                    "Pagamento da contribuição vencimento {}",
                    contribuicao.contribuicao.data_vencimento.format("%d/%m/%Y")
                )),
            };
            self.movimentacao_repo
                .criar_com(&mut *tx, &movimentacao)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            contribuicao = %id,
            valor = %contribuicao.contribuicao.valor,
            "pagamento processado"
        );

        self.detalhada(id).await
    }

    /// Gera as contribuições `pendente` do mês para todos os assistidos
    /// ativos. Idempotente: quem já tem contribuição no mês é pulado.
    pub async fn gerar_contribuicoes_mensais(
        &self,
        ano: i32,
        mes: u32,
    ) -> Result<ResultadoGeracaoMensal, AppError> {
        if !(1..=12).contains(&mes) {
            return Err(AppError::Invalido("Mês deve estar entre 1 e 12".to_string()));
        }
        let ano_atual = Utc::now().year();
        if ano < ano_atual - 1 || ano > ano_atual + 1 {
            return Err(AppError::Invalido(
                "Ano deve estar entre o ano passado e próximo ano".to_string(),
            ));
        }

        let assistidos = self.assistido_repo.listar_ativos().await?;
        if assistidos.is_empty() {
            return Err(AppError::Invalido(
                "Nenhum assistido ativo encontrado".to_string(),
            ));
        }

        let (inicio, fim_exclusivo) = intervalo_mes(ano, mes);
        let mut criadas = Vec::new();

        for assistido in assistidos {
            let ja_existe = self
                .repo
                .existe_no_mes(assistido.id, inicio, fim_exclusivo)
                .await?;
            if ja_existe {
                continue;
            }

            let vencimento = data_vencimento_no_mes(ano, mes, assistido.dia_vencimento as u32);
            let contribuicao = self
                .repo
                .criar_pendente_para_assistido(assistido.id, assistido.valor_mensal, vencimento)
                .await?;
            criadas.push(contribuicao);
        }

        tracing::info!(ano, mes, total = criadas.len(), "contribuições mensais geradas");

        Ok(ResultadoGeracaoMensal {
            total: criadas.len(),
            contribuicoes: criadas,
        })
    }

    /// Marca como `atrasado` toda pendente já vencida. Idempotente.
    pub async fn marcar_atrasadas(&self) -> Result<u64, AppError> {
        let total = self.repo.marcar_atrasadas().await?;
        tracing::info!(total, "contribuições marcadas como atrasadas");
        Ok(total)
    }

    pub async fn pendentes(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        self.repo.listar_pendentes(&periodo).await
    }

    pub async fn atrasadas(&self) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        self.repo.listar_atrasadas().await
    }

    pub async fn do_mes(
        &self,
        ano: i32,
        mes: u32,
    ) -> Result<Vec<ContribuicaoDetalhada>, AppError> {
        if !(1..=12).contains(&mes) {
            return Err(AppError::Invalido("Mês deve estar entre 1 e 12".to_string()));
        }
        let (inicio, fim_exclusivo) = intervalo_mes(ano, mes);
        self.repo
            .listar_por_mes(inicio, fim_exclusivo.pred_opt().unwrap_or(fim_exclusivo))
            .await
    }

    pub async fn estatisticas(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<EstatisticasContribuicoes, AppError> {
        let contagens = self.repo.contagens(&periodo).await?;
        Ok(montar_estatisticas(contagens))
    }

    /// Agrupa as contribuições vencidas por pessoa, somando o devido e
    /// rastreando o maior atraso, ordenado do maior devedor para o menor.
    pub async fn relatorio_inadimplencia(&self) -> Result<Vec<InadimplenciaPessoa>, AppError> {
        let atrasadas = self.repo.listar_atrasadas().await?;
        let hoje = Utc::now().date_naive();
        Ok(agrupar_inadimplencia(atrasadas, hoje))
    }

    async fn detalhada(&self, id: Uuid) -> Result<ContribuicaoDetalhada, AppError> {
        self.repo
            .buscar_detalhada_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Contribuição não encontrada".to_string()))
    }
}

/// Percentual `parte/total` com duas casas, como string ("60.00").
pub fn formatar_percentual(parte: i64, total: i64) -> String {
    if total == 0 {
        return "0.00".to_string();
    }
    let taxa = Decimal::from(parte) * Decimal::from(100) / Decimal::from(total);
    format!("{:.2}", taxa)
}

pub fn montar_estatisticas(
    (total, pendentes, pagas, atrasadas, canceladas, valor_pago, valor_pendente): (
        i64,
        i64,
        i64,
        i64,
        i64,
        Decimal,
        Decimal,
    ),
) -> EstatisticasContribuicoes {
    EstatisticasContribuicoes {
        total,
        pendentes,
        pagas,
        atrasadas,
        canceladas,
        valor_total_pago: valor_pago,
        valor_total_pendente: valor_pendente,
        taxa_adimplencia: formatar_percentual(pagas, total),
    }
}

/// Vencimento no mês pedido, com o dia ajustado para o último dia do mês
/// quando o dia configurado não existe (ex.: 31 em novembro).
pub fn data_vencimento_no_mes(ano: i32, mes: u32, dia: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(ano, mes, dia)
        .unwrap_or_else(|| intervalo_mes(ano, mes).1.pred_opt().expect("mês sem dias"))
}

/// (primeiro dia do mês, primeiro dia do mês seguinte).
pub fn intervalo_mes(ano: i32, mes: u32) -> (NaiveDate, NaiveDate) {
    let inicio = NaiveDate::from_ymd_opt(ano, mes, 1).expect("mês válido");
    let fim_exclusivo = if mes == 12 {
        NaiveDate::from_ymd_opt(ano + 1, 1, 1).expect("janeiro")
    } else {
        NaiveDate::from_ymd_opt(ano, mes + 1, 1).expect("mês válido")
    };
    (inicio, fim_exclusivo)
}

fn agrupar_inadimplencia(
    atrasadas: Vec<ContribuicaoDetalhada>,
    hoje: NaiveDate,
) -> Vec<InadimplenciaPessoa> {
    let mut por_pessoa: Vec<InadimplenciaPessoa> = Vec::new();

    for contrib in atrasadas {
        let pessoa_id = contrib
            .contribuicao
            .voluntario_id
            .or(contrib.contribuicao.assistido_id)
            .expect("contribuição sem pessoa");
        let dias_atraso = (hoje - contrib.contribuicao.data_vencimento).num_days().max(0);

        let resumo = ContribuicaoAtrasadaResumo {
            id: contrib.contribuicao.id,
            valor: contrib.contribuicao.valor,
            data_vencimento: contrib.contribuicao.data_vencimento,
            dias_atraso,
        };

        match por_pessoa.iter_mut().find(|p| {
            p.pessoa_id == pessoa_id && p.tipo_pessoa == contrib.tipo_pessoa
        }) {
            Some(entrada) => {
                entrada.valor_total += contrib.contribuicao.valor;
                entrada.dias_atraso = entrada.dias_atraso.max(dias_atraso);
                entrada.contribuicoes.push(resumo);
            }
            None => por_pessoa.push(InadimplenciaPessoa {
                pessoa_id,
                pessoa_nome: contrib.pessoa_nome,
                pessoa_email: contrib.pessoa_email,
                tipo_pessoa: contrib.tipo_pessoa,
                contribuicoes: vec![resumo],
                valor_total: contrib.contribuicao.valor,
                dias_atraso,
            }),
        }
    }

    por_pessoa.sort_by(|a, b| b.valor_total.cmp(&a.valor_total));
    por_pessoa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contribuicao::{Contribuicao, FormaPagamento};
    use chrono::TimeZone;

    fn contribuicao_atrasada(
        pessoa: Uuid,
        valor: i64,
        vencimento: NaiveDate,
    ) -> ContribuicaoDetalhada {
        let agora = Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap();
        ContribuicaoDetalhada {
            contribuicao: Contribuicao {
                id: Uuid::new_v4(),
                voluntario_id: None,
                assistido_id: Some(pessoa),
                valor: Decimal::new(valor, 2),
                data_vencimento: vencimento,
                data_pagamento: None,
                status: StatusContribuicao::Atrasado,
                forma_pagamento: None::<FormaPagamento>,
                comprovante: None,
                observacoes: None,
                criado_em: agora,
                atualizado_em: agora,
            },
            pessoa_nome: "Fulano".to_string(),
            pessoa_email: "fulano@example.com".to_string(),
            pessoa_telefone: None,
            tipo_pessoa: "assistido".to_string(),
        }
    }

    #[test]
    fn percentual_formatado_com_duas_casas() {
        assert_eq!(formatar_percentual(6, 10), "60.00");
        assert_eq!(formatar_percentual(1, 3), "33.33");
        assert_eq!(formatar_percentual(0, 0), "0.00");
        assert_eq!(formatar_percentual(10, 10), "100.00");
    }

    #[test]
    fn vencimento_usa_o_dia_configurado() {
        assert_eq!(
            data_vencimento_no_mes(2024, 11, 10),
            NaiveDate::from_ymd_opt(2024, 11, 10).unwrap()
        );
    }

    #[test]
    fn vencimento_ajusta_dia_inexistente_para_fim_do_mes() {
        assert_eq!(
            data_vencimento_no_mes(2024, 11, 31),
            NaiveDate::from_ymd_opt(2024, 11, 30).unwrap()
        );
        assert_eq!(
            data_vencimento_no_mes(2023, 2, 30),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }

    #[test]
    fn intervalo_cobre_virada_de_ano() {
        let (inicio, fim) = intervalo_mes(2024, 12);
        assert_eq!(inicio, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(fim, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn inadimplencia_agrupa_por_pessoa_e_ordena_por_valor() {
        let hoje = NaiveDate::from_ymd_opt(2024, 11, 20).unwrap();
        let devedor_grande = Uuid::new_v4();
        let devedor_pequeno = Uuid::new_v4();

        let linhas = vec![
            contribuicao_atrasada(devedor_pequeno, 5000, NaiveDate::from_ymd_opt(2024, 11, 10).unwrap()),
            contribuicao_atrasada(devedor_grande, 10000, NaiveDate::from_ymd_opt(2024, 10, 10).unwrap()),
            contribuicao_atrasada(devedor_grande, 10000, NaiveDate::from_ymd_opt(2024, 11, 10).unwrap()),
        ];

        let relatorio = agrupar_inadimplencia(linhas, hoje);

        assert_eq!(relatorio.len(), 2);
        assert_eq!(relatorio[0].pessoa_id, devedor_grande);
        assert_eq!(relatorio[0].valor_total, Decimal::new(20000, 2));
        assert_eq!(relatorio[0].contribuicoes.len(), 2);
        // maior atraso entre as duas contribuições (10/10 → 41 dias)
        assert_eq!(relatorio[0].dias_atraso, 41);
        assert_eq!(relatorio[1].valor_total, Decimal::new(5000, 2));
    }
}
