use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao, ParamsPeriodo},
    db::MovimentacaoRepository,
    models::movimentacao::{
        AtualizarMovimentacao, CriarMovimentacao, EstatisticasMovimentacoes, FiltroMovimentacao,
        Movimentacao, ResumoCategoria, ResumoConta, ResumoFinanceiro, TipoMovimentacao,
    },
};

#[derive(Clone)]
pub struct MovimentacaoService {
    repo: MovimentacaoRepository,
}

impl MovimentacaoService {
    pub fn new(repo: MovimentacaoRepository) -> Self {
        Self { repo }
    }

    pub async fn criar(&self, dados: CriarMovimentacao) -> Result<Movimentacao, AppError> {
        if dados.valor <= Decimal::ZERO {
            return Err(AppError::Invalido(
                "Valor deve ser maior que zero".to_string(),
            ));
        }
        self.repo.criar(&dados).await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Movimentacao, AppError> {
        self.repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Movimentação não encontrada".to_string()))
    }

    pub async fn listar(
        &self,
        filtro: FiltroMovimentacao,
        periodo: ParamsPeriodo,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<Movimentacao>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (movimentacoes, total) = self.repo.listar(&filtro, &periodo, &paginacao).await?;
        Ok(Paginado::novo(movimentacoes, page, limit, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizarMovimentacao,
    ) -> Result<Movimentacao, AppError> {
        self.buscar_por_id(id).await?;

        if let Some(valor) = dados.valor {
            if valor <= Decimal::ZERO {
                return Err(AppError::Invalido(
                    "Valor deve ser maior que zero".to_string(),
                ));
            }
        }

        self.repo.atualizar(id, &dados).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar_por_id(id).await?;
        self.repo.excluir(id).await
    }

    /// Entradas, saídas e saldo do período, opcionalmente restrito a uma conta.
    pub async fn resumo_financeiro(
        &self,
        conta: Option<String>,
        periodo: ParamsPeriodo,
    ) -> Result<ResumoFinanceiro, AppError> {
        let entradas = self
            .repo
            .totais_por_tipo(TipoMovimentacao::Entrada, conta.as_deref(), &periodo)
            .await?;
        let saidas = self
            .repo
            .totais_por_tipo(TipoMovimentacao::Saida, conta.as_deref(), &periodo)
            .await?;

        Ok(ResumoFinanceiro {
            conta: conta.unwrap_or_else(|| "Todas".to_string()),
            saldo: entradas.total - saidas.total,
            entradas,
            saidas,
        })
    }

    pub async fn relatorio_por_categoria(
        &self,
        tipo: Option<TipoMovimentacao>,
        periodo: ParamsPeriodo,
    ) -> Result<Vec<ResumoCategoria>, AppError> {
        self.repo.relatorio_por_categoria(tipo, &periodo).await
    }

    pub async fn relatorio_por_conta(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<Vec<ResumoConta>, AppError> {
        self.repo.relatorio_por_conta(&periodo).await
    }

    pub async fn categorias(&self) -> Result<Vec<String>, AppError> {
        self.repo.categorias().await
    }

    pub async fn contas(&self) -> Result<Vec<String>, AppError> {
        self.repo.contas().await
    }

    pub async fn estatisticas(
        &self,
        periodo: ParamsPeriodo,
    ) -> Result<EstatisticasMovimentacoes, AppError> {
        let total = self.repo.contar(&periodo).await?;
        let entradas = self
            .repo
            .totais_por_tipo(TipoMovimentacao::Entrada, None, &periodo)
            .await?;
        let saidas = self
            .repo
            .totais_por_tipo(TipoMovimentacao::Saida, None, &periodo)
            .await?;
        let ultimas_movimentacoes = self.repo.recentes(&periodo, 5).await?;

        Ok(EstatisticasMovimentacoes {
            total,
            saldo_total: entradas.total - saidas.total,
            entradas,
            saidas,
            ultimas_movimentacoes,
        })
    }
}
