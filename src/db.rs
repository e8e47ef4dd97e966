pub mod assistido_repo;
pub use assistido_repo::AssistidoRepository;
pub mod configuracao_repo;
pub use configuracao_repo::ConfiguracaoRepository;
pub mod contribuicao_repo;
pub use contribuicao_repo::ContribuicaoRepository;
pub mod email_repo;
pub use email_repo::EmailRepository;
pub mod movimentacao_repo;
pub use movimentacao_repo::MovimentacaoRepository;
pub mod nota_fiscal_repo;
pub use nota_fiscal_repo::NotaFiscalRepository;
pub mod relatorio_repo;
pub use relatorio_repo::RelatorioRepository;
pub mod sede_repo;
pub use sede_repo::SedeRepository;
pub mod voluntario_repo;
pub use voluntario_repo::VoluntarioRepository;

/// Violação de índice único vinda do Postgres.
pub(crate) fn unique_violada(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
