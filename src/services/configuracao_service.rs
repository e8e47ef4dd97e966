use crate::{
    common::error::AppError,
    db::ConfiguracaoRepository,
    models::configuracao::{Configuracao, DefinirConfiguracao},
};

#[derive(Clone)]
pub struct ConfiguracaoService {
    repo: ConfiguracaoRepository,
}

impl ConfiguracaoService {
    pub fn new(repo: ConfiguracaoRepository) -> Self {
        Self { repo }
    }

    pub async fn obter(&self, chave: &str) -> Result<Configuracao, AppError> {
        self.repo
            .buscar_por_chave(chave)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Configuração não encontrada".to_string()))
    }

    pub async fn obter_ou(&self, chave: &str, padrao: &str) -> Result<String, AppError> {
        Ok(self
            .repo
            .buscar_por_chave(chave)
            .await?
            .map(|c| c.valor)
            .unwrap_or_else(|| padrao.to_string()))
    }

    pub async fn definir(&self, dados: DefinirConfiguracao) -> Result<Configuracao, AppError> {
        self.repo.definir(&dados).await
    }

    pub async fn listar(&self) -> Result<Vec<Configuracao>, AppError> {
        self.repo.listar().await
    }
}
