use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao},
    db::SedeRepository,
    models::sede::{
        AtualizarSede, CriarSede, EstatisticasSedes, FiltroSede, Sede, SedeComContadores,
        SedeResumida,
    },
};

#[derive(Clone)]
pub struct SedeService {
    repo: SedeRepository,
}

impl SedeService {
    pub fn new(repo: SedeRepository) -> Self {
        Self { repo }
    }

    pub async fn criar(&self, dados: CriarSede) -> Result<Sede, AppError> {
        if self.repo.buscar_por_nome(&dados.nome).await?.is_some() {
            return Err(AppError::Conflito(
                "Já existe uma sede com este nome".to_string(),
            ));
        }
        self.repo.criar(&dados).await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<SedeComContadores, AppError> {
        self.repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))
    }

    pub async fn listar(
        &self,
        filtro: FiltroSede,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<SedeComContadores>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (sedes, total) = self.repo.listar(&filtro, &paginacao).await?;
        Ok(Paginado::novo(sedes, page, limit, total))
    }

    pub async fn atualizar(&self, id: Uuid, dados: AtualizarSede) -> Result<Sede, AppError> {
        let existente = self.buscar_por_id(id).await?;

        if let Some(nome) = &dados.nome {
            if *nome != existente.sede.nome && self.repo.buscar_por_nome(nome).await?.is_some() {
                return Err(AppError::Conflito(
                    "Já existe uma sede com este nome".to_string(),
                ));
            }
        }

        self.repo.atualizar(id, &dados).await
    }

    /// A sede só sai do cadastro quando não resta ninguém vinculado a ela.
    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar_por_id(id).await?;

        let (voluntarios, assistidos) = self.repo.contar_dependentes(id).await?;
        if voluntarios > 0 || assistidos > 0 {
            return Err(AppError::Conflito(format!(
                "Sede possui {} voluntários e {} assistidos. \
                 Transfira-os para outras sedes antes de excluir.",
                voluntarios, assistidos
            )));
        }

        self.repo.excluir(id).await
    }

    pub async fn alternar_status(&self, id: Uuid) -> Result<Sede, AppError> {
        let sede = self.buscar_por_id(id).await?;
        self.repo.alternar_status(id, !sede.sede.ativo).await
    }

    pub async fn listar_ativas(&self) -> Result<Vec<SedeResumida>, AppError> {
        self.repo.listar_ativas().await
    }

    pub async fn estatisticas(&self) -> Result<EstatisticasSedes, AppError> {
        self.repo.estatisticas().await
    }
}
