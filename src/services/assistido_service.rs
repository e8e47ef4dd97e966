use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao},
    db::{AssistidoRepository, SedeRepository},
    models::assistido::{
        Assistido, AssistidoComSede, AtualizarAssistido, CriarAssistido, EstatisticasAssistidos,
        FiltroAssistido,
    },
    models::voluntario::StatusPessoa,
};

#[derive(Clone)]
pub struct AssistidoService {
    repo: AssistidoRepository,
    sede_repo: SedeRepository,
}

impl AssistidoService {
    pub fn new(repo: AssistidoRepository, sede_repo: SedeRepository) -> Self {
        Self { repo, sede_repo }
    }

    pub async fn criar(&self, dados: CriarAssistido) -> Result<Assistido, AppError> {
        self.sede_repo
            .buscar_por_id(dados.sede_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        if self.repo.existe_email(&dados.email, None).await? {
            return Err(AppError::Conflito("Email já cadastrado".to_string()));
        }

        self.repo.criar(&dados).await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Assistido, AppError> {
        self.repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Assistido não encontrado".to_string()))
    }

    pub async fn listar(
        &self,
        filtro: FiltroAssistido,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<AssistidoComSede>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (assistidos, total) = self.repo.listar(&filtro, &paginacao).await?;
        Ok(Paginado::novo(assistidos, page, limit, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizarAssistido,
    ) -> Result<Assistido, AppError> {
        let existente = self.buscar_por_id(id).await?;

        if let Some(email) = &dados.email {
            if *email != existente.email && self.repo.existe_email(email, Some(id)).await? {
                return Err(AppError::Conflito("Email já cadastrado".to_string()));
            }
        }
        if let Some(sede_id) = dados.sede_id {
            self.sede_repo
                .buscar_por_id(sede_id)
                .await?
                .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;
        }

        self.repo.atualizar(id, &dados).await
    }

    pub async fn atualizar_status(
        &self,
        id: Uuid,
        status: StatusPessoa,
    ) -> Result<Assistido, AppError> {
        self.buscar_por_id(id).await?;
        self.repo.atualizar_status(id, status).await
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar_por_id(id).await?;
        self.repo.excluir(id).await
    }

    pub async fn estatisticas(&self) -> Result<EstatisticasAssistidos, AppError> {
        self.repo.estatisticas().await
    }
}
