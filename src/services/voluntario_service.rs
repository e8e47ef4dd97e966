use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{Paginado, ParamsPaginacao},
    db::{ContribuicaoRepository, SedeRepository, VoluntarioRepository},
    models::voluntario::{
        AtualizarVoluntario, CriarVoluntario, EstatisticasVoluntarios, FiltroVoluntario,
        StatusPessoa, Voluntario, VoluntarioComSede,
    },
};

#[derive(Clone)]
pub struct VoluntarioService {
    repo: VoluntarioRepository,
    sede_repo: SedeRepository,
    contribuicao_repo: ContribuicaoRepository,
}

impl VoluntarioService {
    pub fn new(
        repo: VoluntarioRepository,
        sede_repo: SedeRepository,
        contribuicao_repo: ContribuicaoRepository,
    ) -> Self {
        Self {
            repo,
            sede_repo,
            contribuicao_repo,
        }
    }

    pub async fn criar(&self, dados: CriarVoluntario) -> Result<Voluntario, AppError> {
        self.sede_repo
            .buscar_por_id(dados.sede_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        if self.repo.existe_email(&dados.email, None).await? {
            return Err(AppError::Conflito("Email já cadastrado".to_string()));
        }
        if let Some(cpf) = &dados.cpf {
            if self.repo.existe_cpf(cpf, None).await? {
                return Err(AppError::Conflito("CPF já cadastrado".to_string()));
            }
        }

        // O hash roda fora do executor async para não travar o event loop.
        let senha_hash = match dados.senha.clone() {
            Some(senha) => Some(
                tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??,
            ),
            None => None,
        };

        self.repo.criar(&dados, senha_hash).await
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> Result<Voluntario, AppError> {
        self.repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Voluntário não encontrado".to_string()))
    }

    pub async fn listar(
        &self,
        filtro: FiltroVoluntario,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<VoluntarioComSede>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (voluntarios, total) = self.repo.listar(&filtro, &paginacao).await?;
        Ok(Paginado::novo(voluntarios, page, limit, total))
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        dados: AtualizarVoluntario,
    ) -> Result<Voluntario, AppError> {
        let existente = self.buscar_por_id(id).await?;

        if let Some(email) = &dados.email {
            if *email != existente.email && self.repo.existe_email(email, Some(id)).await? {
                return Err(AppError::Conflito("Email já cadastrado".to_string()));
            }
        }
        if let Some(cpf) = &dados.cpf {
            if existente.cpf.as_deref() != Some(cpf) && self.repo.existe_cpf(cpf, Some(id)).await? {
                return Err(AppError::Conflito("CPF já cadastrado".to_string()));
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
    ) -> Result<Voluntario, AppError> {
        self.buscar_por_id(id).await?;
        self.repo.atualizar_status(id, status).await
    }

    /// Voluntário com contribuições pendentes ou pagas não pode ser
    /// removido do cadastro.
    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        self.buscar_por_id(id).await?;

        let ativas = self.contribuicao_repo.contar_ativas_por_voluntario(id).await?;
        if ativas > 0 {
            return Err(AppError::Conflito(
                "Não é possível excluir voluntário com contribuições ativas".to_string(),
            ));
        }

        self.repo.excluir(id).await
    }

    pub async fn estatisticas(&self) -> Result<EstatisticasVoluntarios, AppError> {
        self.repo.estatisticas().await
    }
}
