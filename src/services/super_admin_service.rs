use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    common::paginacao::{LIMITE_MAXIMO, Paginado, ParamsPaginacao},
    db::{AssistidoRepository, SedeRepository, VoluntarioRepository},
    models::assistido::{AssistidoComSede, AtualizarAssistido, CriarAssistido, FiltroAssistido},
    models::relatorio::{DashboardSuperAdmin, TotaisPorStatus},
    models::sede::{AtualizarSede, CriarSede, FiltroSede, Sede, SedeComContadores},
    models::voluntario::{
        AtualizarVoluntario, CriarVoluntario, FiltroVoluntario, Voluntario, VoluntarioComSede,
    },
};

/// Operações entre sedes, restritas à camada super admin
/// (ver `middleware::rbac`).
#[derive(Clone)]
pub struct SuperAdminService {
    voluntario_repo: VoluntarioRepository,
    assistido_repo: AssistidoRepository,
    sede_repo: SedeRepository,
}

impl SuperAdminService {
    pub fn new(
        voluntario_repo: VoluntarioRepository,
        assistido_repo: AssistidoRepository,
        sede_repo: SedeRepository,
    ) -> Self {
        Self {
            voluntario_repo,
            assistido_repo,
            sede_repo,
        }
    }

    // ========== USUÁRIOS ==========

    pub async fn listar_usuarios(
        &self,
        filtro: FiltroVoluntario,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<VoluntarioComSede>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (usuarios, total) = self.voluntario_repo.listar(&filtro, &paginacao).await?;
        Ok(Paginado::novo(usuarios, page, limit, total))
    }

    pub async fn criar_usuario(&self, dados: CriarVoluntario) -> Result<Voluntario, AppError> {
        self.sede_repo
            .buscar_por_id(dados.sede_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        if self.voluntario_repo.existe_email(&dados.email, None).await? {
            return Err(AppError::Conflito("Email já cadastrado".to_string()));
        }

        let senha_hash = match dados.senha.clone() {
            Some(senha) => Some(
                tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??,
            ),
            None => None,
        };

        self.voluntario_repo.criar(&dados, senha_hash).await
    }

    pub async fn atualizar_usuario(
        &self,
        id: Uuid,
        dados: AtualizarVoluntario,
    ) -> Result<Voluntario, AppError> {
        self.voluntario_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;

        self.voluntario_repo.atualizar(id, &dados).await
    }

    pub async fn excluir_usuario(&self, id: Uuid) -> Result<(), AppError> {
        self.voluntario_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;

        self.voluntario_repo.excluir(id).await
    }

    pub async fn transferir_usuario(
        &self,
        usuario_id: Uuid,
        nova_sede_id: Uuid,
    ) -> Result<Voluntario, AppError> {
        self.voluntario_repo
            .buscar_por_id(usuario_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Usuário não encontrado".to_string()))?;

        let sede = self
            .sede_repo
            .buscar_por_id(nova_sede_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        if !sede.sede.ativo {
            return Err(AppError::Invalido(
                "Sede de destino está inativa".to_string(),
            ));
        }

        self.voluntario_repo
            .atualizar(
                usuario_id,
                &AtualizarVoluntario {
                    sede_id: Some(nova_sede_id),
                    nome_completo: None,
                    cpf: None,
                    telefone: None,
                    email: None,
                    endereco: None,
                    data_ingresso: None,
                    observacoes: None,
                    cargo: None,
                    ativo: None,
                },
            )
            .await
    }

    // ========== ASSISTIDOS ==========

    pub async fn listar_assistidos(
        &self,
        filtro: FiltroAssistido,
        paginacao: ParamsPaginacao,
    ) -> Result<Paginado<AssistidoComSede>, AppError> {
        let (page, limit, _) = paginacao.normalizar();
        let (assistidos, total) = self.assistido_repo.listar(&filtro, &paginacao).await?;
        Ok(Paginado::novo(assistidos, page, limit, total))
    }

    pub async fn criar_assistido(
        &self,
        dados: CriarAssistido,
    ) -> Result<crate::models::assistido::Assistido, AppError> {
        self.sede_repo
            .buscar_por_id(dados.sede_id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        if self.assistido_repo.existe_email(&dados.email, None).await? {
            return Err(AppError::Conflito("Email já cadastrado".to_string()));
        }

        self.assistido_repo.criar(&dados).await
    }

    pub async fn atualizar_assistido(
        &self,
        id: Uuid,
        dados: AtualizarAssistido,
    ) -> Result<crate::models::assistido::Assistido, AppError> {
        self.assistido_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Assistido não encontrado".to_string()))?;

        self.assistido_repo.atualizar(id, &dados).await
    }

    pub async fn excluir_assistido(&self, id: Uuid) -> Result<(), AppError> {
        self.assistido_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Assistido não encontrado".to_string()))?;

        self.assistido_repo.excluir(id).await
    }

    // ========== SEDES ==========

    pub async fn listar_sedes(&self) -> Result<Vec<SedeComContadores>, AppError> {
        let paginacao = ParamsPaginacao {
            page: Some(1),
            limit: Some(LIMITE_MAXIMO),
            order_by: Some("nome".to_string()),
            order_direction: Some(crate::common::paginacao::DirecaoOrdenacao::Asc),
        };
        let (sedes, _) = self
            .sede_repo
            .listar(&FiltroSede::default(), &paginacao)
            .await?;
        Ok(sedes)
    }

    pub async fn criar_sede(&self, dados: CriarSede) -> Result<Sede, AppError> {
        if self.sede_repo.buscar_por_nome(&dados.nome).await?.is_some() {
            return Err(AppError::Conflito(
                "Já existe uma sede com este nome".to_string(),
            ));
        }
        self.sede_repo.criar(&dados).await
    }

    pub async fn atualizar_sede(&self, id: Uuid, dados: AtualizarSede) -> Result<Sede, AppError> {
        self.sede_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        self.sede_repo.atualizar(id, &dados).await
    }

    pub async fn excluir_sede(&self, id: Uuid) -> Result<(), AppError> {
        self.sede_repo
            .buscar_por_id(id)
            .await?
            .ok_or_else(|| AppError::NaoEncontrado("Sede não encontrada".to_string()))?;

        let (voluntarios, assistidos) = self.sede_repo.contar_dependentes(id).await?;
        if voluntarios > 0 || assistidos > 0 {
            return Err(AppError::Conflito(format!(
                "Sede possui {} voluntários e {} assistidos. \
                 Transfira-os para outras sedes antes de excluir.",
                voluntarios, assistidos
            )));
        }

        self.sede_repo.excluir(id).await
    }

    // ========== DASHBOARD ==========

    pub async fn dashboard(&self) -> Result<DashboardSuperAdmin, AppError> {
        let sedes = self.sede_repo.estatisticas().await?;
        let voluntarios = self.voluntario_repo.estatisticas().await?;
        let assistidos = self.assistido_repo.estatisticas().await?;
        let stats_por_sede = self.sede_repo.stats_por_sede().await?;

        Ok(DashboardSuperAdmin {
            sedes,
            voluntarios: TotaisPorStatus {
                total: voluntarios.total,
                ativos: voluntarios.ativos,
                inativos: voluntarios.total - voluntarios.ativos,
            },
            assistidos: TotaisPorStatus {
                total: assistidos.total,
                ativos: assistidos.ativos,
                inativos: assistidos.total - assistidos.ativos,
            },
            stats_por_sede,
        })
    }
}
